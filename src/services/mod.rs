//! Service layer for clipboard and file-system side effects.

pub mod clipboard_service;
pub mod file_ops_service;

pub use clipboard_service::ClipboardService;
