//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - Slint callbacks and `slint::spawn_local` run on the UI event loop
//!   (file dialogs must stay there).
//! - The image loader runs on its own thread and posts results back through
//!   `slint::invoke_from_event_loop`.
//! - The preferences watcher thread posts change notifications the same way.

pub mod handlers;
pub mod image_display;

pub use handlers::{UiRuntime, setup};
