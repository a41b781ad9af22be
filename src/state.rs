//! Shared application state.

use crate::preferences::Preferences;
use crate::viewport::Viewport;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

/// State shared between the UI handlers and the loader event callback.
pub struct AppState {
    /// Path of the last successfully loaded image; the target of copy and
    /// delete operations.
    pub current_file: Arc<Mutex<Option<PathBuf>>>,
    /// Zoom/pan transform of the canvas.
    pub viewport: Arc<Mutex<Viewport>>,
    /// File named by the open delete confirmation dialog, captured when the
    /// dialog is shown so the confirmed delete targets exactly that file.
    pub delete_candidate: Arc<Mutex<Option<PathBuf>>>,
    /// Wrap flag handed to slideshow advance requests.
    pub slideshow_loop: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(prefs: &Preferences) -> Self {
        Self {
            current_file: Arc::new(Mutex::new(None)),
            viewport: Arc::new(Mutex::new(Viewport::new())),
            delete_candidate: Arc::new(Mutex::new(None)),
            slideshow_loop: Arc::new(AtomicBool::new(prefs.slideshow_loop)),
        }
    }
}
