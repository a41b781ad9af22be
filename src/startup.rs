//! Opening an image given on the command line.

use crate::file_utils;
use crate::image_loader::{LoaderRequest, LoaderRequester};
use crate::preferences::PreferencesStore;
use log::{debug, warn};
use std::path::PathBuf;

fn startup_image_from_args() -> Option<PathBuf> {
    std::env::args_os()
        .skip(1)
        .filter_map(|arg| {
            let arg_str = arg.to_string_lossy();
            if arg_str.starts_with('-') {
                None
            } else {
                Some(PathBuf::from(arg))
            }
        })
        .find(|path| file_utils::is_supported_image(path))
}

/// Issues the open request for the CLI path argument, if one was given, and
/// records its directory as the previous open path.
pub fn open_startup_image(prefs: &PreferencesStore, requester: &LoaderRequester) {
    let Some(path) = startup_image_from_args() else {
        debug!("No startup image argument");
        return;
    };

    if let Some(parent) = path.parent() {
        let parent = parent.to_path_buf();
        if let Err(e) = prefs.update(|p| p.previous_open_path = Some(parent.clone())) {
            warn!("Failed to save previous open path: {}", e);
        }
    }

    requester.send(LoaderRequest::Open(path));
}
