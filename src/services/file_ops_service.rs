//! File operations: copy-to-location and delete-to-trash.

use crate::error::{AppError, Result};
use log::info;
use std::path::Path;

/// Copies the source image to the chosen destination.
///
/// Failures are returned to the caller, which logs them; there is no
/// user-facing error dialog for copy operations.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    if !source.is_file() {
        return Err(AppError::FileOp(format!(
            "Source file does not exist: {}",
            source.display()
        )));
    }

    let bytes = std::fs::copy(source, destination).map_err(|e| {
        AppError::FileOp(format!(
            "{} -> {}: {}",
            source.display(),
            destination.display(),
            e
        ))
    })?;

    info!(
        "Copied {} to {} ({} bytes)",
        source.display(),
        destination.display(),
        bytes
    );
    Ok(bytes)
}

/// Moves a file to the OS trash.
pub fn move_to_trash(path: &Path) -> Result<()> {
    trash::delete(path).map_err(|e| AppError::FileOp(format!("{}: {}", path.display(), e)))
}
