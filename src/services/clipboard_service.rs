//! Clipboard service for copying images and paths to the OS clipboard.

use crate::error::{AppError, Result};
use crate::image_loader::DecodedFrame;
use arboard::{Clipboard, ImageData};
use log::info;
use std::borrow::Cow;

/// Service for managing clipboard operations.
pub struct ClipboardService;

impl ClipboardService {
    /// Creates a new clipboard service.
    pub fn new() -> Self {
        Self
    }

    /// Copies a decoded full-resolution image to the clipboard.
    pub fn copy_image(&self, frame: &DecodedFrame) -> Result<()> {
        let mut clipboard = Self::open()?;
        clipboard
            .set_image(ImageData {
                width: frame.width as usize,
                height: frame.height as usize,
                bytes: Cow::Borrowed(&frame.rgba),
            })
            .map_err(|e| AppError::Clipboard(e.to_string()))?;

        info!(
            "Copied {}x{} image to clipboard",
            frame.width, frame.height
        );
        Ok(())
    }

    /// Copies plain text (an image path) to the clipboard.
    pub fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Self::open()?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| AppError::Clipboard(e.to_string()))?;

        info!("Copied path to clipboard: {}", text);
        Ok(())
    }

    fn open() -> Result<Clipboard> {
        Clipboard::new().map_err(|e| AppError::Clipboard(format!("Failed to access clipboard: {}", e)))
    }
}

impl Default for ClipboardService {
    fn default() -> Self {
        Self::new()
    }
}
