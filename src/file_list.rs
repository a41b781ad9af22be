//! Ordered list of sibling image files for navigation.
//!
//! Owned by the image loader worker. Tracks the current position, the sort
//! key and direction, and keeps the current file stable across re-sorts.

use crate::error::Result;
use crate::file_utils;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Sort key for the file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Size,
    DateModified,
}

/// Sort direction for the file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Navigable list of the images in one directory.
pub struct FileList {
    files: Vec<PathBuf>,
    current: Option<usize>,
    sort_by: SortBy,
    sort_order: SortOrder,
}

impl FileList {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            current: None,
            sort_by: SortBy::Name,
            sort_order: SortOrder::Ascending,
        }
    }

    /// Rebuilds the list from the directory containing `path` and positions
    /// on `path` itself.
    pub fn reset_to(&mut self, path: &Path) -> Result<()> {
        let start = std::time::Instant::now();

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        self.files = file_utils::scan_directory(parent)?;
        self.apply_sort();
        self.current = self.files.iter().position(|p| p == path);

        if self.current.is_none() {
            warn!("Opened file not found in its directory: {}", path.display());
        }
        debug!(
            "Scanned {} with {} images in {:?}",
            parent.display(),
            self.files.len(),
            start.elapsed()
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns the path at the current position.
    pub fn current(&self) -> Option<PathBuf> {
        self.current.map(|i| self.files[i].clone())
    }

    /// Moves the position onto `path`. Returns `false` and leaves the
    /// position unchanged when the path is not in the list.
    pub fn position_on(&mut self, path: &Path) -> bool {
        match self.files.iter().position(|p| p == path) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    /// Steps forward. Returns `None` without moving when already at the end.
    pub fn next(&mut self) -> Option<PathBuf> {
        let index = self.current?;
        if index + 1 < self.files.len() {
            self.current = Some(index + 1);
            self.current()
        } else {
            None
        }
    }

    /// Steps backward. Returns `None` without moving when already at the start.
    pub fn previous(&mut self) -> Option<PathBuf> {
        let index = self.current?;
        if index > 0 {
            self.current = Some(index - 1);
            self.current()
        } else {
            None
        }
    }

    /// Jumps to the first image.
    pub fn first(&mut self) -> Option<PathBuf> {
        if self.files.is_empty() {
            return None;
        }
        self.current = Some(0);
        self.current()
    }

    /// Jumps to the last image.
    pub fn last(&mut self) -> Option<PathBuf> {
        if self.files.is_empty() {
            return None;
        }
        self.current = Some(self.files.len() - 1);
        self.current()
    }

    /// Drops the current entry and returns the path that takes its place:
    /// the image that followed it, the previous one when the last entry was
    /// removed, or `None` when the list is now empty.
    pub fn remove_current(&mut self) -> Option<PathBuf> {
        let index = self.current?;
        self.files.remove(index);

        if self.files.is_empty() {
            self.current = None;
            return None;
        }

        self.current = Some(index.min(self.files.len() - 1));
        self.current()
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
        self.resort();
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.sort_order = sort_order;
        self.resort();
    }

    /// Re-sorts the list, keeping the current file selected.
    fn resort(&mut self) {
        let current_path = self.current();
        self.apply_sort();
        if let Some(path) = current_path {
            self.current = self.files.iter().position(|p| *p == path);
        }
    }

    fn apply_sort(&mut self) {
        // The metadata keys stat the file; compute each one once.
        match self.sort_by {
            SortBy::Name => self.files.sort(),
            SortBy::Size => self.files.sort_by_cached_key(|p| file_size(p)),
            SortBy::DateModified => self.files.sort_by_cached_key(|p| modified_time(p)),
        }
        if self.sort_order == SortOrder::Descending {
            self.files.reverse();
        }
    }
}

impl Default for FileList {
    fn default() -> Self {
        Self::new()
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn modified_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
