//! Background image-loading worker.
//!
//! All file-system and decode work happens on one dedicated thread. The UI
//! thread sends `LoaderRequest`s over a channel; the worker answers with
//! `LoaderEvent`s posted back through `slint::invoke_from_event_loop`. The
//! channel serializes requests, so overlapping navigation is handled in
//! arrival order.

use crate::config::IMAGE_CACHE_CAPACITY;
use crate::error::{AppError, Result};
use crate::file_list::{FileList, SortBy, SortOrder};
use crate::image_cache::ImageCache;
use crate::services::{ClipboardService, file_ops_service};
use crossbeam_channel::{Sender, unbounded};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Decoded RGBA8 pixels, ready to hand to the UI.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Metadata shown in the window title.
#[derive(Debug, Clone, Copy)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
}

/// Payload of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub frame: DecodedFrame,
    pub meta: ImageMeta,
}

/// Requests handled by the worker thread.
#[derive(Debug, Clone)]
pub enum LoaderRequest {
    /// Rebuild the file list around this path and load it.
    Open(PathBuf),
    Next,
    Previous,
    First,
    Last,
    /// Timer-driven advance; wraps to the first image when `wrap` is set.
    SlideshowAdvance { wrap: bool },
    /// Move this image to the trash and advance. The path is the file the
    /// user confirmed, which can differ from the worker's list position
    /// after a failed load.
    Delete(PathBuf),
    SetSortBy(SortBy),
    SetSortOrder(SortOrder),
    /// Re-read the current image from disk.
    Reload,
    /// Put this image on the clipboard at full resolution.
    CopyToClipboard(PathBuf),
    Shutdown,
}

/// Results posted back to the UI thread.
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    ImageLoaded(LoadedImage),
    /// Navigation ran off either end of the list.
    NoMoreImages,
    /// A load or file operation failed; the previous image stays visible.
    LoadFailed { path: PathBuf, reason: String },
}

/// Worker state: the navigable file list and the decode cache.
struct ImageLoader {
    files: FileList,
    cache: ImageCache,
    clipboard: ClipboardService,
}

impl ImageLoader {
    fn new() -> Self {
        Self {
            files: FileList::new(),
            cache: ImageCache::new(IMAGE_CACHE_CAPACITY),
            clipboard: ClipboardService::new(),
        }
    }

    /// Handles one request and returns the events it produced.
    fn handle(&mut self, request: LoaderRequest) -> Vec<LoaderEvent> {
        match request {
            LoaderRequest::Open(path) => {
                if let Err(e) = self.files.reset_to(&path) {
                    return vec![LoaderEvent::LoadFailed {
                        path,
                        reason: e.to_string(),
                    }];
                }
                vec![self.load(path)]
            }
            LoaderRequest::Next => self.step(FileList::next),
            LoaderRequest::Previous => self.step(FileList::previous),
            LoaderRequest::First => self.step(FileList::first),
            LoaderRequest::Last => self.step(FileList::last),
            LoaderRequest::SlideshowAdvance { wrap } => {
                match self.files.next() {
                    Some(path) => vec![self.load(path)],
                    None if wrap && !self.files.is_empty() => {
                        let path = self.files.first();
                        // Non-empty list, first() always yields a path.
                        match path {
                            Some(path) => vec![self.load(path)],
                            None => vec![LoaderEvent::NoMoreImages],
                        }
                    }
                    None => vec![LoaderEvent::NoMoreImages],
                }
            }
            LoaderRequest::Delete(path) => self.delete_file(path),
            LoaderRequest::SetSortBy(sort_by) => {
                self.files.set_sort_by(sort_by);
                Vec::new()
            }
            LoaderRequest::SetSortOrder(sort_order) => {
                self.files.set_sort_order(sort_order);
                Vec::new()
            }
            LoaderRequest::Reload => match self.files.current() {
                Some(path) => {
                    self.cache.invalidate(&path);
                    vec![self.load(path)]
                }
                None => Vec::new(),
            },
            LoaderRequest::CopyToClipboard(path) => {
                self.copy_to_clipboard(&path);
                Vec::new()
            }
            LoaderRequest::Shutdown => Vec::new(),
        }
    }

    fn step(&mut self, advance: fn(&mut FileList) -> Option<PathBuf>) -> Vec<LoaderEvent> {
        match advance(&mut self.files) {
            Some(path) => vec![self.load(path)],
            None => vec![LoaderEvent::NoMoreImages],
        }
    }

    fn delete_file(&mut self, path: PathBuf) -> Vec<LoaderEvent> {
        if let Err(e) = file_ops_service::move_to_trash(&path) {
            return vec![LoaderEvent::LoadFailed {
                path,
                reason: e.to_string(),
            }];
        }

        info!("Deleted {}", path.display());
        self.drop_from_list(&path)
    }

    /// Forgets a trashed file and loads what takes its place.
    fn drop_from_list(&mut self, path: &Path) -> Vec<LoaderEvent> {
        self.cache.invalidate(path);
        if !self.files.position_on(path) {
            warn!("{} was not in the navigation list", path.display());
            return Vec::new();
        }
        match self.files.remove_current() {
            Some(next) => vec![self.load(next)],
            None => vec![LoaderEvent::NoMoreImages],
        }
    }

    fn copy_to_clipboard(&mut self, path: &Path) {
        let frame = match self.decoded(path) {
            Ok((frame, _)) => frame,
            Err(e) => {
                warn!("Failed to decode {} for clipboard: {}", path.display(), e);
                return;
            }
        };

        if let Err(e) = self.clipboard.copy_image(&frame) {
            warn!("Failed to copy {} to clipboard: {}", path.display(), e);
        }
    }

    fn load(&mut self, path: PathBuf) -> LoaderEvent {
        match self.decoded(&path) {
            Ok((frame, meta)) => LoaderEvent::ImageLoaded(LoadedImage { path, frame, meta }),
            Err(e) => LoaderEvent::LoadFailed {
                path,
                reason: e.to_string(),
            },
        }
    }

    /// Returns the decoded frame for a path, from the cache or from disk.
    fn decoded(&mut self, path: &Path) -> Result<(DecodedFrame, ImageMeta)> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(hit);
        }

        let start = std::time::Instant::now();
        let (frame, meta) = decode_image(path)?;
        debug!(
            "Decoded {} ({}x{}) in {:?}",
            path.display(),
            frame.width,
            frame.height,
            start.elapsed()
        );
        self.cache.put(path.to_path_buf(), frame.clone(), meta);
        Ok((frame, meta))
    }
}

/// Reads and decodes an image file into an RGBA8 frame plus metadata.
fn decode_image(path: &Path) -> Result<(DecodedFrame, ImageMeta)> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .len();

    let image = image::ImageReader::open(path)
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()?;

    let width = image.width();
    let height = image.height();
    let frame = DecodedFrame {
        rgba: image.into_rgba8().into_raw(),
        width,
        height,
    };
    let meta = ImageMeta {
        width,
        height,
        file_size,
    };
    Ok((frame, meta))
}

/// Cloneable sender for loader requests, handed to UI callbacks and timers.
#[derive(Clone)]
pub struct LoaderRequester {
    tx: Sender<LoaderRequest>,
}

impl LoaderRequester {
    pub fn send(&self, request: LoaderRequest) {
        if let Err(e) = self.tx.send(request) {
            warn!("Image loader is gone, dropping request: {}", e);
        }
    }
}

/// Owns the worker thread; dropping it shuts the worker down and joins it.
pub struct LoaderHandle {
    tx: Sender<LoaderRequest>,
    thread: Option<JoinHandle<()>>,
}

impl LoaderHandle {
    /// Spawns the worker. `on_event` runs on the UI event loop for every
    /// event the worker produces.
    pub fn spawn<F>(on_event: F) -> Self
    where
        F: Fn(LoaderEvent) + Send + Sync + 'static,
    {
        let (tx, rx) = unbounded::<LoaderRequest>();
        let on_event = Arc::new(on_event);

        let thread = std::thread::Builder::new()
            .name("image-loader".to_string())
            .spawn(move || {
                let mut loader = ImageLoader::new();
                for request in rx {
                    if matches!(request, LoaderRequest::Shutdown) {
                        break;
                    }
                    for event in loader.handle(request) {
                        let callback = on_event.clone();
                        let _ = slint::invoke_from_event_loop(move || callback(event));
                    }
                }
                debug!("Image loader thread exiting");
            })
            .expect("Failed to spawn image loader thread");

        Self {
            tx,
            thread: Some(thread),
        }
    }

    pub fn requester(&self) -> LoaderRequester {
        LoaderRequester {
            tx: self.tx.clone(),
        }
    }

    /// Asks the worker to stop and blocks until it has.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(LoaderRequest::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Image loader thread panicked during shutdown");
            }
        }
    }
}

impl Drop for LoaderHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    fn loaded_path(events: &[LoaderEvent]) -> PathBuf {
        match events {
            [LoaderEvent::ImageLoaded(loaded)] => loaded.path.clone(),
            other => panic!("expected ImageLoaded, got {:?}", other),
        }
    }

    #[test]
    fn open_decodes_and_reports_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 4, 3);

        let mut loader = ImageLoader::new();
        let events = loader.handle(LoaderRequest::Open(path.clone()));

        match &events[..] {
            [LoaderEvent::ImageLoaded(loaded)] => {
                assert_eq!(loaded.path, path);
                assert_eq!(loaded.meta.width, 4);
                assert_eq!(loaded.meta.height, 3);
                assert!(loaded.meta.file_size > 0);
                assert_eq!(loaded.frame.rgba.len(), 4 * 3 * 4);
            }
            other => panic!("expected ImageLoaded, got {:?}", other),
        }
    }

    #[test]
    fn next_past_the_end_reports_no_more_images() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 2, 2);
        let last = write_png(dir.path(), "b.png", 2, 2);

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(last));

        let events = loader.handle(LoaderRequest::Next);
        assert!(matches!(events[..], [LoaderEvent::NoMoreImages]));

        // The position did not run off, so previous still navigates.
        let events = loader.handle(LoaderRequest::Previous);
        assert_eq!(loaded_path(&events).file_name().unwrap(), "a.png");
    }

    #[test]
    fn navigation_walks_the_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "a.png", 2, 2);
        write_png(dir.path(), "b.png", 2, 2);
        write_png(dir.path(), "c.png", 2, 2);

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(first));

        let events = loader.handle(LoaderRequest::Next);
        assert_eq!(loaded_path(&events).file_name().unwrap(), "b.png");
        let events = loader.handle(LoaderRequest::Last);
        assert_eq!(loaded_path(&events).file_name().unwrap(), "c.png");
        let events = loader.handle(LoaderRequest::First);
        assert_eq!(loaded_path(&events).file_name().unwrap(), "a.png");
    }

    #[test]
    fn slideshow_advance_wraps_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 2, 2);
        let last = write_png(dir.path(), "b.png", 2, 2);

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(last.clone()));
        let events = loader.handle(LoaderRequest::SlideshowAdvance { wrap: false });
        assert!(matches!(events[..], [LoaderEvent::NoMoreImages]));

        loader.handle(LoaderRequest::Open(last));
        let events = loader.handle(LoaderRequest::SlideshowAdvance { wrap: true });
        assert_eq!(loaded_path(&events).file_name().unwrap(), "a.png");
    }

    #[test]
    fn unreadable_file_reports_load_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut loader = ImageLoader::new();
        let events = loader.handle(LoaderRequest::Open(path.clone()));
        match &events[..] {
            [LoaderEvent::LoadFailed { path: p, reason }] => {
                assert_eq!(*p, path);
                assert!(!reason.is_empty());
            }
            other => panic!("expected LoadFailed, got {:?}", other),
        }
    }

    #[test]
    fn reload_reads_the_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 2, 2);

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(path.clone()));

        // Replace the file with a larger image and reload.
        let img = RgbaImage::from_pixel(6, 5, Rgba([1, 2, 3, 255]));
        img.save(&path).unwrap();

        let events = loader.handle(LoaderRequest::Reload);
        match &events[..] {
            [LoaderEvent::ImageLoaded(loaded)] => {
                assert_eq!(loaded.meta.width, 6);
                assert_eq!(loaded.meta.height, 5);
            }
            other => panic!("expected ImageLoaded, got {:?}", other),
        }
    }

    #[test]
    fn delete_follows_the_confirmed_file_not_the_failed_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let shown = write_png(dir.path(), "a.png", 2, 2);
        write_png(dir.path(), "b.png", 2, 2);
        std::fs::write(dir.path().join("c.png"), b"not a png").unwrap();

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(shown.clone()));

        // Jumping to the corrupt last file moves the list position but the
        // display keeps showing a.png, the file a delete would name.
        let events = loader.handle(LoaderRequest::Last);
        assert!(matches!(events[..], [LoaderEvent::LoadFailed { .. }]));

        let events = loader.drop_from_list(&shown);
        assert_eq!(loaded_path(&events).file_name().unwrap(), "b.png");
        assert!(!loader.files.position_on(&shown));
    }

    #[test]
    fn delete_of_a_missing_file_reports_failure_and_keeps_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "a.png", 2, 2);
        write_png(dir.path(), "b.png", 2, 2);

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(first));

        let gone = dir.path().join("gone.png");
        let events = loader.handle(LoaderRequest::Delete(gone.clone()));
        match &events[..] {
            [LoaderEvent::LoadFailed { path, .. }] => assert_eq!(*path, gone),
            other => panic!("expected LoadFailed, got {:?}", other),
        }

        let events = loader.handle(LoaderRequest::Next);
        assert_eq!(loaded_path(&events).file_name().unwrap(), "b.png");
    }

    #[test]
    fn sort_requests_produce_no_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 2, 2);

        let mut loader = ImageLoader::new();
        loader.handle(LoaderRequest::Open(path));
        assert!(loader.handle(LoaderRequest::SetSortBy(SortBy::Size)).is_empty());
        assert!(
            loader
                .handle(LoaderRequest::SetSortOrder(SortOrder::Descending))
                .is_empty()
        );
    }
}
