//! Decoded image cache for fast navigation.
//!
//! Caches decoded RGBA8 frames with metadata using an LRU policy so stepping
//! back and forth between neighbors does not re-decode.

use crate::image_loader::{DecodedFrame, ImageMeta};
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// LRU cache for storing decoded images.
pub struct ImageCache {
    cache: LruCache<PathBuf, (DecodedFrame, ImageMeta)>,
}

impl ImageCache {
    /// Creates a new image cache with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).expect("Capacity must be non-zero")),
        }
    }

    /// Retrieves a decoded frame from the cache if it exists.
    pub fn get(&mut self, path: &Path) -> Option<(DecodedFrame, ImageMeta)> {
        let result = self.cache.get(path).cloned();
        if result.is_some() {
            debug!("Cache HIT: {}", path.display());
        } else {
            debug!("Cache MISS: {}", path.display());
        }
        result
    }

    /// Stores a decoded frame in the cache.
    pub fn put(&mut self, path: PathBuf, frame: DecodedFrame, meta: ImageMeta) {
        debug!(
            "Cache PUT: {} ({}x{})",
            path.display(),
            frame.width,
            frame.height
        );
        self.cache.put(path, (frame, meta));
    }

    /// Drops a single entry, used when a file must be re-read from disk.
    pub fn invalidate(&mut self, path: &Path) {
        self.cache.pop(path);
    }
}
