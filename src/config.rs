//! Application configuration constants.

/// Supported image file extensions for scanning directories.
///
/// HEIC and NEF are matched by the filter; whether they actually decode
/// depends on the image backend, and failures surface as load errors.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 7] =
    ["png", "jpg", "jpeg", "heic", "nef", "tiff", "webp"];

/// Discrete zoom steps (keyboard shortcuts).
pub const ZOOM_STEP_IN: f32 = 1.2;
pub const ZOOM_STEP_OUT: f32 = 0.8;

/// Continuous zoom steps (mouse wheel, trackpad scroll).
pub const WHEEL_STEP_IN: f32 = 1.05;
pub const WHEEL_STEP_OUT: f32 = 0.95;

/// Double-click re-fits the image to this fraction of the window.
pub const DOUBLE_CLICK_FIT_WIDTH: f32 = 0.80;
pub const DOUBLE_CLICK_FIT_HEIGHT: f32 = 0.95;

/// Number of decoded images kept in the navigation cache.
pub const IMAGE_CACHE_CAPACITY: usize = 10;

/// Debounce period for the preferences file watcher.
pub const PREFS_DEBOUNCE_MS: u64 = 500;
