//! Applying loader results to the viewer.
//!
//! The loader worker posts `LoaderEvent`s through
//! `slint::invoke_from_event_loop`; this module turns them into property
//! updates: the displayed picture, the window title, the fitted transform,
//! or an error message.

use crate::file_utils;
use crate::image_loader::{DecodedFrame, ImageMeta, LoadedImage, LoaderEvent};
use crate::viewport::Viewport;
use log::error;
use slint::ComponentHandle;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Converts a decoded frame into a Slint image.
pub fn create_slint_image(frame: &DecodedFrame) -> slint::Image {
    let buffer = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(
        &frame.rgba,
        frame.width,
        frame.height,
    );
    slint::Image::from_rgba8(buffer)
}

/// Title string for a loaded image: `filename (W x H) [size]`.
pub fn window_title(path: &Path, meta: &ImageMeta) -> String {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!(
        "{} ({} x {}) [{}]",
        filename,
        meta.width,
        meta.height,
        file_utils::pretty_print_size(meta.file_size)
    )
}

/// Pushes the viewport transform into the UI properties.
pub fn push_viewport(ui: &crate::AppWindow, viewport: &Viewport) {
    let view_state = ui.global::<crate::ViewState>();
    let (offset_x, offset_y) = viewport.offset();
    view_state.set_view_scale(viewport.scale());
    view_state.set_view_offset_x(offset_x);
    view_state.set_view_offset_y(offset_y);
}

/// Window size in logical pixels, the box images are fitted into.
pub fn window_logical_size(ui: &crate::AppWindow) -> (f32, f32) {
    let size = ui.window().size();
    let factor = ui.window().scale_factor();
    (size.width as f32 / factor, size.height as f32 / factor)
}

/// Sets an error message in the UI with a prefix.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}

/// Dispatches one loader event to the UI.
pub fn apply_loader_event(
    ui: &crate::AppWindow,
    current_file: &Arc<Mutex<Option<PathBuf>>>,
    viewport: &Arc<Mutex<Viewport>>,
    event: LoaderEvent,
) {
    match event {
        LoaderEvent::ImageLoaded(loaded) => show_loaded(ui, current_file, viewport, loaded),
        LoaderEvent::NoMoreImages => clear_display(ui, viewport),
        LoaderEvent::LoadFailed { path, reason } => {
            // The previous image stays in place.
            set_error_with_prefix(ui, &format!("Failed to load {}", path.display()), reason);
        }
    }
}

fn show_loaded(
    ui: &crate::AppWindow,
    current_file: &Arc<Mutex<Option<PathBuf>>>,
    viewport: &Arc<Mutex<Viewport>>,
    loaded: LoadedImage,
) {
    *current_file.lock().unwrap() = Some(loaded.path.clone());

    let (box_w, box_h) = window_logical_size(ui);
    let mut vp = viewport.lock().unwrap();
    vp.set_content(loaded.frame.width, loaded.frame.height, box_w, box_h);

    let view_state = ui.global::<crate::ViewState>();
    view_state.set_picture(create_slint_image(&loaded.frame));
    view_state.set_picture_width(loaded.frame.width as i32);
    view_state.set_picture_height(loaded.frame.height as i32);
    view_state.set_window_title(window_title(&loaded.path, &loaded.meta).into());
    view_state.set_error_message("".into());
    push_viewport(ui, &vp);
}

/// Navigation ran off the end of the list: show an empty canvas.
fn clear_display(ui: &crate::AppWindow, viewport: &Arc<Mutex<Viewport>>) {
    let mut vp = viewport.lock().unwrap();
    vp.clear_content();

    let view_state = ui.global::<crate::ViewState>();
    view_state.set_picture(slint::Image::default());
    view_state.set_picture_width(0);
    view_state.set_picture_height(0);
    view_state.set_window_title("slideview".into());
    push_viewport(ui, &vp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_includes_dimensions_and_pretty_size() {
        let meta = ImageMeta {
            width: 4032,
            height: 3024,
            file_size: 2_517_504,
        };
        let title = window_title(Path::new("/photos/IMG_4631.jpg"), &meta);
        assert_eq!(title, "IMG_4631.jpg (4032 x 3024) [2.4 MB]");
    }

    #[test]
    fn title_falls_back_to_the_full_path() {
        let meta = ImageMeta {
            width: 1,
            height: 1,
            file_size: 10,
        };
        let title = window_title(Path::new("/"), &meta);
        assert!(title.contains("(1 x 1)"));
        assert!(title.contains("[10 B]"));
    }
}
