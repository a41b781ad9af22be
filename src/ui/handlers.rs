//! Event handlers for UI callbacks.
//!
//! Wires every `Logic` callback (navigation, zoom/pan, slideshow, clipboard,
//! delete confirmation) to the loader worker and the shared state, and hooks
//! the preferences watcher up to the UI.

use crate::config;
use crate::image_loader::{LoaderHandle, LoaderRequest};
use crate::preferences::{Preferences, PreferenceChange, PreferencesStore, PreferencesWatcher};
use crate::services::{ClipboardService, file_ops_service};
use crate::state::AppState;
use crate::ui::image_display;
use log::{debug, warn};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::sync::atomic::Ordering;

/// Owns everything that must outlive the event loop: the loader thread and
/// the preferences watcher.
pub struct UiRuntime {
    loader: LoaderHandle,
    _prefs_watcher: Option<PreferencesWatcher>,
}

impl UiRuntime {
    pub fn requester(&self) -> crate::image_loader::LoaderRequester {
        self.loader.requester()
    }

    /// Stops the loader thread and blocks until it has exited.
    pub fn shutdown(&mut self) {
        self.loader.shutdown();
    }
}

fn canvas_color(prefs: &Preferences) -> slint::Color {
    let [r, g, b, a] = prefs.background_color;
    slint::Color::from_argb_u8(a, r, g, b)
}

/// Sets up all UI event handlers and background plumbing.
pub fn setup(app: &crate::AppWindow, prefs: PreferencesStore) -> UiRuntime {
    let initial = prefs.get();
    let state = AppState::new(&initial);

    let view_state = app.global::<crate::ViewState>();
    view_state.set_canvas_background(canvas_color(&initial));
    view_state.set_slideshow_period_ms(initial.slideshow_period_i32());
    view_state.set_slideshow_active(false);

    // Loader events come back on the UI thread.
    let loader = LoaderHandle::spawn({
        let ui_handle = app.as_weak();
        let current_file = state.current_file.clone();
        let viewport = state.viewport.clone();
        move |event| {
            if let Some(ui) = ui_handle.upgrade() {
                image_display::apply_loader_event(&ui, &current_file, &viewport, event);
            }
        }
    });

    let logic = app.global::<crate::Logic>();

    // Navigation
    logic.on_next_image({
        let requester = loader.requester();
        move || requester.send(LoaderRequest::Next)
    });
    logic.on_prev_image({
        let requester = loader.requester();
        move || requester.send(LoaderRequest::Previous)
    });
    logic.on_first_image({
        let requester = loader.requester();
        move || requester.send(LoaderRequest::First)
    });
    logic.on_last_image({
        let requester = loader.requester();
        move || requester.send(LoaderRequest::Last)
    });

    // Slideshow
    logic.on_start_slideshow({
        let ui_handle = app.as_weak();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                debug!("Starting slideshow");
                ui.global::<crate::ViewState>().set_slideshow_active(true);
            }
        }
    });
    logic.on_cancel_slideshow({
        let ui_handle = app.as_weak();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                let view_state = ui.global::<crate::ViewState>();
                if view_state.get_slideshow_active() {
                    debug!("Slideshow canceled");
                    view_state.set_slideshow_active(false);
                }
            }
        }
    });
    logic.on_slideshow_tick({
        let requester = loader.requester();
        let slideshow_loop = state.slideshow_loop.clone();
        move || {
            requester.send(LoaderRequest::SlideshowAdvance {
                wrap: slideshow_loop.load(Ordering::Relaxed),
            })
        }
    });

    // Zoom and pan
    logic.on_zoom_in({
        let ui_handle = app.as_weak();
        let viewport = state.viewport.clone();
        move || {
            let mut vp = viewport.lock().unwrap();
            vp.zoom_in();
            if let Some(ui) = ui_handle.upgrade() {
                image_display::push_viewport(&ui, &vp);
            }
        }
    });
    logic.on_zoom_out({
        let ui_handle = app.as_weak();
        let viewport = state.viewport.clone();
        move || {
            let mut vp = viewport.lock().unwrap();
            vp.zoom_out();
            if let Some(ui) = ui_handle.upgrade() {
                image_display::push_viewport(&ui, &vp);
            }
        }
    });
    logic.on_wheel_zoom({
        let ui_handle = app.as_weak();
        let viewport = state.viewport.clone();
        move |delta| {
            let mut vp = viewport.lock().unwrap();
            vp.wheel_zoom(delta);
            if let Some(ui) = ui_handle.upgrade() {
                image_display::push_viewport(&ui, &vp);
            }
        }
    });
    logic.on_pan({
        let ui_handle = app.as_weak();
        let viewport = state.viewport.clone();
        move |dx, dy| {
            let mut vp = viewport.lock().unwrap();
            vp.pan(dx, dy);
            if let Some(ui) = ui_handle.upgrade() {
                image_display::push_viewport(&ui, &vp);
            }
        }
    });
    logic.on_fit_to_window({
        let ui_handle = app.as_weak();
        let viewport = state.viewport.clone();
        move |width, height| {
            let mut vp = viewport.lock().unwrap();
            vp.refit(width, height);
            if let Some(ui) = ui_handle.upgrade() {
                image_display::push_viewport(&ui, &vp);
            }
        }
    });
    logic.on_double_click_fit({
        let ui_handle = app.as_weak();
        let viewport = state.viewport.clone();
        move |width, height| {
            let mut vp = viewport.lock().unwrap();
            vp.refit(
                width * config::DOUBLE_CLICK_FIT_WIDTH,
                height * config::DOUBLE_CLICK_FIT_HEIGHT,
            );
            if let Some(ui) = ui_handle.upgrade() {
                image_display::push_viewport(&ui, &vp);
            }
        }
    });

    // Clipboard
    logic.on_copy_image({
        let requester = loader.requester();
        let current_file = state.current_file.clone();
        move || {
            let Some(path) = current_file.lock().unwrap().clone() else {
                debug!("Copy requested with no image loaded");
                return;
            };
            requester.send(LoaderRequest::CopyToClipboard(path));
        }
    });
    logic.on_copy_path({
        let current_file = state.current_file.clone();
        move || {
            let Some(path) = current_file.lock().unwrap().clone() else {
                return;
            };
            if let Err(e) = ClipboardService::new().copy_text(&path.to_string_lossy()) {
                warn!("{}", e);
            }
        }
    });

    // Copy-to-location: save dialog seeded with the last destination, then
    // the copy itself runs off the UI thread.
    logic.on_copy_to_location({
        let current_file = state.current_file.clone();
        let prefs = prefs.clone();
        move || {
            let Some(source) = current_file.lock().unwrap().clone() else {
                debug!("Copy-to-location requested with no image loaded");
                return;
            };
            let prefs = prefs.clone();
            let _ = slint::spawn_local(async move {
                let mut dialog = AsyncFileDialog::new();
                if let Some(dir) = prefs.get().last_copy_destination {
                    dialog = dialog.set_directory(dir);
                }
                if let Some(name) = source.file_name().and_then(|n| n.to_str()) {
                    dialog = dialog.set_file_name(name);
                }
                let Some(choice) = dialog.save_file().await else {
                    debug!("Copy-to-location canceled");
                    return;
                };

                let destination = choice.path().to_path_buf();
                std::thread::spawn(move || {
                    if let Err(e) = file_ops_service::copy_file(&source, &destination) {
                        warn!("{}", e);
                        return;
                    }
                    if let Some(parent) = destination.parent() {
                        let parent = parent.to_path_buf();
                        if let Err(e) =
                            prefs.update(|p| p.last_copy_destination = Some(parent.clone()))
                        {
                            warn!("Failed to save copy destination: {}", e);
                        }
                    }
                });
            });
        }
    });

    // Delete with confirmation. The dialog pins the file it names, so the
    // confirmed delete targets that file even if the list moves meanwhile.
    logic.on_request_delete({
        let ui_handle = app.as_weak();
        let current_file = state.current_file.clone();
        let delete_candidate = state.delete_candidate.clone();
        move || {
            let Some(path) = current_file.lock().unwrap().clone() else {
                debug!("Delete requested with no image loaded");
                return;
            };
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            *delete_candidate.lock().unwrap() = Some(path);
            if let Some(ui) = ui_handle.upgrade() {
                let view_state = ui.global::<crate::ViewState>();
                view_state.set_delete_candidate(filename.into());
                view_state.set_confirm_delete_visible(true);
            }
        }
    });
    logic.on_confirm_delete({
        let ui_handle = app.as_weak();
        let requester = loader.requester();
        let delete_candidate = state.delete_candidate.clone();
        move |accepted| {
            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::ViewState>()
                    .set_confirm_delete_visible(false);
            }
            let candidate = delete_candidate.lock().unwrap().take();
            match candidate {
                Some(path) if accepted => requester.send(LoaderRequest::Delete(path)),
                _ => debug!("Deletion canceled"),
            }
        }
    });

    // Preference changes made outside the app are applied live.
    let prefs_watcher = prefs.watch({
        let ui_handle = app.as_weak();
        let requester = loader.requester();
        let slideshow_loop = state.slideshow_loop.clone();
        move |fresh, changes| {
            let ui_handle = ui_handle.clone();
            let requester = requester.clone();
            let slideshow_loop = slideshow_loop.clone();
            let _ = slint::invoke_from_event_loop(move || {
                let Some(ui) = ui_handle.upgrade() else {
                    return;
                };
                let view_state = ui.global::<crate::ViewState>();
                for change in changes {
                    match change {
                        PreferenceChange::BackgroundColor => {
                            view_state.set_canvas_background(canvas_color(&fresh));
                        }
                        PreferenceChange::SlideshowPeriod => {
                            view_state.set_slideshow_period_ms(fresh.slideshow_period_i32());
                        }
                        PreferenceChange::SlideshowLoop => {
                            slideshow_loop.store(fresh.slideshow_loop, Ordering::Relaxed);
                        }
                        PreferenceChange::Other => {
                            requester.send(LoaderRequest::Reload);
                        }
                    }
                }
            });
        }
    });
    let prefs_watcher = match prefs_watcher {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Preferences live reload disabled: {}", e);
            None
        }
    };

    UiRuntime {
        loader,
        _prefs_watcher: prefs_watcher,
    }
}
