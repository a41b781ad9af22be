// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod config;
mod error;
mod file_list;
mod file_utils;
mod image_cache;
mod image_loader;
mod preferences;
mod services;
mod startup;
mod state;
mod ui;
mod viewport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let app = AppWindow::new()?;
    let prefs = preferences::PreferencesStore::open_default()?;

    let mut runtime = ui::setup(&app, prefs.clone());
    startup::open_startup_image(&prefs, &runtime.requester());

    app.run()?;

    // The loader thread is joined before the process exits.
    runtime.shutdown();

    Ok(())
}
