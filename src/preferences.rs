//! Persisted user preferences with live reload.
//!
//! Settings live in a TOML file under the user config directory. The store
//! hands out snapshots, persists mutations, and can watch its own file so
//! edits made while the viewer is running are picked up and reported as
//! per-field change notifications.

use crate::config::PREFS_DEBOUNCE_MS;
use crate::error::{AppError, Result};
use log::{debug, warn};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_SLIDESHOW_PERIOD_MS: u64 = 2500;
pub const DEFAULT_BACKGROUND_COLOR: [u8; 4] = [25, 25, 25, 255];

/// User settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Slideshow tick interval in milliseconds.
    pub slideshow_period_ms: u64,
    /// Whether the slideshow wraps to the first image at the end.
    pub slideshow_loop: bool,
    /// Canvas background as RGBA components.
    pub background_color: [u8; 4],
    /// Directory of the most recently opened image.
    pub previous_open_path: Option<PathBuf>,
    /// Directory last used by copy-to-location.
    pub last_copy_destination: Option<PathBuf>,
}

impl Preferences {
    /// Slideshow period as the `i32` the UI timer takes. Oversized values
    /// clamp instead of wrapping negative.
    pub fn slideshow_period_i32(&self) -> i32 {
        self.slideshow_period_ms.min(i32::MAX as u64) as i32
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            slideshow_period_ms: DEFAULT_SLIDESHOW_PERIOD_MS,
            slideshow_loop: false,
            background_color: DEFAULT_BACKGROUND_COLOR,
            previous_open_path: None,
            last_copy_destination: None,
        }
    }
}

/// Which setting a reload of the preferences file touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    SlideshowPeriod,
    SlideshowLoop,
    BackgroundColor,
    /// A setting without a dedicated handler changed.
    Other,
}

/// Computes the change notifications between two snapshots.
pub fn diff(old: &Preferences, new: &Preferences) -> Vec<PreferenceChange> {
    let mut changes = Vec::new();
    if old.slideshow_period_ms != new.slideshow_period_ms {
        changes.push(PreferenceChange::SlideshowPeriod);
    }
    if old.slideshow_loop != new.slideshow_loop {
        changes.push(PreferenceChange::SlideshowLoop);
    }
    if old.background_color != new.background_color {
        changes.push(PreferenceChange::BackgroundColor);
    }
    if old.previous_open_path != new.previous_open_path
        || old.last_copy_destination != new.last_copy_destination
    {
        changes.push(PreferenceChange::Other);
    }
    changes
}

/// Shared handle to the preferences file.
#[derive(Clone)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Arc<Mutex<Preferences>>,
}

/// Keeps the preferences file watcher alive.
pub struct PreferencesWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl PreferencesStore {
    /// Opens the store at the default location, creating the file with
    /// defaults on first run.
    pub fn open_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Preferences("No user config directory".to_string()))?
            .join("slideview");
        Self::open(config_dir.join("preferences.toml"))
    }

    /// Opens the store at an explicit path.
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            read_preferences(&path)?
        } else {
            let defaults = Preferences::default();
            write_preferences(&path, &defaults)?;
            defaults
        };

        Ok(Self {
            path,
            data: Arc::new(Mutex::new(data)),
        })
    }

    /// Returns a snapshot of the current settings.
    pub fn get(&self) -> Preferences {
        self.data.lock().expect("preferences lock poisoned").clone()
    }

    /// Mutates the settings and persists them.
    pub fn update<F: FnOnce(&mut Preferences)>(&self, mutate: F) -> Result<()> {
        let snapshot = {
            let mut data = self.data.lock().expect("preferences lock poisoned");
            mutate(&mut data);
            data.clone()
        };
        write_preferences(&self.path, &snapshot)
    }

    /// Watches the preferences file and invokes `on_change` with the fresh
    /// snapshot and the list of settings that changed. Saves made through
    /// this store produce an empty diff and are not reported.
    ///
    /// The callback runs on the watcher thread; UI consumers route it back
    /// through `slint::invoke_from_event_loop`.
    pub fn watch<F>(&self, on_change: F) -> Result<PreferencesWatcher>
    where
        F: Fn(Preferences, Vec<PreferenceChange>) + Send + 'static,
    {
        let prefs_path = self.path.clone();
        let data = self.data.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(PREFS_DEBOUNCE_MS),
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    if !events.iter().any(|e| e.path == prefs_path) {
                        return;
                    }
                    let fresh = match read_preferences(&prefs_path) {
                        Ok(prefs) => prefs,
                        Err(e) => {
                            warn!("Ignoring unreadable preferences file: {}", e);
                            return;
                        }
                    };
                    let changes = {
                        let mut data = data.lock().expect("preferences lock poisoned");
                        let changes = diff(&data, &fresh);
                        *data = fresh.clone();
                        changes
                    };
                    if changes.is_empty() {
                        return;
                    }
                    debug!("Preferences changed on disk: {:?}", changes);
                    on_change(fresh, changes);
                }
                Err(error) => warn!("Preferences watcher error: {}", error),
            },
        )
        .map_err(|e| AppError::Preferences(format!("Failed to create watcher: {}", e)))?;

        let watch_dir = self
            .path
            .parent()
            .ok_or_else(|| AppError::Preferences("Preferences path has no parent".to_string()))?;
        debouncer
            .watcher()
            .watch(watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::Preferences(format!("Failed to watch {}: {}", watch_dir.display(), e)))?;

        Ok(PreferencesWatcher {
            _debouncer: debouncer,
        })
    }
}

fn read_preferences(path: &Path) -> Result<Preferences> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Preferences(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&text).map_err(|e| AppError::Preferences(format!("{}: {}", path.display(), e)))
}

fn write_preferences(path: &Path, prefs: &Preferences) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Preferences(format!("{}: {}", parent.display(), e)))?;
    }
    let text = toml::to_string_pretty(prefs)
        .map_err(|e| AppError::Preferences(format!("Failed to serialize: {}", e)))?;
    fs::write(path, text).map_err(|e| AppError::Preferences(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let prefs = Preferences::default();
        assert_eq!(prefs.slideshow_period_ms, 2500);
        assert!(!prefs.slideshow_loop);
        assert_eq!(prefs.background_color, [25, 25, 25, 255]);
        assert!(prefs.previous_open_path.is_none());
    }

    #[test]
    fn oversized_slideshow_period_clamps_for_the_ui_timer() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.slideshow_period_i32(), 2500);

        prefs.slideshow_period_ms = u64::MAX;
        assert_eq!(prefs.slideshow_period_i32(), i32::MAX);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let prefs: Preferences = toml::from_str("slideshow_period_ms = 4000").unwrap();
        assert_eq!(prefs.slideshow_period_ms, 4000);
        assert!(!prefs.slideshow_loop);
        assert_eq!(prefs.background_color, DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn open_creates_the_file_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        let store = PreferencesStore::open(path.clone()).unwrap();
        assert!(path.exists());

        store
            .update(|p| {
                p.slideshow_loop = true;
                p.slideshow_period_ms = 1000;
            })
            .unwrap();

        let reopened = PreferencesStore::open(path).unwrap();
        let prefs = reopened.get();
        assert!(prefs.slideshow_loop);
        assert_eq!(prefs.slideshow_period_ms, 1000);
    }

    #[test]
    fn diff_reports_each_changed_field() {
        let old = Preferences::default();
        let mut new = old.clone();
        new.slideshow_period_ms = 100;
        new.background_color = [0, 0, 0, 255];
        new.last_copy_destination = Some(PathBuf::from("/tmp"));

        let changes = diff(&old, &new);
        assert!(changes.contains(&PreferenceChange::SlideshowPeriod));
        assert!(changes.contains(&PreferenceChange::BackgroundColor));
        assert!(changes.contains(&PreferenceChange::Other));
        assert!(!changes.contains(&PreferenceChange::SlideshowLoop));
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty() {
        let prefs = Preferences::default();
        assert!(diff(&prefs, &prefs.clone()).is_empty());
    }
}
