#![warn(clippy::pedantic)]

use std::sync::{Arc, Mutex};

use fittrack_web_app::{App, Settings, SettingsRepository, log};

use local_storage::{LocalStorage, Log};
use rest::{GlooNetSendRequest, Wger};

#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod model;
pub mod rest;

pub type BrowserApp = App<LocalStorage, Wger<GlooNetSendRequest>>;

/// Set up the application from the persisted settings.
///
/// Installs the logger with the configured level and points the catalog client to the
/// configured base URL. Unreadable settings are replaced by the defaults.
#[must_use]
pub fn init() -> BrowserApp {
    let settings = LocalStorage.read_settings();

    let log_level = settings
        .as_ref()
        .map_or(Settings::default().log_level, |s| s.log_level);
    if log::init(Arc::new(Mutex::new(Log)), log_level).is_err() {
        ::log::debug!("logger already initialized");
    }

    let settings = settings.unwrap_or_else(|err| {
        ::log::warn!("failed to read settings: {err}");
        Settings::default()
    });
    let catalog = Wger::new(&settings.catalog_url);

    App::new(settings, LocalStorage, catalog)
}
