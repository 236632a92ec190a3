use std::collections::VecDeque;

use fittrack_domain as domain;
use fittrack_web_app::{Settings, SettingsRepository, log};
use gloo_storage::{Storage as GlooStorage, errors::StorageError};
use ::log::warn;
use serde_json::Value;

use crate::model;

const KEY_WORKOUTS: &str = "fitness_tracker_workouts_v2";
const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

#[derive(Clone, Default)]
pub struct LocalStorage;

impl domain::WorkoutRepository for LocalStorage {
    fn read_workouts(&self) -> Result<Vec<domain::RawWorkout>, domain::ReadError> {
        match gloo_storage::LocalStorage::get::<Value>(KEY_WORKOUTS) {
            Ok(value) => Ok(model::decode_workouts(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(vec![]),
            Err(StorageError::SerdeError(err)) => {
                warn!("discarding unreadable workouts: {err}");
                Ok(vec![])
            }
            Err(err) => Err(storage_error(err).into()),
        }
    }

    fn write_workouts(&self, workouts: &[domain::Workout]) -> Result<(), domain::WriteError> {
        gloo_storage::LocalStorage::set(KEY_WORKOUTS, model::encode_workouts(workouts))
            .map_err(|err| storage_error(err).into())
    }
}

impl SettingsRepository for LocalStorage {
    fn read_settings(&self) -> Result<Settings, domain::ReadError> {
        match gloo_storage::LocalStorage::get(KEY_SETTINGS) {
            Ok(settings) => Ok(settings),
            Err(StorageError::KeyNotFound(_)) => Ok(Settings::default()),
            Err(StorageError::SerdeError(err)) => {
                warn!("discarding unreadable settings: {err}");
                Ok(Settings::default())
            }
            Err(err) => Err(storage_error(err).into()),
        }
    }

    fn write_settings(&self, settings: &Settings) -> Result<(), domain::WriteError> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings)
            .map_err(|err| storage_error(err).into())
    }
}

pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

fn storage_error(err: StorageError) -> domain::StorageError {
    match err {
        StorageError::JsError(err) if err.name == "QuotaExceededError" => {
            domain::StorageError::QuotaExceeded
        }
        StorageError::JsError(err) if err.name == "SecurityError" => {
            domain::StorageError::Unavailable
        }
        err => domain::StorageError::Other(err.into()),
    }
}
