#![warn(clippy::pedantic)]

use fittrack_domain::{
    self as domain, CatalogRepository, CatalogService, DailyEntry, ExerciseTemplate, FetchOutcome,
    Summary, Workout, WorkoutDraft, WorkoutRepository, WorkoutStore, metrics,
};

pub mod log;

#[allow(clippy::missing_errors_doc)]
pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, domain::ReadError>;
    fn write_settings(&self, settings: &Settings) -> Result<(), domain::WriteError>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub catalog_url: String,
    pub catalog_limit: u32,
    pub daily_window: usize,
    #[serde(with = "log::LevelDef")]
    pub log_level: ::log::Level,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: String::from("https://wger.de/api/v2"),
            catalog_limit: 200,
            daily_window: domain::DEFAULT_DAILY_WINDOW,
            log_level: ::log::Level::Info,
        }
    }
}

/// Application state shared by all views.
///
/// Views receive a reference to this context instead of accessing global state.
pub struct App<W, C> {
    pub settings: Settings,
    pub workouts: WorkoutStore<W>,
    pub catalog: CatalogService<C>,
}

impl<W: WorkoutRepository, C: CatalogRepository> App<W, C> {
    pub fn new(settings: Settings, workout_repository: W, catalog_repository: C) -> Self {
        Self {
            settings,
            workouts: WorkoutStore::initialize(workout_repository),
            catalog: CatalogService::new(catalog_repository),
        }
    }

    pub async fn load_catalog(&self) -> FetchOutcome {
        self.catalog
            .fetch_exercises(self.settings.catalog_limit)
            .await
    }

    /// Store the draft if it contains at least one valid exercise.
    pub fn save_draft(&mut self, draft: &WorkoutDraft) -> Option<Workout> {
        draft.validate().map(|w| self.workouts.add(w))
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        metrics::summarize(self.workouts.workouts())
    }

    #[must_use]
    pub fn daily_series(&self) -> Vec<DailyEntry> {
        metrics::daily_series(self.workouts.workouts(), self.settings.daily_window)
    }

    /// Exercises offered for search, falling back to the built-in suggestions until the
    /// catalog is loaded.
    #[must_use]
    pub fn exercise_templates(&self) -> Vec<ExerciseTemplate> {
        let templates = self.catalog.templates();
        if templates.is_empty() {
            domain::SUGGESTIONS.clone()
        } else {
            templates
        }
    }
}
