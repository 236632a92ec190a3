#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod draft;
pub mod error;
pub mod history;
pub mod metrics;
pub mod store;
pub mod training;
pub mod workout;

pub use catalog::{
    CatalogExercise, CatalogRepository, CatalogService, CatalogState, ExerciseTemplate,
    FetchOutcome, SUGGESTIONS,
};
pub use draft::{DraftSummary, ExerciseDraft, SetDraft, WorkoutDraft};
pub use error::{FetchError, ReadError, StorageError, WriteError};
pub use history::{HistoryDay, HistoryFilter};
pub use metrics::{DEFAULT_DAILY_WINDOW, DailyEntry, Summary, WorkoutSummary};
pub use store::{SubscriptionID, WorkoutRepository, WorkoutStore};
pub use training::{Reps, Weight};
pub use workout::{
    DEFAULT_EXERCISE_NAME, DEFAULT_WORKOUT_TITLE, ExerciseEntry, ExerciseEntryID, MuscleGroup,
    RawExercise, RawSet, RawWorkout, SetID, Workout, WorkoutID, WorkoutSet,
};
