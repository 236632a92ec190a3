use chrono::Utc;
use log::{debug, error, info};

use crate::{RawWorkout, ReadError, StorageError, Workout, WorkoutID, WriteError};

pub trait WorkoutRepository {
    fn read_workouts(&self) -> Result<Vec<RawWorkout>, ReadError>;
    fn write_workouts(&self, workouts: &[Workout]) -> Result<(), WriteError>;
}

macro_rules! log_on_error {
    ($result: expr, $error: ident, $action: literal) => {{
        if let Err(ref err) = $result {
            match err {
                $error::Storage(StorageError::Unavailable) => {
                    debug!("failed to {} workouts: {err}", $action);
                }
                _ => {
                    error!("failed to {} workouts: {err}", $action);
                }
            }
        }
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionID(usize);

type Observer = Box<dyn Fn(&[Workout])>;

/// The authoritative list of workouts, newest first.
///
/// Every mutation writes a full snapshot to the repository before the in-memory list is
/// replaced. A failed write is logged and otherwise ignored, so the in-memory list may be ahead
/// of the persisted one.
pub struct WorkoutStore<R> {
    repository: R,
    workouts: Vec<Workout>,
    observers: Vec<(SubscriptionID, Observer)>,
    next_subscription_id: usize,
}

impl<R: WorkoutRepository> WorkoutStore<R> {
    /// Load the persisted workouts.
    ///
    /// An unreadable or corrupt snapshot results in an empty store.
    pub fn initialize(repository: R) -> Self {
        let result = repository.read_workouts();
        log_on_error!(result, ReadError, "read");
        let now = Utc::now();
        let workouts = result
            .unwrap_or_default()
            .into_iter()
            .map(|w| w.normalize(now))
            .collect::<Vec<_>>();
        info!("loaded {} workouts", workouts.len());
        Self {
            repository,
            workouts,
            observers: vec![],
            next_subscription_id: 0,
        }
    }

    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    #[must_use]
    pub fn get(&self, id: &WorkoutID) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Normalize the given workout and insert it at the front.
    pub fn add(&mut self, workout: RawWorkout) -> Workout {
        let workout = workout.normalize(Utc::now());
        let mut next = Vec::with_capacity(self.workouts.len() + 1);
        next.push(workout.clone());
        next.extend(self.workouts.iter().cloned());
        debug!("adding workout {}", workout.id);
        self.replace(next);
        workout
    }

    /// Remove the workout with the given id.
    ///
    /// Returns `false` if no such workout exists. The snapshot is written in either case.
    pub fn delete_by_id(&mut self, id: &WorkoutID) -> bool {
        let next = self
            .workouts
            .iter()
            .filter(|w| w.id != *id)
            .cloned()
            .collect::<Vec<_>>();
        let deleted = next.len() != self.workouts.len();
        debug!("deleting workout {id} (found: {deleted})");
        self.replace(next);
        deleted
    }

    pub fn clear(&mut self) {
        debug!("clearing all workouts");
        self.replace(vec![]);
    }

    pub fn subscribe(&mut self, observer: impl Fn(&[Workout]) + 'static) -> SubscriptionID {
        let id = SubscriptionID(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionID) {
        self.observers.retain(|(i, _)| *i != id);
    }

    fn replace(&mut self, workouts: Vec<Workout>) {
        let result = self.repository.write_workouts(&workouts);
        log_on_error!(result, WriteError, "write");
        self.workouts = workouts;
        for (_, observer) in &self.observers {
            observer(&self.workouts);
        }
    }
}
