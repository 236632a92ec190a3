use std::cell::RefCell;

use log::{debug, error, info};

use crate::{FetchError, MuscleGroup};

#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn fetch_catalog(&self, limit: u32) -> Result<Vec<CatalogExercise>, FetchError>;
}

/// Exercise of the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogExercise {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub muscles: Vec<u32>,
    pub muscles_secondary: Vec<u32>,
    pub category: Option<u32>,
    pub equipment: Vec<u32>,
    pub muscle_group: MuscleGroup,
}

impl CatalogExercise {
    #[must_use]
    pub fn template(&self) -> ExerciseTemplate {
        ExerciseTemplate {
            name: self.name.clone(),
            muscle_group: self.muscle_group,
        }
    }
}

/// Name and muscle group used to prefill a new exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub name: String,
    pub muscle_group: MuscleGroup,
}

impl ExerciseTemplate {
    #[must_use]
    pub fn new(name: &str, muscle_group: MuscleGroup) -> Self {
        Self {
            name: name.to_string(),
            muscle_group,
        }
    }
}

pub static SUGGESTIONS: std::sync::LazyLock<Vec<ExerciseTemplate>> =
    std::sync::LazyLock::new(|| {
        vec![
            ExerciseTemplate::new("Bench Press", MuscleGroup::Chest),
            ExerciseTemplate::new("Incline Dumbbell Press", MuscleGroup::Chest),
            ExerciseTemplate::new("Push Up", MuscleGroup::Chest),
            ExerciseTemplate::new("Pull Up", MuscleGroup::Back),
            ExerciseTemplate::new("Lat Pulldown", MuscleGroup::Back),
            ExerciseTemplate::new("Barbell Row", MuscleGroup::Back),
            ExerciseTemplate::new("Back Squat", MuscleGroup::Legs),
            ExerciseTemplate::new("Romanian Deadlift", MuscleGroup::Hamstrings),
            ExerciseTemplate::new("Hip Thrust", MuscleGroup::Glutes),
            ExerciseTemplate::new("Overhead Press", MuscleGroup::Shoulders),
            ExerciseTemplate::new("Bicep Curl", MuscleGroup::Arms),
            ExerciseTemplate::new("Tricep Pushdown", MuscleGroup::Arms),
            ExerciseTemplate::new("Plank", MuscleGroup::Core),
        ]
    });

/// Templates whose name or muscle group contains the query (case-insensitive).
///
/// If `muscle_group` is given, only templates of that group are returned.
#[must_use]
pub fn search<'a>(
    templates: &'a [ExerciseTemplate],
    query: &str,
    muscle_group: Option<MuscleGroup>,
) -> Vec<&'a ExerciseTemplate> {
    let query = query.trim().to_lowercase();
    templates
        .iter()
        .filter(|t| {
            query.is_empty()
                || t.name.to_lowercase().contains(&query)
                || t.muscle_group.as_ref().to_lowercase().contains(&query)
        })
        .filter(|t| muscle_group.is_none_or(|m| t.muscle_group == m))
        .collect()
}

/// Distinct muscle groups of the templates, sorted by name.
#[must_use]
pub fn muscle_group_options(templates: &[ExerciseTemplate]) -> Vec<MuscleGroup> {
    let mut groups = templates.iter().map(|t| t.muscle_group).collect::<Vec<_>>();
    groups.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    groups.dedup();
    groups
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogState {
    pub exercises: Vec<CatalogExercise>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Completed,
    Failed,
    /// Another request was still in flight, no request was sent.
    Suppressed,
}

/// Catalog with at most one request in flight.
///
/// A failed request keeps the previously fetched exercises.
pub struct CatalogService<R> {
    repository: R,
    state: RefCell<CatalogState>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            state: RefCell::new(CatalogState::default()),
        }
    }

    pub async fn fetch_exercises(&self, limit: u32) -> FetchOutcome {
        {
            let mut state = self.state.borrow_mut();
            if state.loading {
                debug!("catalog request already in flight");
                return FetchOutcome::Suppressed;
            }
            state.loading = true;
            state.error = None;
        }

        let in_flight = InFlight(&self.state);
        let result = self.repository.fetch_catalog(limit).await;
        drop(in_flight);

        let mut state = self.state.borrow_mut();
        match result {
            Ok(exercises) => {
                info!("fetched {} catalog exercises", exercises.len());
                state.exercises = exercises;
                FetchOutcome::Completed
            }
            Err(err) => {
                error!("failed to fetch catalog: {err}");
                state.error = Some(err.to_string());
                FetchOutcome::Failed
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    #[must_use]
    pub fn templates(&self) -> Vec<ExerciseTemplate> {
        self.state
            .borrow()
            .exercises
            .iter()
            .map(CatalogExercise::template)
            .collect()
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

/// Frees the request slot when dropped, also if the request future is dropped before completion.
struct InFlight<'a>(&'a RefCell<CatalogState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        future::Future,
        pin::{Pin, pin},
        task::{Context, Poll},
    };

    use futures_util::FutureExt;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[derive(Default)]
    struct MockRepository {
        blocked: Cell<bool>,
        response: RefCell<Option<Result<Vec<CatalogExercise>, FetchError>>>,
        requests: Cell<usize>,
    }

    impl MockRepository {
        fn respond(&self, response: Result<Vec<CatalogExercise>, FetchError>) {
            *self.response.borrow_mut() = Some(response);
        }
    }

    impl CatalogRepository for MockRepository {
        async fn fetch_catalog(&self, _limit: u32) -> Result<Vec<CatalogExercise>, FetchError> {
            self.requests.set(self.requests.get() + 1);
            std::future::poll_fn(|_| {
                if self.blocked.get() {
                    Poll::Pending
                } else {
                    Poll::Ready(())
                }
            })
            .await;
            self.response
                .borrow_mut()
                .take()
                .unwrap_or(Err(FetchError::NoConnection))
        }
    }

    fn poll<F: Future>(future: Pin<&mut F>) -> Poll<F::Output> {
        future.poll(&mut Context::from_waker(
            futures_util::task::noop_waker_ref(),
        ))
    }

    fn exercise(id: u32, name: &str, muscle_group: MuscleGroup) -> CatalogExercise {
        CatalogExercise {
            id,
            name: name.to_string(),
            description: String::new(),
            muscles: vec![],
            muscles_secondary: vec![],
            category: None,
            equipment: vec![],
            muscle_group,
        }
    }

    #[test]
    fn test_fetch_success() {
        let service = CatalogService::new(MockRepository::default());
        service.repository().respond(Ok(vec![exercise(1, "Squat", MuscleGroup::Legs)]));

        assert_eq!(
            service.fetch_exercises(200).now_or_never(),
            Some(FetchOutcome::Completed)
        );
        assert_eq!(
            service.state(),
            CatalogState {
                exercises: vec![exercise(1, "Squat", MuscleGroup::Legs)],
                loading: false,
                error: None,
            }
        );
        assert_eq!(
            service.templates(),
            vec![ExerciseTemplate::new("Squat", MuscleGroup::Legs)]
        );
    }

    #[test]
    fn test_fetch_failure_keeps_exercises() {
        let service = CatalogService::new(MockRepository::default());
        service.repository().respond(Ok(vec![exercise(1, "Squat", MuscleGroup::Legs)]));
        service.fetch_exercises(200).now_or_never();

        service.repository().respond(Err(FetchError::Status(500)));

        assert_eq!(
            service.fetch_exercises(200).now_or_never(),
            Some(FetchOutcome::Failed)
        );
        assert_eq!(service.error(), Some("WGER request failed: 500".to_string()));
        assert!(!service.is_loading());
        assert_eq!(service.state().exercises.len(), 1);
    }

    #[test]
    fn test_fetch_clears_previous_error() {
        let service = CatalogService::new(MockRepository::default());
        service.fetch_exercises(200).now_or_never();
        assert!(service.error().is_some());

        service.repository().respond(Ok(vec![]));
        service.fetch_exercises(200).now_or_never();

        assert_eq!(service.error(), None);
    }

    #[test]
    fn test_fetch_single_request_in_flight() {
        let service = CatalogService::new(MockRepository::default());
        service.repository().blocked.set(true);
        service.repository().respond(Ok(vec![exercise(1, "Plank", MuscleGroup::Core)]));

        let mut first = pin!(service.fetch_exercises(200));
        assert_eq!(poll(first.as_mut()), Poll::Pending);
        assert!(service.is_loading());

        assert_eq!(
            service.fetch_exercises(200).now_or_never(),
            Some(FetchOutcome::Suppressed)
        );
        assert_eq!(service.repository().requests.get(), 1);

        service.repository().blocked.set(false);
        assert_eq!(poll(first.as_mut()), Poll::Ready(FetchOutcome::Completed));
        assert!(!service.is_loading());

        service.repository().respond(Ok(vec![]));
        assert_eq!(
            service.fetch_exercises(200).now_or_never(),
            Some(FetchOutcome::Completed)
        );
        assert_eq!(service.repository().requests.get(), 2);
    }

    #[test]
    fn test_fetch_dropped_request_frees_slot() {
        let service = CatalogService::new(MockRepository::default());
        service.repository().blocked.set(true);

        {
            let mut first = pin!(service.fetch_exercises(200));
            assert_eq!(poll(first.as_mut()), Poll::Pending);
            assert!(service.is_loading());
        }

        assert!(!service.is_loading());

        service.repository().blocked.set(false);
        service.repository().respond(Ok(vec![exercise(1, "Plank", MuscleGroup::Core)]));

        assert_eq!(
            service.fetch_exercises(200).now_or_never(),
            Some(FetchOutcome::Completed)
        );
        assert_eq!(service.state().exercises.len(), 1);
        assert_eq!(service.repository().requests.get(), 2);
    }

    #[rstest]
    #[case::all("", None, 13)]
    #[case::name("press", None, 3)]
    #[case::muscle_group_query("BACK", None, 4)]
    #[case::filter("", Some(MuscleGroup::Arms), 2)]
    #[case::query_and_filter("curl", Some(MuscleGroup::Arms), 1)]
    #[case::filter_mismatch("squat", Some(MuscleGroup::Chest), 0)]
    fn test_search(
        #[case] query: &str,
        #[case] muscle_group: Option<MuscleGroup>,
        #[case] expected: usize,
    ) {
        assert_eq!(search(&SUGGESTIONS, query, muscle_group).len(), expected);
    }

    #[test]
    fn test_muscle_group_options() {
        assert_eq!(
            muscle_group_options(&SUGGESTIONS),
            vec![
                MuscleGroup::Arms,
                MuscleGroup::Back,
                MuscleGroup::Chest,
                MuscleGroup::Core,
                MuscleGroup::Glutes,
                MuscleGroup::Hamstrings,
                MuscleGroup::Legs,
                MuscleGroup::Shoulders,
            ]
        );
    }
}
