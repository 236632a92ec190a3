use chrono::Utc;

use crate::{
    ExerciseEntryID, ExerciseTemplate, MuscleGroup, RawExercise, RawSet, RawWorkout, Reps, SetID,
    Weight, WorkoutID,
};

/// Unsaved workout as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub title: String,
    pub exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub id: ExerciseEntryID,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub sets: Vec<SetDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetDraft {
    pub id: SetID,
    pub reps: String,
    pub weight: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DraftSummary {
    pub total_sets: usize,
    pub total_reps: u64,
    pub total_weight_lifted: f64,
    pub avg_reps_per_set: f64,
}

impl Default for WorkoutDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            exercises: vec![ExerciseDraft::new(None)],
        }
    }
}

impl ExerciseDraft {
    #[must_use]
    pub fn new(template: Option<&ExerciseTemplate>) -> Self {
        Self {
            id: ExerciseEntryID::generate(),
            name: template.map(|t| t.name.clone()).unwrap_or_default(),
            muscle_group: template.map(|t| t.muscle_group).unwrap_or_default(),
            sets: vec![SetDraft::default()],
        }
    }

    pub fn add_set(&mut self) {
        self.sets.push(SetDraft::default());
    }

    pub fn remove_set(&mut self, id: &SetID) {
        self.sets.retain(|s| s.id != *id);
    }
}

impl Default for SetDraft {
    fn default() -> Self {
        Self {
            id: SetID::generate(),
            reps: String::from("10"),
            weight: String::from("20"),
        }
    }
}

impl WorkoutDraft {
    /// Append an exercise, optionally prefilled with a selection from the catalog.
    pub fn add_exercise(&mut self, template: Option<&ExerciseTemplate>) {
        self.exercises.push(ExerciseDraft::new(template));
    }

    pub fn remove_exercise(&mut self, id: &ExerciseEntryID) {
        self.exercises.retain(|e| e.id != *id);
    }

    pub fn exercise_mut(&mut self, id: &ExerciseEntryID) -> Option<&mut ExerciseDraft> {
        self.exercises.iter_mut().find(|e| e.id == *id)
    }

    /// Live totals of the entered sets, including sets that would be dropped on save.
    #[must_use]
    pub fn summary(&self) -> DraftSummary {
        let mut summary = DraftSummary::default();

        for set in self.exercises.iter().flat_map(|e| e.sets.iter()) {
            let reps = u32::from(Reps::from_input(&set.reps));
            let weight = f32::from(Weight::from_input(&set.weight));
            summary.total_sets += 1;
            summary.total_reps += u64::from(reps);
            summary.total_weight_lifted += f64::from(reps) * f64::from(weight);
        }

        if summary.total_sets > 0 {
            #[allow(clippy::cast_precision_loss)]
            let avg = summary.total_reps as f64 / summary.total_sets as f64;
            summary.avg_reps_per_set = avg;
        }

        summary
    }

    /// Clean the draft for saving.
    ///
    /// Sets without reps and exercises without a name or without sets are dropped. Returns
    /// `None` if nothing remains.
    #[must_use]
    pub fn validate(&self) -> Option<RawWorkout> {
        let exercises = self
            .exercises
            .iter()
            .map(|e| RawExercise {
                id: Some(e.id.clone()),
                name: Some(e.name.trim().to_string()),
                muscle_group: Some(e.muscle_group),
                sets: Some(
                    e.sets
                        .iter()
                        .map(|s| RawSet {
                            id: Some(s.id.clone()),
                            reps: Reps::from_input(&s.reps),
                            weight: Weight::from_input(&s.weight),
                        })
                        .filter(|s| !s.reps.is_zero())
                        .collect(),
                ),
            })
            .filter(|e| {
                e.name.as_ref().is_some_and(|n| !n.is_empty())
                    && e.sets.as_ref().is_some_and(|s| !s.is_empty())
            })
            .collect::<Vec<_>>();

        if exercises.is_empty() {
            return None;
        }

        let title = self.title.trim();

        Some(RawWorkout {
            id: Some(WorkoutID::generate()),
            title: Some(if title.is_empty() {
                crate::DEFAULT_WORKOUT_TITLE.to_string()
            } else {
                title.to_string()
            }),
            timestamp: Some(Utc::now()),
            exercises: Some(exercises),
        })
    }
}
