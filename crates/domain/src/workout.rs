use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{Reps, Weight};

pub const DEFAULT_WORKOUT_TITLE: &str = "Workout";
pub const DEFAULT_EXERCISE_NAME: &str = "Exercise";

macro_rules! opaque_id {
    ($name: ident) => {
        #[derive(Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Create a random identifier (UUID v4).
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_id!(WorkoutID);
opaque_id!(ExerciseEntryID);
opaque_id!(SetID);

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub exercises: Vec<ExerciseEntry>,
}

impl Workout {
    pub fn sets(&self) -> impl Iterator<Item = &WorkoutSet> {
        self.exercises.iter().flat_map(|e| e.sets.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub id: ExerciseEntryID,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: SetID,
    pub reps: Reps,
    pub weight: Weight,
}

impl WorkoutSet {
    /// Weight lifted in this set (reps × weight).
    #[must_use]
    pub fn volume(&self) -> f64 {
        f64::from(u32::from(self.reps)) * f64::from(f32::from(self.weight))
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Hamstrings,
    Glutes,
    #[strum(serialize = "Posterior Chain")]
    PosteriorChain,
    #[strum(serialize = "Full Body")]
    FullBody,
    #[default]
    Other,
}

impl MuscleGroup {
    /// Unknown names are mapped to `Other`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or_default()
    }
}

/// A workout as received from the outside, e.g. decoded from storage.
///
/// Every field may be missing. [`RawWorkout::normalize`] turns it into a well-formed
/// [`Workout`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawWorkout {
    pub id: Option<WorkoutID>,
    pub title: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub exercises: Option<Vec<RawExercise>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawExercise {
    pub id: Option<ExerciseEntryID>,
    pub name: Option<String>,
    pub muscle_group: Option<MuscleGroup>,
    pub sets: Option<Vec<RawSet>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawSet {
    pub id: Option<SetID>,
    pub reps: Reps,
    pub weight: Weight,
}

impl RawWorkout {
    /// Fill in missing fields with defaults.
    ///
    /// A missing timestamp is replaced by `now`. Sets are taken over as they are, only a
    /// missing id is generated.
    #[must_use]
    pub fn normalize(self, now: DateTime<Utc>) -> Workout {
        Workout {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(WorkoutID::generate),
            title: non_blank(self.title).unwrap_or_else(|| DEFAULT_WORKOUT_TITLE.to_string()),
            timestamp: self.timestamp.unwrap_or(now),
            exercises: self
                .exercises
                .unwrap_or_default()
                .into_iter()
                .map(RawExercise::normalize)
                .collect(),
        }
    }
}

impl RawExercise {
    #[must_use]
    pub fn normalize(self) -> ExerciseEntry {
        ExerciseEntry {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(ExerciseEntryID::generate),
            name: non_blank(self.name).unwrap_or_else(|| DEFAULT_EXERCISE_NAME.to_string()),
            muscle_group: self.muscle_group.unwrap_or_default(),
            sets: self
                .sets
                .unwrap_or_default()
                .into_iter()
                .map(|s| WorkoutSet {
                    id: s.id.filter(|id| !id.is_empty()).unwrap_or_else(SetID::generate),
                    reps: s.reps,
                    weight: s.weight,
                })
                .collect(),
        }
    }
}

impl From<&Workout> for RawWorkout {
    fn from(value: &Workout) -> Self {
        Self {
            id: Some(value.id.clone()),
            title: Some(value.title.clone()),
            timestamp: Some(value.timestamp),
            exercises: Some(
                value
                    .exercises
                    .iter()
                    .map(|e| RawExercise {
                        id: Some(e.id.clone()),
                        name: Some(e.name.clone()),
                        muscle_group: Some(e.muscle_group),
                        sets: Some(
                            e.sets
                                .iter()
                                .map(|s| RawSet {
                                    id: Some(s.id.clone()),
                                    reps: s.reps,
                                    weight: s.weight,
                                })
                                .collect(),
                        ),
                    })
                    .collect(),
            ),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    static NOW: std::sync::LazyLock<DateTime<Utc>> =
        std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

    #[test]
    fn test_normalize_empty() {
        let workout = RawWorkout::default().normalize(*NOW);

        assert!(!workout.id.is_empty());
        assert_eq!(workout.title, "Workout");
        assert_eq!(workout.timestamp, *NOW);
        assert_eq!(workout.exercises, vec![]);
    }

    #[test]
    fn test_normalize_keeps_present_fields() {
        let timestamp = Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap();
        let workout = RawWorkout {
            id: Some("1700000000000_abc".into()),
            title: Some("Leg Day".to_string()),
            timestamp: Some(timestamp),
            exercises: Some(vec![RawExercise {
                id: Some("e1".into()),
                name: Some("Squat".to_string()),
                muscle_group: Some(MuscleGroup::Legs),
                sets: Some(vec![RawSet {
                    id: Some("s1".into()),
                    reps: Reps::new(5),
                    weight: Weight::new(100.0),
                }]),
            }]),
        }
        .normalize(*NOW);

        assert_eq!(
            workout,
            Workout {
                id: "1700000000000_abc".into(),
                title: "Leg Day".to_string(),
                timestamp,
                exercises: vec![ExerciseEntry {
                    id: "e1".into(),
                    name: "Squat".to_string(),
                    muscle_group: MuscleGroup::Legs,
                    sets: vec![WorkoutSet {
                        id: "s1".into(),
                        reps: Reps::new(5),
                        weight: Weight::new(100.0),
                    }],
                }],
            }
        );
    }

    #[test]
    fn test_normalize_exercise_defaults() {
        let exercise = RawExercise {
            name: Some("   ".to_string()),
            sets: Some(vec![RawSet::default()]),
            ..RawExercise::default()
        }
        .normalize();

        assert!(!exercise.id.is_empty());
        assert_eq!(exercise.name, "Exercise");
        assert_eq!(exercise.muscle_group, MuscleGroup::Other);
        assert_eq!(exercise.sets.len(), 1);
        assert!(!exercise.sets[0].id.is_empty());
        assert_eq!(exercise.sets[0].reps, Reps::default());
    }

    #[test]
    fn test_normalize_empty_ids() {
        let workout = RawWorkout {
            id: Some("".into()),
            exercises: Some(vec![RawExercise {
                id: Some("".into()),
                sets: Some(vec![RawSet {
                    id: Some("".into()),
                    ..RawSet::default()
                }]),
                ..RawExercise::default()
            }]),
            ..RawWorkout::default()
        }
        .normalize(*NOW);

        assert!(!workout.id.is_empty());
        assert!(!workout.exercises[0].id.is_empty());
        assert!(!workout.exercises[0].sets[0].id.is_empty());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(WorkoutID::generate(), WorkoutID::generate());
    }

    #[test]
    fn test_raw_workout_from_workout() {
        let workout = RawWorkout {
            exercises: Some(vec![RawExercise {
                name: Some("Bench Press".to_string()),
                sets: Some(vec![RawSet {
                    id: None,
                    reps: Reps::new(8),
                    weight: Weight::new(60.0),
                }]),
                ..RawExercise::default()
            }]),
            ..RawWorkout::default()
        }
        .normalize(*NOW);

        assert_eq!(RawWorkout::from(&workout).normalize(*NOW), workout);
    }

    #[rstest]
    #[case("Legs", MuscleGroup::Legs)]
    #[case("Posterior Chain", MuscleGroup::PosteriorChain)]
    #[case(" Full Body ", MuscleGroup::FullBody)]
    #[case("Neck", MuscleGroup::Other)]
    #[case("", MuscleGroup::Other)]
    fn test_muscle_group_from_name(#[case] name: &str, #[case] expected: MuscleGroup) {
        assert_eq!(MuscleGroup::from_name(name), expected);
    }

    #[test]
    fn test_muscle_group_names() {
        assert_eq!(
            MuscleGroup::iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>(),
            vec![
                "Chest",
                "Back",
                "Legs",
                "Shoulders",
                "Arms",
                "Core",
                "Hamstrings",
                "Glutes",
                "Posterior Chain",
                "Full Body",
                "Other"
            ]
        );
    }

    #[test]
    fn test_set_volume() {
        assert_eq!(
            WorkoutSet {
                id: "s".into(),
                reps: Reps::new(5),
                weight: Weight::new(22.5),
            }
            .volume(),
            112.5
        );
    }
}
