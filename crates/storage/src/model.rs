//! Serialized form of workouts as kept in `localStorage`.
//!
//! Decoding is lenient: values of an unexpected type are treated as missing and list elements
//! which cannot be decoded are skipped. The domain fills in the gaps when normalizing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fittrack_domain as domain;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Decode the stored payload. Anything else than an array is treated as empty.
#[must_use]
pub fn decode_workouts(value: Value) -> Vec<domain::RawWorkout> {
    let Value::Array(elements) = value else {
        debug!("ignoring stored workouts: payload is not an array");
        return vec![];
    };
    decode_list::<Workout>(elements)
        .into_iter()
        .map(domain::RawWorkout::from)
        .collect()
}

#[must_use]
pub fn encode_workouts(workouts: &[domain::Workout]) -> Vec<Workout> {
    workouts.iter().map(Workout::from).collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub exercises: Option<Vec<Exercise>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub muscle_group: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sets: Option<Vec<Set>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Set {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reps: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub weight: Option<Number>,
}

/// Point in time, written as epoch milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl Timestamp {
    /// Convert into an instant, if the value denotes a valid one.
    ///
    /// Text is accepted in RFC 3339 format. Date-times without offset and plain dates are
    /// interpreted as UTC.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            Timestamp::FractionalMillis(millis) => {
                if millis.is_finite() {
                    DateTime::from_timestamp_millis(millis.trunc() as i64)
                } else {
                    None
                }
            }
            Timestamp::Text(text) => parse_date_time(text.trim()),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::Millis(value.timestamp_millis())
    }
}

fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| t.and_utc())
        })
}

/// Numeric field which may also have been stored as text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    fn reps(&self) -> domain::Reps {
        match self {
            Number::Integer(value) => domain::Reps::coerce(*value as f64),
            Number::Decimal(value) => domain::Reps::coerce(*value),
            Number::Text(text) => domain::Reps::from_input(text),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn weight(&self) -> domain::Weight {
        match self {
            Number::Integer(value) => domain::Weight::coerce(*value as f64),
            Number::Decimal(value) => domain::Weight::coerce(*value),
            Number::Text(text) => domain::Weight::from_input(text),
        }
    }
}

impl From<domain::Weight> for Number {
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn from(value: domain::Weight) -> Self {
        let weight = f32::from(value);
        if weight.fract() == 0.0 && weight.abs() < 1e15 {
            Number::Integer(weight as i64)
        } else {
            // 22.3_f32 must be written as 22.3, not 22.299999237060547
            weight
                .to_string()
                .parse::<f64>()
                .map_or(Number::Decimal(f64::from(weight)), Number::Decimal)
        }
    }
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: Some(value.id.to_string()),
            title: Some(value.title.clone()),
            timestamp: Some(value.timestamp.into()),
            exercises: Some(
                value
                    .exercises
                    .iter()
                    .map(|e| Exercise {
                        id: Some(e.id.to_string()),
                        name: Some(e.name.clone()),
                        muscle_group: Some(e.muscle_group.to_string()),
                        sets: Some(
                            e.sets
                                .iter()
                                .map(|s| Set {
                                    id: Some(s.id.to_string()),
                                    reps: Some(Number::Integer(i64::from(u32::from(s.reps)))),
                                    weight: Some(s.weight.into()),
                                })
                                .collect(),
                        ),
                    })
                    .collect(),
            ),
        }
    }
}

impl From<Workout> for domain::RawWorkout {
    fn from(value: Workout) -> Self {
        Self {
            id: non_empty(value.id).map(domain::WorkoutID::from),
            title: value.title,
            timestamp: value.timestamp.as_ref().and_then(Timestamp::to_date_time),
            exercises: value
                .exercises
                .map(|exercises| exercises.into_iter().map(domain::RawExercise::from).collect()),
        }
    }
}

impl From<Exercise> for domain::RawExercise {
    fn from(value: Exercise) -> Self {
        Self {
            id: non_empty(value.id).map(domain::ExerciseEntryID::from),
            name: value.name,
            muscle_group: value
                .muscle_group
                .as_deref()
                .map(domain::MuscleGroup::from_name),
            sets: value
                .sets
                .map(|sets| sets.into_iter().map(domain::RawSet::from).collect()),
        }
    }
}

impl From<Set> for domain::RawSet {
    fn from(value: Set) -> Self {
        Self {
            id: non_empty(value.id).map(domain::SetID::from),
            reps: value.reps.as_ref().map(Number::reps).unwrap_or_default(),
            weight: value.weight.as_ref().map(Number::weight).unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Deserialize a value, treating a value of an unexpected type as missing.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list, skipping elements which cannot be decoded.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(elements) => Ok(Some(decode_list(elements))),
        _ => Ok(None),
    }
}

fn decode_list<T: DeserializeOwned>(elements: Vec<Value>) -> Vec<T> {
    elements
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::tests::data::{TIMESTAMP, WORKOUT, WORKOUT_JSON};

    use super::*;

    #[test]
    fn test_encode_workouts() {
        assert_eq!(
            json!(encode_workouts(&[WORKOUT.clone()])),
            json!([*WORKOUT_JSON])
        );
    }

    #[test]
    fn test_decode_workouts() {
        assert_eq!(
            decode_workouts(json!([*WORKOUT_JSON]))
                .into_iter()
                .map(|w| w.normalize(Utc::now()))
                .collect::<Vec<_>>(),
            vec![WORKOUT.clone()]
        );
    }

    #[rstest]
    #[case::object(json!({ "id": "1" }))]
    #[case::null(json!(null))]
    #[case::string(json!("[]"))]
    #[case::number(json!(42))]
    fn test_decode_workouts_not_an_array(#[case] value: Value) {
        assert_eq!(decode_workouts(value), vec![]);
    }

    #[test]
    fn test_decode_workouts_skips_non_objects() {
        assert_eq!(
            decode_workouts(json!([null, 1, "x", [], { "id": "w1" }])),
            vec![domain::RawWorkout {
                id: Some("w1".into()),
                ..domain::RawWorkout::default()
            }]
        );
    }

    #[test]
    fn test_decode_workouts_missing_fields() {
        assert_eq!(
            decode_workouts(json!([{}])),
            vec![domain::RawWorkout::default()]
        );
    }

    #[test]
    fn test_decode_workouts_fields_of_unexpected_type() {
        assert_eq!(
            decode_workouts(json!([{
                "id": 7,
                "title": ["Push"],
                "timestamp": true,
                "exercises": "none"
            }])),
            vec![domain::RawWorkout::default()]
        );
    }

    #[test]
    fn test_decode_workouts_lenient_sets() {
        let workouts = decode_workouts(json!([{
            "id": "w1",
            "exercises": [
                {
                    "name": "Squat",
                    "muscleGroup": "Unknown",
                    "sets": [
                        { "reps": "8", "weight": "62,5" },
                        { "reps": 7.9, "weight": -3 },
                        { "reps": "abc" },
                        null
                    ]
                },
                42
            ]
        }]));

        assert_eq!(
            workouts,
            vec![domain::RawWorkout {
                id: Some("w1".into()),
                title: None,
                timestamp: None,
                exercises: Some(vec![domain::RawExercise {
                    id: None,
                    name: Some("Squat".to_string()),
                    muscle_group: Some(domain::MuscleGroup::Other),
                    sets: Some(vec![
                        domain::RawSet {
                            id: None,
                            reps: domain::Reps::new(8),
                            weight: domain::Weight::new(62.5),
                        },
                        domain::RawSet {
                            id: None,
                            reps: domain::Reps::new(7),
                            weight: domain::Weight::new(0.0),
                        },
                        domain::RawSet::default(),
                    ]),
                }]),
            }]
        );
    }

    #[rstest]
    #[case::millis(json!(1_709_287_200_000_i64))]
    #[case::fractional_millis(json!(1_709_287_200_000.4))]
    #[case::rfc3339(json!("2024-03-01T10:00:00Z"))]
    #[case::rfc3339_offset(json!("2024-03-01T11:00:00.000+01:00"))]
    #[case::without_offset(json!("2024-03-01T10:00:00"))]
    fn test_timestamp(#[case] value: Value) {
        assert_eq!(
            serde_json::from_value::<Timestamp>(value)
                .unwrap()
                .to_date_time(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_timestamp_date() {
        assert_eq!(
            Timestamp::Text("2024-03-01".to_string()).to_date_time(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[rstest]
    #[case::text(Timestamp::Text("yesterday".to_string()))]
    #[case::empty(Timestamp::Text(String::new()))]
    #[case::nan(Timestamp::FractionalMillis(f64::NAN))]
    #[case::out_of_range(Timestamp::Millis(i64::MAX))]
    fn test_timestamp_invalid(#[case] timestamp: Timestamp) {
        assert_eq!(timestamp.to_date_time(), None);
    }

    #[test]
    fn test_timestamp_from() {
        assert_eq!(json!(Timestamp::from(*TIMESTAMP)), json!(1_709_287_200_000_i64));
    }

    #[rstest]
    #[case(20.0, json!(20))]
    #[case(22.3, json!(22.3))]
    #[case(0.5, json!(0.5))]
    fn test_number_from_weight(#[case] weight: f32, #[case] expected: Value) {
        assert_eq!(json!(Number::from(domain::Weight::new(weight))), expected);
    }
}
