//! Aggregate statistics over a snapshot of workouts.
//!
//! All functions are pure and recompute their result from the given workouts.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::Workout;

pub const DEFAULT_DAILY_WINDOW: usize = 14;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_workouts: usize,
    pub total_sets: usize,
    pub total_weight_lifted: f64,
    pub avg_reps_per_set: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WorkoutSummary {
    pub sets: usize,
    pub reps: u64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyEntry {
    pub day: NaiveDate,
    pub weight: f64,
    pub workouts: u32,
}

#[must_use]
pub fn summarize(workouts: &[Workout]) -> Summary {
    let total = workouts
        .iter()
        .map(workout_summary)
        .fold(WorkoutSummary::default(), |acc, s| WorkoutSummary {
            sets: acc.sets + s.sets,
            reps: acc.reps + s.reps,
            weight: acc.weight + s.weight,
        });

    #[allow(clippy::cast_precision_loss)]
    let avg_reps_per_set = if total.sets > 0 {
        total.reps as f64 / total.sets as f64
    } else {
        0.0
    };

    Summary {
        total_workouts: workouts.len(),
        total_sets: total.sets,
        total_weight_lifted: total.weight,
        avg_reps_per_set,
    }
}

#[must_use]
pub fn workout_summary(workout: &Workout) -> WorkoutSummary {
    workout.sets().fold(WorkoutSummary::default(), |acc, s| {
        WorkoutSummary {
            sets: acc.sets + 1,
            reps: acc.reps + u64::from(u32::from(s.reps)),
            weight: acc.weight + s.volume(),
        }
    })
}

/// Calendar day of an instant in the given time zone.
#[must_use]
pub fn day_key<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// Total volume and number of workouts per day in the local time zone.
///
/// See [`daily_series_in`].
#[must_use]
pub fn daily_series(workouts: &[Workout], window_size: usize) -> Vec<DailyEntry> {
    daily_series_in(workouts, window_size, &Local)
}

/// Total volume and number of workouts per day.
///
/// Only days with at least one workout are included. The result is sorted by day and limited to
/// the last `window_size` days.
#[must_use]
pub fn daily_series_in<Tz: TimeZone>(
    workouts: &[Workout],
    window_size: usize,
    tz: &Tz,
) -> Vec<DailyEntry> {
    let mut days: BTreeMap<NaiveDate, DailyEntry> = BTreeMap::new();

    for workout in workouts {
        let day = day_key(&workout.timestamp, tz);
        let entry = days.entry(day).or_insert(DailyEntry {
            day,
            weight: 0.0,
            workouts: 0,
        });
        entry.workouts += 1;
        entry.weight += workout_summary(workout).weight;
    }

    let skip = days.len().saturating_sub(window_size);
    days.into_values().skip(skip).collect()
}

/// Highest daily volume, zero for an empty series.
#[must_use]
pub fn max_daily_weight(series: &[DailyEntry]) -> f64 {
    series.iter().map(|d| d.weight).fold(0.0, f64::max)
}

/// Highest daily number of workouts, zero for an empty series.
#[must_use]
pub fn max_daily_workouts(series: &[DailyEntry]) -> u32 {
    series.iter().map(|d| d.workouts).max().unwrap_or(0)
}

#[must_use]
pub fn workouts_since(workouts: &[Workout], instant: DateTime<Utc>) -> usize {
    workouts.iter().filter(|w| w.timestamp >= instant).count()
}

#[must_use]
pub fn workouts_in_last_days(workouts: &[Workout], days: i64, now: DateTime<Utc>) -> usize {
    workouts_since(workouts, now - Duration::days(days))
}
