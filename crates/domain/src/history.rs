use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, TimeZone};

use crate::{Workout, metrics::day_key};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    pub query: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDay<'a> {
    pub day: NaiveDate,
    pub workouts: Vec<&'a Workout>,
}

impl HistoryFilter {
    /// Check if the workout matches the keyword and the day of the filter.
    ///
    /// The keyword is matched case-insensitively against the title and the names and muscle
    /// groups of all exercises.
    #[must_use]
    pub fn matches<Tz: TimeZone>(&self, workout: &Workout, tz: &Tz) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || workout.title.to_lowercase().contains(&query)
            || workout.exercises.iter().any(|e| {
                e.name.to_lowercase().contains(&query)
                    || e.muscle_group.as_ref().to_lowercase().contains(&query)
            });
        let matches_date = self
            .date
            .is_none_or(|date| day_key(&workout.timestamp, tz) == date);

        matches_query && matches_date
    }
}

/// Matching workouts grouped by local calendar day.
///
/// See [`history_in`].
#[must_use]
pub fn history<'a>(workouts: &'a [Workout], filter: &HistoryFilter) -> Vec<HistoryDay<'a>> {
    history_in(workouts, filter, &Local)
}

/// Matching workouts grouped by calendar day.
///
/// Days are sorted from newest to oldest, the workouts of a day likewise.
#[must_use]
pub fn history_in<'a, Tz: TimeZone>(
    workouts: &'a [Workout],
    filter: &HistoryFilter,
    tz: &Tz,
) -> Vec<HistoryDay<'a>> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a Workout>> = BTreeMap::new();

    for workout in workouts.iter().filter(|w| filter.matches(w, tz)) {
        days.entry(day_key(&workout.timestamp, tz))
            .or_default()
            .push(workout);
    }

    days.into_iter()
        .rev()
        .map(|(day, mut workouts)| {
            workouts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            HistoryDay { day, workouts }
        })
        .collect()
}
