//! Exercise summary statistics and breakdowns.
//!
//! This module summarizes exercise logs over a window:
//! - Totals, active days and the most frequent activity
//! - Intensity and mood distributions
//! - Sunday-start weekly breakdown
//! - Per-activity breakdown

use crate::window::week_start;
use crate::{ActivityType, Intensity, LogEntry, TimeWindow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Activity and how many sessions it had
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityCount {
    pub activity: ActivityType,
    pub count: u32,
}

/// Window totals for exercise logs
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExerciseStats {
    pub total_minutes: u64,
    pub total_sessions: u32,
    /// Rounded to two decimals
    pub average_session_minutes: f64,
    pub active_days: u32,
    pub most_frequent_activity: Option<ActivityCount>,
    pub intensity_distribution: BTreeMap<Intensity, u32>,
    /// Post-exercise mood (1-5) to number of sessions
    pub mood_distribution: BTreeMap<u8, u32>,
}

/// Exercise totals for one Sunday-start week
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeeklyExercise {
    pub week_starting: NaiveDate,
    pub total_minutes: u64,
    pub sessions: u32,
    pub unique_activities: u32,
}

/// Totals for one activity type
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityBreakdown {
    pub activity: ActivityType,
    pub sessions: u32,
    pub total_minutes: u64,
    /// Rounded to two decimals
    pub average_minutes: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summarize exercise logs inside `window`
///
/// Ties for the most frequent activity go to the activity logged first.
pub fn exercise_stats(entries: &[LogEntry], window: &TimeWindow) -> ExerciseStats {
    let mut stats = ExerciseStats {
        intensity_distribution: Intensity::ALL.iter().map(|&i| (i, 0)).collect(),
        ..Default::default()
    };

    let mut days = BTreeSet::new();
    let mut activity_order: Vec<ActivityType> = Vec::new();
    let mut activity_counts: HashMap<ActivityType, u32> = HashMap::new();

    for entry in window.entries_within(entries) {
        let Some(exercise) = entry.as_exercise() else {
            continue;
        };

        stats.total_minutes += u64::from(exercise.duration_minutes);
        stats.total_sessions += 1;
        days.insert(window.local_date(entry.logged_at));

        *stats
            .intensity_distribution
            .entry(exercise.intensity)
            .or_insert(0) += 1;
        if let Some(mood) = exercise.mood_after {
            *stats.mood_distribution.entry(mood).or_insert(0) += 1;
        }

        let count = activity_counts.entry(exercise.activity_type).or_insert(0);
        if *count == 0 {
            activity_order.push(exercise.activity_type);
        }
        *count += 1;
    }

    if stats.total_sessions > 0 {
        stats.average_session_minutes =
            round2(stats.total_minutes as f64 / f64::from(stats.total_sessions));
    }
    stats.active_days = days.len() as u32;

    // max_by_key keeps the last maximum; walk in reverse to keep the first
    stats.most_frequent_activity = activity_order
        .iter()
        .rev()
        .map(|&activity| ActivityCount {
            activity,
            count: activity_counts[&activity],
        })
        .max_by_key(|ac| ac.count);

    tracing::debug!(
        sessions = stats.total_sessions,
        minutes = stats.total_minutes,
        active_days = stats.active_days,
        "exercise stats"
    );
    stats
}

/// Exercise totals per Sunday-start week inside `window`, oldest first
pub fn weekly_breakdown(entries: &[LogEntry], window: &TimeWindow) -> Vec<WeeklyExercise> {
    let mut weeks: BTreeMap<NaiveDate, (u64, u32, BTreeSet<ActivityType>)> = BTreeMap::new();

    for entry in window.entries_within(entries) {
        let Some(exercise) = entry.as_exercise() else {
            continue;
        };
        let week = weeks
            .entry(week_start(window.local_date(entry.logged_at)))
            .or_default();
        week.0 += u64::from(exercise.duration_minutes);
        week.1 += 1;
        week.2.insert(exercise.activity_type);
    }

    weeks
        .into_iter()
        .map(|(week_starting, (total_minutes, sessions, activities))| WeeklyExercise {
            week_starting,
            total_minutes,
            sessions,
            unique_activities: activities.len() as u32,
        })
        .collect()
}

/// Per-activity totals inside `window`, most minutes first
pub fn activity_breakdown(entries: &[LogEntry], window: &TimeWindow) -> Vec<ActivityBreakdown> {
    let mut totals: BTreeMap<ActivityType, (u32, u64)> = BTreeMap::new();

    for entry in window.entries_within(entries) {
        if let Some(exercise) = entry.as_exercise() {
            let t = totals.entry(exercise.activity_type).or_default();
            t.0 += 1;
            t.1 += u64::from(exercise.duration_minutes);
        }
    }

    let mut breakdown: Vec<ActivityBreakdown> = totals
        .into_iter()
        .map(|(activity, (sessions, total_minutes))| ActivityBreakdown {
            activity,
            sessions,
            total_minutes,
            average_minutes: round2(total_minutes as f64 / f64::from(sessions)),
        })
        .collect();
    breakdown.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    breakdown
}
