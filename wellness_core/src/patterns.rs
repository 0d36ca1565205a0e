//! Heuristic patterns across sleep, exercise and symptom history.
//!
//! Each detector looks at one window and either reports a pattern with a
//! 0-100 confidence and a recommendation, or stays silent. Detectors never
//! fail; thin history simply yields no pattern.

use crate::consistency::{consistency_score, nightly_sleep};
use crate::correlation::sleep_quality_vs_severity;
use crate::rolling::Aggregate;
use crate::window::week_start;
use crate::{LogEntry, TimeWindow};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Inverted sleep-quality/severity coefficient above which poor sleep is
/// linked to worse symptoms
const SLEEP_SYMPTOM_LINK: f64 = 0.3;

const MIN_MOOD_SESSIONS: u32 = 3;
const MOOD_BOOST_MEAN: f64 = 3.5;

const MIN_ROUTINE_NIGHTS: usize = 3;
const ROUTINE_SCORE: u8 = 70;
/// Irregular sleep is only called out past this many nights
const IRREGULAR_AFTER_NIGHTS: usize = 5;

/// Percent drop in severity on exercise weeks that counts as a reduction
const EXERCISE_IMPROVEMENT_PERCENT: f64 = 10.0;

const WEEKEND_SHIFT_HOURS: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    SleepSymptomLink,
    ExerciseMoodBoost,
    GoodSleepRoutine,
    InconsistentSleep,
    ExerciseSymptomReduction,
    WeekendSleepShift,
}

/// A detected pattern
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub description: &'static str,
    /// 0-100, two decimals
    pub confidence: f64,
    pub recommendation: &'static str,
}

impl Pattern {
    fn new(
        kind: PatternKind,
        confidence: f64,
        description: &'static str,
        recommendation: &'static str,
    ) -> Self {
        Self {
            kind,
            description,
            confidence: (confidence.clamp(0.0, 100.0) * 100.0).round() / 100.0,
            recommendation,
        }
    }
}

/// Every pattern found in `window`, in a fixed detector order
pub fn identify_patterns(entries: &[LogEntry], window: &TimeWindow) -> Vec<Pattern> {
    let patterns: Vec<Pattern> = [
        sleep_symptom_link(entries, window),
        exercise_mood_boost(entries, window),
        sleep_routine(entries, window),
        exercise_symptom_reduction(entries, window),
        weekend_sleep_shift(entries, window),
    ]
    .into_iter()
    .flatten()
    .collect();

    tracing::debug!(found = patterns.len(), "identified patterns");
    patterns
}

fn sleep_symptom_link(entries: &[LogEntry], window: &TimeWindow) -> Option<Pattern> {
    let coefficient = sleep_quality_vs_severity(entries, window).coefficient;
    (coefficient > SLEEP_SYMPTOM_LINK).then(|| {
        Pattern::new(
            PatternKind::SleepSymptomLink,
            coefficient * 100.0,
            "Poor sleep quality is associated with increased symptom severity",
            "Improving sleep hygiene may help reduce symptom severity",
        )
    })
}

fn exercise_mood_boost(entries: &[LogEntry], window: &TimeWindow) -> Option<Pattern> {
    let moods = Aggregate::from_values(
        window
            .entries_within(entries)
            .into_iter()
            .filter_map(|e| e.as_exercise()?.mood_after.map(f64::from)),
    );
    if moods.count < MIN_MOOD_SESSIONS || moods.mean < MOOD_BOOST_MEAN {
        return None;
    }

    Some(Pattern::new(
        PatternKind::ExerciseMoodBoost,
        (moods.mean - 3.0) / 2.0 * 100.0,
        "Exercise sessions are consistently followed by improved mood",
        "Continue regular exercise routine to maintain positive mood",
    ))
}

fn sleep_routine(entries: &[LogEntry], window: &TimeWindow) -> Option<Pattern> {
    let nights = nightly_sleep(entries, window).len();
    if nights < MIN_ROUTINE_NIGHTS {
        return None;
    }
    let score = consistency_score(entries, window)?;

    if score >= ROUTINE_SCORE {
        Some(Pattern::new(
            PatternKind::GoodSleepRoutine,
            f64::from(score),
            "Maintaining a consistent sleep schedule",
            "Keep up the good work with consistent sleep times",
        ))
    } else if nights > IRREGULAR_AFTER_NIGHTS {
        Some(Pattern::new(
            PatternKind::InconsistentSleep,
            f64::from(100 - score),
            "Sleep schedule is irregular, which may impact overall health",
            "Try to maintain more consistent bedtime and wake time",
        ))
    } else {
        None
    }
}

#[derive(Default)]
struct WeekSummary {
    exercised: bool,
    severities: Vec<f64>,
}

/// Mean severity on weeks with exercise against weeks without
fn exercise_symptom_reduction(entries: &[LogEntry], window: &TimeWindow) -> Option<Pattern> {
    let mut weeks: BTreeMap<NaiveDate, WeekSummary> = BTreeMap::new();
    for entry in window.entries_within(entries) {
        let week = weeks
            .entry(week_start(window.local_date(entry.logged_at)))
            .or_default();
        if entry.as_exercise().is_some() {
            week.exercised = true;
        }
        if let Some(symptom) = entry.as_symptom() {
            week.severities.push(f64::from(symptom.severity));
        }
    }

    let weekly_mean = |exercised: bool| {
        Aggregate::from_values(
            weeks
                .values()
                .filter(|w| w.exercised == exercised && !w.severities.is_empty())
                .map(|w| Aggregate::from_values(w.severities.iter().copied()).mean),
        )
    };
    let with = weekly_mean(true);
    let without = weekly_mean(false);
    if with.is_empty() || without.is_empty() {
        return None;
    }

    let improvement = (without.mean - with.mean) / without.mean * 100.0;
    tracing::trace!(improvement, "exercise week severity change");
    (improvement > EXERCISE_IMPROVEMENT_PERCENT).then(|| {
        Pattern::new(
            PatternKind::ExerciseSymptomReduction,
            improvement.abs(),
            "Regular exercise is associated with reduced symptom severity",
            "Aim for at least 3-4 exercise sessions per week",
        )
    })
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Hours slept on nights ending on a weekend against nights ending on a
/// weekday
fn weekend_sleep_shift(entries: &[LogEntry], window: &TimeWindow) -> Option<Pattern> {
    let nights = nightly_sleep(entries, window);
    let hours = |weekend: bool| {
        Aggregate::from_values(
            nights
                .iter()
                .filter(|(date, _)| is_weekend(*date) == weekend)
                .map(|(_, s)| s.hours_slept),
        )
    };
    let weekend = hours(true);
    let weekday = hours(false);
    if weekend.is_empty() || weekday.is_empty() {
        return None;
    }

    let shift = weekend.mean - weekday.mean;
    if shift.abs() <= WEEKEND_SHIFT_HOURS {
        return None;
    }

    let confidence = shift.abs() * 30.0;
    Some(if shift > 0.0 {
        Pattern::new(
            PatternKind::WeekendSleepShift,
            confidence,
            "Getting more sleep on weekends, suggesting weekday sleep debt",
            "Try to maintain weekend sleep schedule during weekdays",
        )
    } else {
        Pattern::new(
            PatternKind::WeekendSleepShift,
            confidence,
            "Getting less sleep on weekends than on weekdays",
            "Keep weekend bedtimes close to weekday ones",
        )
    })
}
