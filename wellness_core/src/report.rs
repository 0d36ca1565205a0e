//! Per-subject reports.
//!
//! A report composes the metric components for one subject over one
//! window, using the configured goals, trend threshold and streak anchor.
//! Reports are computed fresh on every call and never persisted.

use crate::clock::ClockTime;
use crate::config::{Config, EngineConfig};
use crate::correlation::{all_correlations, Correlation};
use crate::exercise_stats::{
    activity_breakdown, exercise_stats, weekly_breakdown, ActivityBreakdown, ExerciseStats,
    WeeklyExercise,
};
use crate::goal::{compare_to_goals, progress, GoalComparison, GoalProgress};
use crate::health::{health_score, insights, HealthInputs};
use crate::patterns::{identify_patterns, Pattern};
use crate::rolling::{aggregate, Aggregate};
use crate::sleep_debt::{sleep_debt, SleepDebt};
use crate::store::LogStore;
use crate::streak::{activity_dates, compute_streaks, StreakAnchor, Streaks};
use crate::trend::{analyze_trend, Trend};
use crate::window::WEEK_DAYS;
use crate::{
    bedtime, consistency, frequency, LogCategory, LogEntry, Result, Tag, TagField, TimeWindow,
    ValueField,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// What to report on: the as-of instant, window length and timezone
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRequest {
    pub as_of: DateTime<Utc>,
    pub window_days: i64,
    pub timezone: Tz,
    /// Wake time to fit a bedtime recommendation against
    pub target_wake: Option<ClockTime>,
}

impl ReportRequest {
    /// Request with the configured window length and timezone
    pub fn new(as_of: DateTime<Utc>, engine: &EngineConfig) -> Result<Self> {
        Ok(Self {
            as_of,
            window_days: engine.window_days,
            timezone: engine.tz()?,
            target_wake: None,
        })
    }

    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::build(self.as_of, self.window_days, self.timezone)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SleepReport {
    pub hours_slept: Aggregate,
    pub quality: Aggregate,
    pub consistency_score: Option<u8>,
    pub sleep_debt: SleepDebt,
    pub recommended_bedtime: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedtime_for_target_wake: Option<ClockTime>,
    pub streaks: Streaks,
    pub top_disturbances: Vec<Tag>,
    pub hours_trend: Trend,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseReport {
    pub streaks: Streaks,
    /// Minutes over the last seven days against the weekly goal
    pub weekly_progress: GoalProgress,
    pub stats: ExerciseStats,
    pub weekly: Vec<WeeklyExercise>,
    pub activities: Vec<ActivityBreakdown>,
    pub duration_trend: Trend,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SymptomReport {
    pub severity: Aggregate,
    pub mood: Aggregate,
    pub trend: Trend,
    pub streaks: Streaks,
    pub top_symptoms: Vec<Tag>,
    pub top_triggers: Vec<Tag>,
}

/// Everything known about one subject over one window
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WellnessReport {
    pub subject_id: String,
    pub as_of: DateTime<Utc>,
    pub timezone: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub window_days: i64,
    pub sleep: SleepReport,
    pub exercise: ExerciseReport,
    pub symptoms: SymptomReport,
    pub correlations: Vec<Correlation>,
    pub patterns: Vec<Pattern>,
    /// 0-100 summary of severity, sleep and exercise
    pub health_score: u8,
    pub insights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<GoalComparison>,
}

/// Streaks for `category` up to the window's last day
///
/// Dates after the window are ignored so a report for a past date does not
/// see logs made later.
fn streaks_for(
    entries: &[LogEntry],
    category: LogCategory,
    window: &TimeWindow,
    anchor: StreakAnchor,
) -> Streaks {
    let mut dates = activity_dates(entries, category, window.timezone());
    dates.retain(|d| *d <= window.end());
    let from = anchor.resolve(&dates, window.end());
    compute_streaks(&dates, from)
}

pub fn sleep_report(
    entries: &[LogEntry],
    request: &ReportRequest,
    config: &Config,
) -> Result<SleepReport> {
    let window = request.window()?;
    let engine = &config.engine;
    let target_hours = config.goals.sleep_target_hours;

    let bedtime_for_target_wake = request
        .target_wake
        .map(|wake| bedtime::recommend_for_wake(entries, &window, wake, target_hours))
        .transpose()?;

    let report = SleepReport {
        hours_slept: aggregate(entries, &window, ValueField::HoursSlept),
        quality: aggregate(entries, &window, ValueField::Quality),
        consistency_score: consistency::consistency_score(entries, &window),
        sleep_debt: sleep_debt(entries, &window, target_hours)?,
        recommended_bedtime: bedtime::recommend_bedtime(entries, &window),
        bedtime_for_target_wake,
        streaks: streaks_for(entries, LogCategory::Sleep, &window, engine.streak_anchor),
        top_disturbances: frequency::rank_tags(
            entries,
            &window,
            TagField::Disturbances,
            engine.top_n,
        ),
        hours_trend: analyze_trend(entries, &window, ValueField::HoursSlept, engine.trend_threshold),
    };

    tracing::debug!(
        nights = report.sleep_debt.nights_logged,
        consistency = ?report.consistency_score,
        "sleep report"
    );
    Ok(report)
}

pub fn exercise_report(
    entries: &[LogEntry],
    request: &ReportRequest,
    config: &Config,
) -> Result<ExerciseReport> {
    let window = request.window()?;
    let engine = &config.engine;

    let last_week = TimeWindow::ending_on(window.end(), WEEK_DAYS, window.timezone())?;
    let week_minutes = aggregate(entries, &last_week, ValueField::DurationMinutes).sum;

    let report = ExerciseReport {
        streaks: streaks_for(entries, LogCategory::Exercise, &window, engine.streak_anchor),
        weekly_progress: progress(week_minutes, config.goals.weekly_exercise_minutes)?,
        stats: exercise_stats(entries, &window),
        weekly: weekly_breakdown(entries, &window),
        activities: activity_breakdown(entries, &window),
        duration_trend: analyze_trend(
            entries,
            &window,
            ValueField::DurationMinutes,
            engine.trend_threshold,
        ),
    };

    tracing::debug!(
        sessions = report.stats.total_sessions,
        weekly_percent = report.weekly_progress.percent,
        "exercise report"
    );
    Ok(report)
}

pub fn symptom_report(
    entries: &[LogEntry],
    request: &ReportRequest,
    config: &Config,
) -> Result<SymptomReport> {
    let window = request.window()?;
    let engine = &config.engine;

    // Mood lives on exercise logs too; only symptom diary moods count here
    let symptom_entries: Vec<LogEntry> = entries
        .iter()
        .filter(|e| e.category() == LogCategory::Symptom)
        .cloned()
        .collect();

    let report = SymptomReport {
        severity: aggregate(entries, &window, ValueField::Severity),
        mood: aggregate(&symptom_entries, &window, ValueField::Mood),
        trend: analyze_trend(entries, &window, ValueField::Severity, engine.trend_threshold),
        streaks: streaks_for(entries, LogCategory::Symptom, &window, engine.streak_anchor),
        top_symptoms: frequency::rank_tags(entries, &window, TagField::Symptoms, engine.top_n),
        top_triggers: frequency::rank_tags(entries, &window, TagField::Triggers, engine.top_n),
    };

    tracing::debug!(
        logs = report.severity.count,
        direction = ?report.trend.direction,
        "symptom report"
    );
    Ok(report)
}

/// Full report for `subject_id`, goal comparison included
pub fn wellness_report(
    subject_id: &str,
    entries: &[LogEntry],
    request: &ReportRequest,
    config: &Config,
) -> Result<WellnessReport> {
    let window = request.window()?;

    let sleep = sleep_report(entries, request, config)?;
    let exercise = exercise_report(entries, request, config)?;
    let symptoms = symptom_report(entries, request, config)?;

    let correlations = all_correlations(entries, &window);
    let patterns = identify_patterns(entries, &window);
    let health_inputs = HealthInputs::from_reports(&sleep, &exercise, &symptoms, window.len_days());
    let health_score = health_score(&health_inputs, &config.goals);
    let insights = insights(health_score, &patterns, &correlations);

    let mut report = WellnessReport {
        subject_id: subject_id.to_string(),
        as_of: request.as_of,
        timezone: request.timezone.name().to_string(),
        window_start: window.start(),
        window_end: window.end(),
        window_days: window.len_days(),
        sleep,
        exercise,
        symptoms,
        correlations,
        patterns,
        health_score,
        insights,
        goals: None,
    };
    let goals = compare_to_goals(&report, &config.goals);
    report.goals = Some(goals);

    tracing::info!(
        subject = subject_id,
        window_days = report.window_days,
        health_score = report.health_score,
        goals_met = goals.goals_met,
        "built wellness report"
    );
    Ok(report)
}

/// Fetch `subject_id`'s history from `store` and build a full report
///
/// History reaches back to the first log so the longest streak covers
/// everything on record.
pub fn load_report<S: LogStore + ?Sized>(
    store: &S,
    subject_id: &str,
    request: &ReportRequest,
    config: &Config,
) -> Result<WellnessReport> {
    let (_, to) = request.window()?.fetch_bounds();
    let entries = store.fetch(subject_id, DateTime::<Utc>::MIN_UTC, to)?;
    wellness_report(subject_id, &entries, request, config)
}
