//! Goal progress and goal comparison.

use crate::config::GoalsConfig;
use crate::report::WellnessReport;
use crate::{Error, Result};
use serde::Serialize;

/// Progress toward a goal as an uncapped percentage
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GoalProgress {
    pub percent: f64,
}

impl GoalProgress {
    /// Percentage clamped to 0..=100 for progress bars
    pub fn display_percent(&self) -> f64 {
        self.percent.clamp(0.0, 100.0)
    }

    pub fn is_met(&self) -> bool {
        self.percent >= 100.0
    }
}

/// `achieved / goal * 100`, uncapped so over-achievement stays visible
///
/// A zero or negative goal is a configuration error, not a 0% result.
pub fn progress(achieved: f64, goal: f64) -> Result<GoalProgress> {
    if !goal.is_finite() || goal <= 0.0 {
        return Err(Error::invalid(format!("goal must be positive, got {}", goal)));
    }
    if !achieved.is_finite() {
        return Err(Error::invalid(format!("achieved amount must be finite, got {}", achieved)));
    }

    Ok(GoalProgress {
        percent: achieved / goal * 100.0,
    })
}

/// One goal check
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GoalCheck {
    pub actual: f64,
    pub target: f64,
    pub met: bool,
}

/// Sleep goals
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SleepGoals {
    pub hours_per_night: GoalCheck,
    pub quality: GoalCheck,
    pub sleep_debt: GoalCheck,
}

/// Exercise goals
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ExerciseGoals {
    pub minutes_per_week: GoalCheck,
    pub sessions_per_week: GoalCheck,
}

/// Symptom goals
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SymptomGoals {
    pub average_severity: GoalCheck,
}

/// All goal checks for one report
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GoalComparison {
    pub sleep: SleepGoals,
    pub exercise: ExerciseGoals,
    pub symptoms: SymptomGoals,
    pub goals_met: u32,
    pub goals_total: u32,
}

/// Sleep-hours tolerance around the nightly target
const SLEEP_HOURS_TOLERANCE: f64 = 0.5;

/// Compare a report's actuals against configured goals
///
/// Per-week exercise rates divide window totals by the window's length in
/// weeks. A component with no data fails its checks rather than passing
/// them vacuously, except sleep debt and severity, where zero is the
/// honest actual.
pub fn compare_to_goals(report: &WellnessReport, goals: &GoalsConfig) -> GoalComparison {
    let sleep = &report.sleep;
    let exercise = &report.exercise;
    let weeks = report.window_days as f64 / 7.0;

    let avg_hours = sleep.hours_slept.mean;
    let avg_quality = sleep.quality.mean;
    let has_sleep = !sleep.hours_slept.is_empty();

    let sleep_goals = SleepGoals {
        hours_per_night: GoalCheck {
            actual: avg_hours,
            target: goals.sleep_target_hours,
            met: has_sleep && (avg_hours - goals.sleep_target_hours).abs() <= SLEEP_HOURS_TOLERANCE,
        },
        quality: GoalCheck {
            actual: avg_quality,
            target: goals.sleep_target_quality,
            met: has_sleep && avg_quality >= goals.sleep_target_quality,
        },
        sleep_debt: GoalCheck {
            actual: sleep.sleep_debt.debt_hours,
            target: goals.max_sleep_debt_hours,
            met: sleep.sleep_debt.debt_hours <= goals.max_sleep_debt_hours,
        },
    };

    let minutes_per_week = exercise.stats.total_minutes as f64 / weeks;
    let sessions_per_week = f64::from(exercise.stats.total_sessions) / weeks;
    let exercise_goals = ExerciseGoals {
        minutes_per_week: GoalCheck {
            actual: minutes_per_week,
            target: goals.weekly_exercise_minutes,
            met: minutes_per_week >= goals.weekly_exercise_minutes,
        },
        sessions_per_week: GoalCheck {
            actual: sessions_per_week,
            target: goals.weekly_exercise_sessions,
            met: sessions_per_week >= goals.weekly_exercise_sessions,
        },
    };

    let avg_severity = report.symptoms.severity.mean;
    let symptom_goals = SymptomGoals {
        average_severity: GoalCheck {
            actual: avg_severity,
            target: goals.target_average_severity,
            met: avg_severity <= goals.target_average_severity,
        },
    };

    let checks = [
        sleep_goals.hours_per_night.met,
        sleep_goals.quality.met,
        sleep_goals.sleep_debt.met,
        exercise_goals.minutes_per_week.met,
        exercise_goals.sessions_per_week.met,
        symptom_goals.average_severity.met,
    ];

    GoalComparison {
        sleep: sleep_goals,
        exercise: exercise_goals,
        symptoms: symptom_goals,
        goals_met: checks.iter().filter(|&&met| met).count() as u32,
        goals_total: checks.len() as u32,
    }
}
