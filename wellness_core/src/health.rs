//! Overall health score and plain-language insights.

use crate::config::GoalsConfig;
use crate::correlation::Correlation;
use crate::patterns::Pattern;
use crate::report::{ExerciseReport, SleepReport, SymptomReport};

/// Most points average severity can take off
const SEVERITY_WEIGHT: f64 = 40.0;
/// Points lost per hour away from the sleep target, capped
const SLEEP_HOURS_PENALTY_PER_HOUR: f64 = 5.0;
const SLEEP_HOURS_PENALTY_CAP: f64 = 30.0;
/// Swing for sleep quality around the neutral 3
const SLEEP_QUALITY_WEIGHT: f64 = 10.0;
const EXERCISE_WEIGHT: f64 = 30.0;

/// Patterns at or above this confidence contribute their recommendation
const PATTERN_INSIGHT_CONFIDENCE: f64 = 60.0;
/// Correlations at or above this magnitude contribute their description
const CORRELATION_INSIGHT_MAGNITUDE: f64 = 0.5;

/// The averages a health score is built from
///
/// `None` means nothing was logged for that metric in the window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthInputs {
    pub average_severity: Option<f64>,
    pub average_hours_slept: Option<f64>,
    pub average_sleep_quality: Option<f64>,
    pub weekly_exercise_minutes: f64,
}

impl HealthInputs {
    pub fn from_reports(
        sleep: &SleepReport,
        exercise: &ExerciseReport,
        symptoms: &SymptomReport,
        window_days: i64,
    ) -> Self {
        let present = |count: u32, mean: f64| (count > 0).then_some(mean);
        Self {
            average_severity: present(symptoms.severity.count, symptoms.severity.mean),
            average_hours_slept: present(sleep.hours_slept.count, sleep.hours_slept.mean),
            average_sleep_quality: present(sleep.quality.count, sleep.quality.mean),
            weekly_exercise_minutes: exercise.stats.total_minutes as f64
                / (window_days as f64 / 7.0),
        }
    }
}

/// Overall score, 0-100
///
/// Starts from 100. Average severity takes off up to 40 points. Sleep
/// loses 5 points per hour away from the target (at most 30) and gains or
/// loses up to 10 for quality above or below 3. Exercise contributes up to
/// 30 points in proportion to the weekly goal, so no exercise costs 30.
pub fn health_score(inputs: &HealthInputs, goals: &GoalsConfig) -> u8 {
    let mut score = 100.0;

    if let Some(severity) = inputs.average_severity {
        score -= severity / 10.0 * SEVERITY_WEIGHT;
    }

    if let Some(hours) = inputs.average_hours_slept {
        let deviation = (hours - goals.sleep_target_hours).abs();
        score -= (deviation * SLEEP_HOURS_PENALTY_PER_HOUR).min(SLEEP_HOURS_PENALTY_CAP);
        if let Some(quality) = inputs.average_sleep_quality {
            score += (quality - 3.0) / 2.0 * SLEEP_QUALITY_WEIGHT;
        }
    }

    let exercise = (inputs.weekly_exercise_minutes / goals.weekly_exercise_minutes * EXERCISE_WEIGHT)
        .min(EXERCISE_WEIGHT);
    score += exercise - EXERCISE_WEIGHT;

    let score = if score.is_finite() { score } else { 0.0 };
    score.round().clamp(0.0, 100.0) as u8
}

/// Insights for a report: an overall verdict, then recommendations from
/// confident patterns, then descriptions of notable correlations
pub fn insights(score: u8, patterns: &[Pattern], correlations: &[Correlation]) -> Vec<String> {
    let verdict = match score {
        80..=u8::MAX => "Excellent overall health metrics! Keep up the great work.",
        60..=79 => "Good progress, with room for improvement in some areas.",
        _ => "Several areas could benefit from attention and improvement.",
    };

    let mut insights = vec![verdict.to_string()];
    insights.extend(
        patterns
            .iter()
            .filter(|p| p.confidence >= PATTERN_INSIGHT_CONFIDENCE)
            .map(|p| p.recommendation.to_string()),
    );
    insights.extend(
        correlations
            .iter()
            .filter(|c| c.coefficient.abs() >= CORRELATION_INSIGHT_MAGNITUDE)
            .map(|c| c.description.clone()),
    );
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::all_correlations;
    use crate::patterns::identify_patterns;
    use crate::TimeWindow;
    use chrono::{TimeZone, Utc};

    fn goals() -> GoalsConfig {
        GoalsConfig::default()
    }

    #[test]
    fn test_ideal_inputs_score_full_marks() {
        let inputs = HealthInputs {
            average_severity: None,
            average_hours_slept: Some(8.0),
            average_sleep_quality: Some(3.0),
            weekly_exercise_minutes: 150.0,
        };
        assert_eq!(health_score(&inputs, &goals()), 100);
    }

    #[test]
    fn test_score_combines_penalties() {
        let inputs = HealthInputs {
            average_severity: Some(5.0),
            average_hours_slept: Some(6.0),
            average_sleep_quality: Some(2.0),
            weekly_exercise_minutes: 75.0,
        };
        // 100 - 20 (severity) - 10 (hours) - 5 (quality) - 15 (exercise)
        assert_eq!(health_score(&inputs, &goals()), 50);
    }

    #[test]
    fn test_score_is_clamped() {
        let worst = HealthInputs {
            average_severity: Some(10.0),
            average_hours_slept: Some(1.0),
            average_sleep_quality: Some(1.0),
            weekly_exercise_minutes: 0.0,
        };
        assert_eq!(health_score(&worst, &goals()), 0);

        let best = HealthInputs {
            average_severity: None,
            average_hours_slept: Some(8.0),
            average_sleep_quality: Some(5.0),
            weekly_exercise_minutes: 600.0,
        };
        assert_eq!(health_score(&best, &goals()), 100);
    }

    #[test]
    fn test_no_data_only_loses_exercise_points() {
        assert_eq!(health_score(&HealthInputs::default(), &goals()), 70);
    }

    #[test]
    fn test_insight_verdicts() {
        assert!(insights(85, &[], &[])[0].starts_with("Excellent"));
        assert!(insights(80, &[], &[])[0].starts_with("Excellent"));
        assert!(insights(79, &[], &[])[0].starts_with("Good progress"));
        assert!(insights(12, &[], &[])[0].starts_with("Several areas"));
    }

    #[test]
    fn test_insights_skip_weak_signals() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let window = TimeWindow::build(as_of, 30, chrono_tz::UTC).unwrap();

        // Empty history: all correlations are zero, no patterns
        let found = insights(
            70,
            &identify_patterns(&[], &window),
            &all_correlations(&[], &window),
        );
        assert_eq!(found.len(), 1);
    }
}
