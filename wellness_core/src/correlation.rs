//! Cross-metric correlations on daily and weekly pairs.

use crate::window::week_start;
use crate::{LogEntry, TimeWindow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum number of paired days before a daily correlation is reported
const MIN_PAIRED_DAYS: usize = 3;

/// Minimum number of paired weeks before a weekly correlation is reported
const MIN_PAIRED_WEEKS: usize = 2;

/// Qualitative strength of a correlation coefficient
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    None,
}

impl CorrelationStrength {
    pub fn of(coefficient: f64) -> Self {
        let abs = coefficient.abs();
        if abs >= 0.7 {
            CorrelationStrength::Strong
        } else if abs >= 0.4 {
            CorrelationStrength::Moderate
        } else if abs >= 0.2 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "Strong",
            CorrelationStrength::Moderate => "Moderate",
            CorrelationStrength::Weak => "Weak",
            CorrelationStrength::None => "No",
        }
    }
}

/// Calendar unit two metrics are paired on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    Daily,
    /// Sunday-start weeks
    Weekly,
}

/// Correlation between two metrics
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Correlation {
    pub metric_a: &'static str,
    pub metric_b: &'static str,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
    pub pairing: Pairing,
    /// Number of days or weeks with both metrics
    pub pairs: u32,
    pub description: String,
}

impl Correlation {
    fn new(
        metric_a: &'static str,
        metric_b: &'static str,
        coefficient: f64,
        pairing: Pairing,
        pairs: usize,
    ) -> Self {
        let strength = CorrelationStrength::of(coefficient);
        Self {
            metric_a,
            metric_b,
            coefficient,
            strength,
            pairing,
            pairs: pairs as u32,
            description: describe(metric_a, metric_b, coefficient, strength),
        }
    }
}

fn describe(
    metric_a: &str,
    metric_b: &str,
    coefficient: f64,
    strength: CorrelationStrength,
) -> String {
    let a = metric_a.replace('_', " ");
    let b = metric_b.replace('_', " ");
    match strength {
        CorrelationStrength::None => format!("No significant correlation between {} and {}", a, b),
        _ => {
            let direction = if coefficient > 0.0 { "positive" } else { "negative" };
            format!("{} {} correlation between {} and {}", strength.label(), direction, a, b)
        }
    }
}

/// Pearson correlation coefficient rounded to three decimals
///
/// Returns 0 for mismatched or empty inputs and for zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return 0.0;
    }
    let nf = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = nf * sum_xy - sum_x * sum_y;
    let denominator = ((nf * sum_x2 - sum_x * sum_x) * (nf * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    ((numerator / denominator) * 1000.0).round() / 1000.0
}

/// Values picked from `entries` inside `window`, grouped by `bucket` of
/// their local date
fn grouped<F>(
    entries: &[LogEntry],
    window: &TimeWindow,
    bucket: fn(NaiveDate) -> NaiveDate,
    mut pick: F,
) -> BTreeMap<NaiveDate, Vec<f64>>
where
    F: FnMut(&LogEntry) -> Option<f64>,
{
    let mut groups: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for entry in window.entries_within(entries) {
        if let Some(value) = pick(entry) {
            groups
                .entry(bucket(window.local_date(entry.logged_at)))
                .or_default()
                .push(value);
        }
    }
    groups
}

fn same_day(date: NaiveDate) -> NaiveDate {
    date
}

fn paired(
    a: &BTreeMap<NaiveDate, Vec<f64>>,
    b: &BTreeMap<NaiveDate, Vec<f64>>,
    fold_a: fn(&[f64]) -> f64,
    fold_b: fn(&[f64]) -> f64,
) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .filter_map(|(date, xs)| b.get(date).map(|ys| (fold_a(xs), fold_b(ys))))
        .unzip()
}

fn last(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(0.0)
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        sum(values) / values.len() as f64
    }
}

/// Pearson over `x`, `y` once there are at least `min_pairs`, else 0
///
/// `invert` flips the sign for metrics where lower is better. Never -0.0.
fn coefficient_for(x: &[f64], y: &[f64], min_pairs: usize, invert: bool) -> f64 {
    if x.len() < min_pairs {
        return 0.0;
    }
    let r = pearson(x, y);
    (if invert { -r } else { r }) + 0.0
}

/// Sleep quality against same-day mean symptom severity
///
/// The sign is inverted, so a positive coefficient means better sleep
/// goes with milder symptoms.
pub fn sleep_quality_vs_severity(entries: &[LogEntry], window: &TimeWindow) -> Correlation {
    let quality = grouped(entries, window, same_day, |e| {
        e.as_sleep().map(|s| f64::from(s.quality))
    });
    let severity = grouped(entries, window, same_day, |e| {
        e.as_symptom().map(|s| f64::from(s.severity))
    });
    let (x, y) = paired(&quality, &severity, last, mean);

    let coefficient = coefficient_for(&x, &y, MIN_PAIRED_DAYS, true);
    Correlation::new("sleep_quality", "symptom_severity", coefficient, Pairing::Daily, x.len())
}

/// Weekly exercise minutes against the week's mean symptom severity
///
/// Only weeks with both exercise and symptom logs pair up. The sign is
/// inverted, so a positive coefficient means more exercise goes with
/// milder symptoms.
pub fn exercise_minutes_vs_severity(entries: &[LogEntry], window: &TimeWindow) -> Correlation {
    let minutes = grouped(entries, window, week_start, |e| {
        e.as_exercise().map(|x| f64::from(x.duration_minutes))
    });
    let severity = grouped(entries, window, week_start, |e| {
        e.as_symptom().map(|s| f64::from(s.severity))
    });
    let (x, y) = paired(&minutes, &severity, sum, mean);

    let coefficient = coefficient_for(&x, &y, MIN_PAIRED_WEEKS, true);
    Correlation::new("exercise_minutes", "symptom_severity", coefficient, Pairing::Weekly, x.len())
}

/// Hours slept against same-day total exercise minutes
pub fn sleep_hours_vs_exercise(entries: &[LogEntry], window: &TimeWindow) -> Correlation {
    let hours = grouped(entries, window, same_day, |e| e.as_sleep().map(|s| s.hours_slept));
    let minutes = grouped(entries, window, same_day, |e| {
        e.as_exercise().map(|x| f64::from(x.duration_minutes))
    });
    let (x, y) = paired(&hours, &minutes, last, sum);

    let coefficient = coefficient_for(&x, &y, MIN_PAIRED_DAYS, false);
    Correlation::new("sleep_hours", "exercise_minutes", coefficient, Pairing::Daily, x.len())
}

/// Every correlation the engine reports, in a fixed order
pub fn all_correlations(entries: &[LogEntry], window: &TimeWindow) -> Vec<Correlation> {
    vec![
        sleep_quality_vs_severity(entries, window),
        exercise_minutes_vs_severity(entries, window),
        sleep_hours_vs_exercise(entries, window),
    ]
}
