//! Daily and weekly series of a numeric field with a direction label.

use crate::rolling::Aggregate;
use crate::window::week_start;
use crate::{LogEntry, TimeWindow, ValueField};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default minimum change between half-window means to call a trend
pub const DEFAULT_TREND_THRESHOLD: f64 = 0.5;

/// Movement of a metric between the first and second half of a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

/// Mean value for one calendar day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub average: f64,
    pub log_count: u32,
}

/// Mean value for one Sunday-start week
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeeklyPoint {
    pub week_starting: NaiveDate,
    pub average: f64,
    pub log_count: u32,
}

/// Series and direction for one field over one window
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trend {
    pub field: ValueField,
    pub daily: Vec<DailyPoint>,
    pub weekly: Vec<WeeklyPoint>,
    pub direction: TrendDirection,
}

/// Analyze `field` over `window`
///
/// Days without a value are omitted from `daily` rather than zeroed. The
/// non-empty days are split in half (the later half gets the odd day);
/// the direction compares the means of the two halves' daily averages
/// against `threshold`. Fewer than two non-empty days is
/// [`TrendDirection::InsufficientData`].
pub fn analyze_trend(
    entries: &[LogEntry],
    window: &TimeWindow,
    field: ValueField,
    threshold: f64,
) -> Trend {
    let mut daily = Vec::new();
    let mut weekly: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for slot in window.slots(entries) {
        let values: Vec<f64> = slot.entries.iter().filter_map(|e| e.value(field)).collect();
        if values.is_empty() {
            continue;
        }

        weekly
            .entry(week_start(slot.date))
            .or_default()
            .extend(values.iter().copied());

        let agg = Aggregate::from_values(values);
        daily.push(DailyPoint {
            date: slot.date,
            average: agg.mean,
            log_count: agg.count,
        });
    }

    let weekly = weekly
        .into_iter()
        .map(|(week_starting, values)| {
            let agg = Aggregate::from_values(values);
            WeeklyPoint {
                week_starting,
                average: agg.mean,
                log_count: agg.count,
            }
        })
        .collect();

    let direction = classify(&daily, threshold);
    tracing::debug!(?field, days = daily.len(), ?direction, "trend");

    Trend {
        field,
        daily,
        weekly,
        direction,
    }
}

fn classify(daily: &[DailyPoint], threshold: f64) -> TrendDirection {
    if daily.len() < 2 {
        return TrendDirection::InsufficientData;
    }

    let (first, second) = daily.split_at(daily.len() / 2);
    let first_mean = Aggregate::from_values(first.iter().map(|p| p.average)).mean;
    let second_mean = Aggregate::from_values(second.iter().map(|p| p.average)).mean;

    if second_mean > first_mean + threshold {
        TrendDirection::Increasing
    } else if second_mean < first_mean - threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}
