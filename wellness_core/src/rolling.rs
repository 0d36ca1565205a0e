//! Count/sum/mean of a numeric field over a window.

use crate::{LogEntry, TimeWindow, ValueField};
use serde::Serialize;

/// Aggregate of one field over one window
///
/// `mean` is 0 when `count` is 0; check `count` to tell "no data" apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub count: u32,
    pub sum: f64,
    pub mean: f64,
}

impl Aggregate {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (count, sum) = values
            .into_iter()
            .fold((0u32, 0.0f64), |(n, s), v| (n + 1, s + v));
        let mean = if count > 0 { sum / f64::from(count) } else { 0.0 };
        Aggregate { count, sum, mean }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Population standard deviation; `None` for an empty slice
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Median; the mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Aggregate `field` over entries logged inside `window`
///
/// Entries that do not carry `field` (a sleep log when aggregating
/// severity, an exercise log without a mood) are not counted.
pub fn aggregate(entries: &[LogEntry], window: &TimeWindow, field: ValueField) -> Aggregate {
    // Sum in chronological order so float rounding is order-independent
    let agg = Aggregate::from_values(
        window
            .entries_within(entries)
            .into_iter()
            .filter_map(|e| e.value(field)),
    );

    tracing::trace!(?field, count = agg.count, sum = agg.sum, "aggregated window");
    agg
}
