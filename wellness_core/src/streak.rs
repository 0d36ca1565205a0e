//! Consecutive-day activity streaks.
//!
//! Streaks are computed from the set of calendar dates with at least one
//! qualifying log, so several logs on one day count once.

use crate::{LogCategory, LogEntry};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current and longest runs of consecutive logged days
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Which date a report's current streak is walked back from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakAnchor {
    /// The most recent logged date on or before the as-of date
    #[default]
    LastLog,
    /// The as-of date itself; a log-less as-of day yields zero
    AsOf,
}

impl StreakAnchor {
    /// Resolve the walk-back start date for `as_of`
    pub fn resolve(&self, dates: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> NaiveDate {
        match self {
            StreakAnchor::AsOf => as_of,
            StreakAnchor::LastLog => dates.range(..=as_of).next_back().copied().unwrap_or(as_of),
        }
    }
}

/// Local dates on which `entries` of `category` were logged
pub fn activity_dates(entries: &[LogEntry], category: LogCategory, tz: Tz) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .filter(|e| e.category() == category)
        .map(|e| crate::window::local_date(e.logged_at, tz))
        .collect()
}

/// Compute streaks over `dates`
///
/// The current streak walks backward from `as_of` and stops at the first
/// date without a log; if `as_of` itself has none, it is zero. The longest
/// streak covers the whole history regardless of `as_of`.
pub fn compute_streaks(dates: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> Streaks {
    let mut current = 0u32;
    let mut cursor = Some(as_of);
    while let Some(date) = cursor.filter(|d| dates.contains(d)) {
        current += 1;
        cursor = date.pred_opt();
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for &date in dates {
        run = match previous {
            Some(prev) if date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    tracing::trace!(current, longest, days = dates.len(), "computed streaks");

    Streaks {
        current_streak: current,
        longest_streak: longest,
    }
}
