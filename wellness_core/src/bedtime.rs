//! Bedtime recommendation from bedtime history.

use crate::clock::{bedtime_minutes, ClockTime, MINUTES_PER_DAY};
use crate::consistency::nightly_sleep;
use crate::rolling::median;
use crate::{Error, LogEntry, Result, TimeWindow};

/// Median historical bedtime over `window`, or `None` with no sleep logs
///
/// The median is taken on the continuous evening scale, so a history of
/// 23:40 and 00:20 recommends 00:00 rather than noon.
pub fn recommend_bedtime(entries: &[LogEntry], window: &TimeWindow) -> Option<ClockTime> {
    let tz = window.timezone();
    let bedtimes: Vec<f64> = nightly_sleep(entries, window)
        .into_iter()
        .map(|(_, s)| f64::from(bedtime_minutes(s.bedtime, tz)))
        .collect();

    let minutes = median(&bedtimes)?.round() as u32;
    let recommended = ClockTime::from_minutes(minutes);

    tracing::debug!(nights = bedtimes.len(), %recommended, "recommended bedtime");
    Some(recommended)
}

/// Bedtime that still fits `target_hours` of sleep before `target_wake`
///
/// The deadline is `target_wake - target_hours`. A historical median that
/// already falls at or before the deadline is kept; a later one is pulled
/// back to the deadline. Without history the deadline itself is returned.
pub fn recommend_for_wake(
    entries: &[LogEntry],
    window: &TimeWindow,
    target_wake: ClockTime,
    target_hours: f64,
) -> Result<ClockTime> {
    if !target_hours.is_finite() || target_hours <= 0.0 || target_hours >= 24.0 {
        return Err(Error::invalid(format!(
            "sleep target must be between 0 and 24 hours, got {}",
            target_hours
        )));
    }

    // Deadline on the evening scale: wake on the next morning, minus the target
    let sleep_minutes = (target_hours * 60.0).round() as u32;
    let deadline = continuous(target_wake.minutes() + MINUTES_PER_DAY - sleep_minutes);

    let chosen = match recommend_bedtime(entries, window) {
        Some(historical) if continuous(historical.minutes()) <= deadline => historical,
        _ => ClockTime::from_minutes(deadline),
    };

    Ok(chosen)
}

/// Re-map a 0..1440 time of day to the evening scale
fn continuous(minutes: u32) -> u32 {
    let minutes = minutes % MINUTES_PER_DAY;
    if minutes < MINUTES_PER_DAY / 2 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}
