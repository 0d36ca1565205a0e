//! Sleep timing regularity.

use crate::clock::{bedtime_minutes, minutes_since_midnight};
use crate::rolling::std_dev;
use crate::{LogEntry, SleepLog, TimeWindow};
use chrono::NaiveDate;

/// A standard deviation of this many minutes or more scores zero
const ZERO_SCORE_STD_DEV_MINUTES: f64 = 180.0;

/// One sleep log per logged night inside `window`, oldest first
///
/// When a night was logged more than once, the latest submission wins.
pub(crate) fn nightly_sleep<'a>(
    entries: &'a [LogEntry],
    window: &TimeWindow,
) -> Vec<(NaiveDate, &'a SleepLog)> {
    window
        .slots(entries)
        .into_iter()
        .filter_map(|slot| {
            let date = slot.date;
            slot.entries
                .into_iter()
                .filter_map(|e| e.as_sleep())
                .last()
                .map(|s| (date, s))
        })
        .collect()
}

fn series_score(minutes: &[f64]) -> Option<f64> {
    let sd = std_dev(minutes)?;
    Some((100.0 * (1.0 - sd / ZERO_SCORE_STD_DEV_MINUTES).max(0.0)).round())
}

/// Score bedtime and wake-time regularity over `window`, 0-100
///
/// Each logged night contributes its bedtime (on the continuous evening
/// scale) and wake time as minutes since local midnight. Each series is
/// scored `round(100 * max(0, 1 - sd / 180))` and the result is the
/// average of the two. Fewer than two nights yields `None`.
pub fn consistency_score(entries: &[LogEntry], window: &TimeWindow) -> Option<u8> {
    let nights = nightly_sleep(entries, window);
    if nights.len() < 2 {
        tracing::debug!(nights = nights.len(), "not enough nights for a consistency score");
        return None;
    }

    let tz = window.timezone();
    let bedtimes: Vec<f64> = nights
        .iter()
        .map(|(_, s)| f64::from(bedtime_minutes(s.bedtime, tz)))
        .collect();
    let wake_times: Vec<f64> = nights
        .iter()
        .map(|(_, s)| f64::from(minutes_since_midnight(s.wake_time, tz)))
        .collect();

    let bedtime_score = series_score(&bedtimes)?;
    let wake_score = series_score(&wake_times)?;
    let score = ((bedtime_score + wake_score) / 2.0).round().clamp(0.0, 100.0);

    tracing::debug!(bedtime_score, wake_score, score, "consistency score");
    Some(score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogKind, SleepLog};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn night(bedtime: DateTime<Utc>, hours: i64) -> LogEntry {
        let wake = bedtime + Duration::hours(hours);
        LogEntry {
            id: Uuid::new_v4(),
            subject_id: "s".into(),
            logged_at: wake,
            created_at: wake,
            kind: LogKind::Sleep(SleepLog {
                bedtime,
                wake_time: wake,
                hours_slept: hours as f64,
                quality: 4,
                disturbances: vec![],
            }),
        }
    }

    fn window() -> TimeWindow {
        let as_of = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        TimeWindow::build(as_of, 30, chrono_tz::UTC).unwrap()
    }

    #[test]
    fn test_identical_timing_scores_100() {
        let entries: Vec<LogEntry> = (1..=10)
            .map(|d| night(Utc.with_ymd_and_hms(2024, 2, d, 23, 0, 0).unwrap(), 8))
            .collect();

        assert_eq!(consistency_score(&entries, &window()), Some(100));
    }

    #[test]
    fn test_midnight_crossing_bedtimes_stay_close() {
        // Alternating 23:50 and 00:10 bedtimes are 20 minutes apart
        let entries: Vec<LogEntry> = (1..=10)
            .map(|d| {
                let bed = if d % 2 == 0 {
                    Utc.with_ymd_and_hms(2024, 2, d, 23, 50, 0).unwrap()
                } else {
                    Utc.with_ymd_and_hms(2024, 2, d + 1, 0, 10, 0).unwrap()
                };
                night(bed, 7)
            })
            .collect();

        let score = consistency_score(&entries, &window()).unwrap();
        assert!(score >= 90, "score was {}", score);
    }

    #[test]
    fn test_spread_bedtimes_score_lower() {
        // Bedtimes spread from 20:00 to 02:00 over six nights
        let entries: Vec<LogEntry> = (0..6u32)
            .map(|i| {
                let bed = Utc.with_ymd_and_hms(2024, 2, 10 + i, 20, 0, 0).unwrap()
                    + Duration::minutes(i64::from(i) * 72);
                night(bed, 8)
            })
            .collect();

        let score = consistency_score(&entries, &window()).unwrap();
        assert!(score < 100);
    }

    #[test]
    fn test_single_night_is_insufficient() {
        let entries = vec![night(Utc.with_ymd_and_hms(2024, 2, 10, 23, 0, 0).unwrap(), 8)];
        assert_eq!(consistency_score(&entries, &window()), None);
        assert_eq!(consistency_score(&[], &window()), None);
    }
}
