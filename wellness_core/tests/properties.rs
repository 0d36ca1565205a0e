//! Property tests for the metric components.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::BTreeSet;
use uuid::Uuid;
use wellness_core::bedtime::recommend_bedtime;
use wellness_core::consistency::consistency_score;
use wellness_core::goal::progress;
use wellness_core::report::wellness_report;
use wellness_core::rolling::aggregate;
use wellness_core::sleep_debt::sleep_debt;
use wellness_core::streak::compute_streaks;
use wellness_core::trend::{analyze_trend, TrendDirection};
use wellness_core::window::MAX_WINDOW_DAYS;
use wellness_core::*;

fn entry(at: DateTime<Utc>, kind: LogKind) -> LogEntry {
    LogEntry {
        id: Uuid::new_v4(),
        subject_id: "subject".into(),
        logged_at: at,
        created_at: at,
        kind,
    }
}

fn night(bedtime: DateTime<Utc>, hours: f64) -> LogEntry {
    let wake = bedtime + Duration::minutes((hours * 60.0).round() as i64);
    entry(
        wake,
        LogKind::Sleep(SleepLog {
            bedtime,
            wake_time: wake,
            hours_slept: hours,
            quality: 4,
            disturbances: vec![],
        }),
    )
}

fn symptom(at: DateTime<Utc>, severity: u8) -> LogEntry {
    entry(
        at,
        LogKind::Symptom(SymptomLog {
            symptoms: vec![Tag::normalize("fatigue").unwrap()],
            severity,
            triggers: vec![],
            mood: None,
        }),
    )
}

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 31, 20, 0, 0).unwrap()
}

fn date(day: i64) -> NaiveDate {
    as_of().date_naive() - Duration::days(day)
}

/// Thirty nights of 23:00 to 07:00 ending on the as-of morning
fn regular_month() -> Vec<LogEntry> {
    (0..30)
        .map(|i| {
            let bedtime = Utc.with_ymd_and_hms(2024, 7, 30, 23, 0, 0).unwrap() - Duration::days(i);
            night(bedtime, 8.0)
        })
        .collect()
}

#[test]
fn test_thirty_day_round_trip() {
    let entries = regular_month();
    let window = TimeWindow::build(as_of(), 30, chrono_tz::UTC).unwrap();

    assert_eq!(recommend_bedtime(&entries, &window).unwrap().to_string(), "23:00");
    assert_eq!(consistency_score(&entries, &window), Some(100));
    assert_eq!(sleep_debt(&entries, &window, 8.0).unwrap().debt_hours, 0.0);
}

#[test]
fn test_short_week_accumulates_debt() {
    let window = TimeWindow::build(as_of(), 7, chrono_tz::UTC).unwrap();
    let week: Vec<LogEntry> = (0..7)
        .map(|i| night(Utc.with_ymd_and_hms(2024, 7, 31, 0, 30, 0).unwrap() - Duration::days(i), 6.0))
        .collect();

    assert_eq!(sleep_debt(&week, &window, 8.0).unwrap().debt_hours, 14.0);
}

#[test]
fn test_goal_progress_examples() {
    assert_eq!(progress(150.0, 150.0).unwrap().percent, 100.0);
    assert_eq!(progress(75.0, 150.0).unwrap().percent, 50.0);
    assert!(matches!(progress(75.0, 0.0), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_trend_examples() {
    let window = TimeWindow::build(as_of(), 10, chrono_tz::UTC).unwrap();
    let rising: Vec<LogEntry> = (1..=10u8)
        .map(|s| symptom(as_of() - Duration::days(10 - i64::from(s)), s))
        .collect();
    let flat: Vec<LogEntry> = (0..10).map(|d| symptom(as_of() - Duration::days(d), 4)).collect();

    assert_eq!(
        analyze_trend(&rising, &window, ValueField::Severity, 0.5).direction,
        TrendDirection::Increasing
    );
    assert_eq!(
        analyze_trend(&flat, &window, ValueField::Severity, 0.5).direction,
        TrendDirection::Stable
    );
}

#[test]
fn test_empty_input_never_fails() {
    let window = TimeWindow::build(as_of(), 90, chrono_tz::UTC).unwrap();

    assert_eq!(aggregate(&[], &window, ValueField::Severity).count, 0);
    assert_eq!(aggregate(&[], &window, ValueField::Severity).mean, 0.0);
    assert_eq!(consistency_score(&[], &window), None);
    assert_eq!(recommend_bedtime(&[], &window), None);
    assert_eq!(sleep_debt(&[], &window, 8.0).unwrap().debt_hours, 0.0);
    assert!(analyze_trend(&[], &window, ValueField::Quality, 0.5).daily.is_empty());
    assert_eq!(compute_streaks(&BTreeSet::new(), as_of().date_naive()).longest_streak, 0);
}

proptest! {
    #[test]
    fn rolling_count_matches_filter(minutes_ago in prop::collection::vec(0i64..(60 * 1440), 0..60), len in 1i64..45) {
        let entries: Vec<LogEntry> = minutes_ago
            .iter()
            .map(|&m| symptom(as_of() - Duration::minutes(m), 3))
            .collect();
        let window = TimeWindow::build(as_of(), len, chrono_tz::UTC).unwrap();

        let expected = entries
            .iter()
            .filter(|e| {
                let d = e.logged_at.date_naive();
                d >= window.start() && d <= window.end()
            })
            .count();
        prop_assert_eq!(aggregate(&entries, &window, ValueField::Severity).count as usize, expected);
    }

    #[test]
    fn window_length_is_checked_not_panicking(len in any::<i64>()) {
        let built = TimeWindow::build(as_of(), len, chrono_tz::UTC);
        if (1..=MAX_WINDOW_DAYS).contains(&len) {
            prop_assert_eq!(built.unwrap().len_days(), len);
        } else {
            prop_assert!(matches!(built, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn unbroken_run_is_current_and_longest(n in 1i64..120) {
        let dates: BTreeSet<NaiveDate> = (0..n).map(date).collect();
        let streaks = compute_streaks(&dates, date(0));
        prop_assert_eq!(streaks.current_streak as i64, n);
        prop_assert_eq!(streaks.longest_streak as i64, n);
    }

    #[test]
    fn gap_splits_run(n in 3i64..120, gap_seed in any::<prop::sample::Index>()) {
        // Remove one interior day
        let gap = 1 + gap_seed.index((n - 2) as usize) as i64;
        let dates: BTreeSet<NaiveDate> = (0..n).filter(|&d| d != gap).map(date).collect();
        let streaks = compute_streaks(&dates, date(0));

        let newer = gap;
        let older = n - gap - 1;
        prop_assert_eq!(streaks.current_streak as i64, newer);
        prop_assert_eq!(streaks.longest_streak as i64, newer.max(older));
    }

    #[test]
    fn spread_bedtimes_score_below_identical(nights in 3i64..30) {
        // Bedtimes spread evenly from 21:00 to 03:00
        let window = TimeWindow::build(as_of(), 30, chrono_tz::UTC).unwrap();
        let entries: Vec<LogEntry> = (0..nights)
            .map(|i| {
                let evening = Utc.with_ymd_and_hms(2024, 7, 30, 21, 0, 0).unwrap() - Duration::days(i);
                night(evening + Duration::minutes(i * 360 / (nights - 1)), 8.0)
            })
            .collect();

        let score = consistency_score(&entries, &window).unwrap();
        prop_assert!(score < 100);
        prop_assert_eq!(consistency_score(&regular_month(), &window), Some(100));
    }

    #[test]
    fn report_ignores_input_order(shuffled in Just(regular_month()).prop_shuffle()) {
        let config = Config::default();
        let request = ReportRequest::new(as_of(), &config.engine).unwrap();

        let ordered = wellness_report("subject", &regular_month(), &request, &config).unwrap();
        let reordered = wellness_report("subject", &shuffled, &request, &config).unwrap();
        prop_assert_eq!(ordered, reordered);
    }

    #[test]
    fn debt_is_never_negative(hours in prop::collection::vec(0.0f64..24.0, 0..30), target in 1.0f64..12.0) {
        let window = TimeWindow::build(as_of(), 30, chrono_tz::UTC).unwrap();
        let entries: Vec<LogEntry> = hours
            .iter()
            .enumerate()
            .map(|(i, &h)| night(Utc.with_ymd_and_hms(2024, 7, 30, 22, 0, 0).unwrap() - Duration::days(i as i64), h))
            .collect();

        let debt = sleep_debt(&entries, &window, target).unwrap();
        prop_assert!(debt.debt_hours >= 0.0);
        prop_assert!(debt.debt_hours <= target * hours.len() as f64 + 1e-9);
    }
}
