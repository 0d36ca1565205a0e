//! Integration tests for the wellness binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging workflow and ingestion validation
//! - Report output for each report kind
//! - Batch sweeps over the store
//! - Configuration overrides

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from the user's config file
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wellness"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn log_night(temp_dir: &TempDir, data_dir: &Path, subject: &str, day: u32, quality: u8) {
    cli(temp_dir)
        .args(["log", "sleep", "--subject", subject])
        .arg("--bedtime")
        .arg(format!("2024-03-{:02}T23:00:00Z", day))
        .arg("--wake")
        .arg(format!("2024-03-{:02}T07:00:00Z", day + 1))
        .arg("--quality")
        .arg(quality.to_string())
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wellness tracking analytics"));
}

#[test]
fn test_log_sleep_writes_store() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .args(["log", "sleep", "--subject", "client-1"])
        .args(["--bedtime", "2024-03-01T23:30:00Z", "--wake", "2024-03-02T06:45:00Z"])
        .args(["--quality", "3", "--disturbance", "Woke frequently"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sleep log recorded for client-1"));

    let content = fs::read_to_string(data_dir.join("logs.jsonl")).expect("Failed to read store");
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\"kind\":\"sleep\""));
    assert!(content.contains("\"hours_slept\":7.25"));
    assert!(content.contains("WOKE_FREQUENTLY"));
}

#[test]
fn test_log_rejects_invalid_values() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .args(["log", "sleep", "--subject", "client-1"])
        .args(["--bedtime", "2024-03-01T23:00:00Z", "--wake", "2024-03-02T07:00:00Z"])
        .args(["--quality", "9"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sleep quality"));

    cli(&temp_dir)
        .args(["log", "symptom", "--subject", "client-1"])
        .args(["--symptom", "headache", "--severity", "4"])
        .args(["--at", "2999-01-01T00:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("in the future"));

    assert!(!data_dir.join("logs.jsonl").exists());
}

#[test]
fn test_sleep_report_for_regular_sleeper() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    for day in 1..=7 {
        log_night(&temp_dir, &data_dir, "client-1", day, 4);
    }

    let output = cli(&temp_dir)
        .args(["report", "--subject", "client-1", "--kind", "sleep"])
        .args(["--days", "7", "--as-of", "2024-03-08T12:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("report is JSON");
    assert_eq!(report["recommended_bedtime"], "23:00");
    assert_eq!(report["consistency_score"], 100);
    assert_eq!(report["sleep_debt"]["debt_hours"], 0.0);
    assert_eq!(report["streaks"]["current_streak"], 7);
    assert_eq!(report["hours_trend"]["direction"], "stable");
}

#[test]
fn test_full_report_includes_goals() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    log_night(&temp_dir, &data_dir, "client-2", 10, 2);
    cli(&temp_dir)
        .args(["log", "exercise", "--subject", "client-2"])
        .args(["--activity", "Martial arts", "--minutes", "45", "--intensity", "high"])
        .args(["--at", "2024-03-11T18:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let output = cli(&temp_dir)
        .args(["report", "--subject", "client-2", "--as-of", "2024-03-11T21:00:00Z"])
        .args(["--wake", "06:30"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("report is JSON");
    assert_eq!(report["subject_id"], "client-2");
    assert_eq!(report["window_days"], 30);
    assert_eq!(report["sleep"]["bedtime_for_target_wake"], "22:30");
    assert_eq!(
        report["exercise"]["stats"]["most_frequent_activity"]["activity"],
        "MARTIAL_ARTS"
    );
    assert_eq!(report["goals"]["goals_total"], 6);
    assert_eq!(report["correlations"].as_array().map(|c| c.len()), Some(3));
    assert_eq!(report["correlations"][1]["pairing"], "weekly");
    assert!(report["health_score"].as_u64().is_some_and(|score| score <= 100));
    assert!(report["patterns"].is_array());
    assert!(report["insights"][0].is_string());
}

#[test]
fn test_report_rejects_bad_window() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .args(["report", "--subject", "nobody", "--days", "0"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidArgument"));

    cli(&temp_dir)
        .args(["report", "--subject", "nobody", "--tz", "Mars/Olympus_Mons"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidTimezone"));

    for days in ["90000000", "200000000000000", "9223372036854775807"] {
        cli(&temp_dir)
            .args(["report", "--subject", "nobody", "--days", days])
            .arg("--data-dir")
            .arg(&data_dir)
            .assert()
            .failure()
            .stderr(predicate::str::contains("InvalidArgument"));
    }
}

#[test]
fn test_empty_report_succeeds() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .args(["report", "--subject", "nobody", "--kind", "symptom"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("insufficient_data"));
}

#[test]
fn test_sweep_prints_one_line_per_subject() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    for subject in ["zoe", "adam", "mia"] {
        log_night(&temp_dir, &data_dir, subject, 3, 3);
    }

    let output = cli(&temp_dir)
        .args(["sweep", "--workers", "2", "--as-of", "2024-03-05T12:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("utf-8 output");
    let subjects: Vec<String> = stdout
        .lines()
        .map(|line| {
            let report: serde_json::Value = serde_json::from_str(line).expect("line is JSON");
            report["subject_id"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(subjects, vec!["adam", "mia", "zoe"]);
}

#[test]
fn test_sweep_survives_corrupt_store_lines() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    log_night(&temp_dir, &data_dir, "adam", 3, 3);
    {
        use std::io::Write;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(data_dir.join("logs.jsonl"))
            .expect("open store");
        file.write_all(b"\xff\xfe not a log\n").expect("write garbage");
    }
    log_night(&temp_dir, &data_dir, "mia", 3, 3);

    let output = cli(&temp_dir)
        .args(["sweep", "--as-of", "2024-03-05T12:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping unreadable log line"))
        .get_output()
        .stdout
        .clone();

    assert_eq!(String::from_utf8_lossy(&output).lines().count(), 2);
}

#[test]
fn test_verbose_flag_logs_progress() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    log_night(&temp_dir, &data_dir, "adam", 3, 3);

    cli(&temp_dir)
        .args(["sweep", "-v", "--as-of", "2024-03-05T12:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("starting sweep"));

    cli(&temp_dir)
        .args(["sweep", "--as-of", "2024-03-05T12:00:00Z"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("starting sweep").not());
}

#[test]
fn test_config_file_sets_timezone() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(
        &config_path,
        "[engine]\ntimezone = \"Asia/Tokyo\"\nwindow_days = 14\n",
    )
    .expect("Failed to write config");

    cli(&temp_dir)
        .args(["report", "--subject", "nobody"])
        .arg("--config")
        .arg(&config_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timezone\": \"Asia/Tokyo\""))
        .stdout(predicate::str::contains("\"window_days\": 14"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[goals]\nweekly_exercise_minutes = 0.0\n").expect("write config");

    cli(&temp_dir)
        .args(["sweep"])
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("weekly_exercise_minutes"));
}
