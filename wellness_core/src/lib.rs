#![forbid(unsafe_code)]

//! Core domain model and analytics engine for the wellness tracker.
//!
//! This crate provides:
//! - Domain types (sleep, exercise and symptom logs, canonical tags)
//! - Validation at the ingestion boundary
//! - Calendar windows, streaks, rolling aggregates and goal progress
//! - Sleep consistency, sleep debt and bedtime recommendation
//! - Trend, frequency, exercise and correlation analysis
//! - Pattern detection, an overall health score and insights
//! - Per-subject reports, batch sweeps and JSONL persistence

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod ingest;
pub mod store;
pub mod window;
pub mod clock;
pub mod streak;
pub mod rolling;
pub mod goal;
pub mod consistency;
pub mod sleep_debt;
pub mod bedtime;
pub mod trend;
pub mod frequency;
pub mod exercise_stats;
pub mod correlation;
pub mod patterns;
pub mod health;
pub mod report;
pub mod sweep;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use window::{parse_timezone, TimeWindow};
pub use clock::ClockTime;
pub use ingest::{NewExerciseLog, NewSleepLog, NewSymptomLog};
pub use store::{JsonlLogStore, LogStore};
pub use report::{load_report, wellness_report, ReportRequest, WellnessReport};
pub use sweep::{sweep, SweepResult};
