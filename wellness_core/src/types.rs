//! Core domain types for the wellness tracking engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Canonical tags (disturbances, symptoms, triggers)
//! - The three kinds of subject-submitted log entries
//! - Field selectors used by the aggregating components

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Tags
// ============================================================================

/// A canonical categorical tag (e.g. `WOKE_FREQUENTLY`, `HEADACHE`)
///
/// Display strings and backend codes are folded into one form at ingestion:
/// uppercase ASCII words joined by single underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Normalize a raw tag. Returns `None` when nothing alphanumeric remains.
    pub fn normalize(raw: &str) -> Option<Self> {
        let words: Vec<String> = raw
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_uppercase())
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(Tag(words.join("_")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Exercise vocabulary
// ============================================================================

/// Kind of physical activity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Walking,
    Running,
    Cycling,
    Swimming,
    Yoga,
    Pilates,
    Weightlifting,
    Gym,
    Sports,
    Dancing,
    Hiking,
    MartialArts,
    Stretching,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 14] = [
        ActivityType::Walking,
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Yoga,
        ActivityType::Pilates,
        ActivityType::Weightlifting,
        ActivityType::Gym,
        ActivityType::Sports,
        ActivityType::Dancing,
        ActivityType::Hiking,
        ActivityType::MartialArts,
        ActivityType::Stretching,
        ActivityType::Other,
    ];

    /// Parse from either a display string ("Martial arts") or a code ("MARTIAL_ARTS")
    pub fn parse(s: &str) -> Option<Self> {
        let tag = Tag::normalize(s)?;
        Self::ALL.into_iter().find(|a| a.code() == tag.as_str())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ActivityType::Walking => "WALKING",
            ActivityType::Running => "RUNNING",
            ActivityType::Cycling => "CYCLING",
            ActivityType::Swimming => "SWIMMING",
            ActivityType::Yoga => "YOGA",
            ActivityType::Pilates => "PILATES",
            ActivityType::Weightlifting => "WEIGHTLIFTING",
            ActivityType::Gym => "GYM",
            ActivityType::Sports => "SPORTS",
            ActivityType::Dancing => "DANCING",
            ActivityType::Hiking => "HIKING",
            ActivityType::MartialArts => "MARTIAL_ARTS",
            ActivityType::Stretching => "STRETCHING",
            ActivityType::Other => "OTHER",
        }
    }
}

/// Perceived exercise intensity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Low, Intensity::Moderate, Intensity::High];

    pub fn parse(s: &str) -> Option<Self> {
        match Tag::normalize(s)?.as_str() {
            "LOW" => Some(Intensity::Low),
            "MODERATE" => Some(Intensity::Moderate),
            "HIGH" => Some(Intensity::High),
            _ => None,
        }
    }
}

// ============================================================================
// Log entries
// ============================================================================

/// One night of sleep
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SleepLog {
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,
    pub hours_slept: f64,
    /// 1-5
    pub quality: u8,
    #[serde(default)]
    pub disturbances: Vec<Tag>,
}

/// One exercise session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseLog {
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    /// 1-5
    #[serde(default)]
    pub mood_after: Option<u8>,
}

/// One symptom diary entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SymptomLog {
    pub symptoms: Vec<Tag>,
    /// 1-10
    pub severity: u8,
    #[serde(default)]
    pub triggers: Vec<Tag>,
    /// 1-5
    #[serde(default)]
    pub mood: Option<u8>,
}

/// Payload of a log entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogKind {
    Sleep(SleepLog),
    Exercise(ExerciseLog),
    Symptom(SymptomLog),
}

/// Coarse category of a log entry, used to select qualifying activity days
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Sleep,
    Exercise,
    Symptom,
}

/// A subject-submitted record of a tracked activity
///
/// Entries are validated at ingestion (see [`crate::ingest`]); the engine
/// assumes field ranges hold and never mutates an entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: Uuid,
    pub subject_id: String,
    pub logged_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: LogKind,
}

impl LogEntry {
    pub fn category(&self) -> LogCategory {
        match self.kind {
            LogKind::Sleep(_) => LogCategory::Sleep,
            LogKind::Exercise(_) => LogCategory::Exercise,
            LogKind::Symptom(_) => LogCategory::Symptom,
        }
    }

    pub fn as_sleep(&self) -> Option<&SleepLog> {
        match &self.kind {
            LogKind::Sleep(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_exercise(&self) -> Option<&ExerciseLog> {
        match &self.kind {
            LogKind::Exercise(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_symptom(&self) -> Option<&SymptomLog> {
        match &self.kind {
            LogKind::Symptom(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of `field`, or `None` when this kind of entry does not carry it
    pub fn value(&self, field: ValueField) -> Option<f64> {
        match (&self.kind, field) {
            (LogKind::Sleep(s), ValueField::HoursSlept) => Some(s.hours_slept),
            (LogKind::Sleep(s), ValueField::Quality) => Some(f64::from(s.quality)),
            (LogKind::Exercise(e), ValueField::DurationMinutes) => {
                Some(f64::from(e.duration_minutes))
            }
            (LogKind::Exercise(e), ValueField::Mood) => e.mood_after.map(f64::from),
            (LogKind::Symptom(s), ValueField::Severity) => Some(f64::from(s.severity)),
            (LogKind::Symptom(s), ValueField::Mood) => s.mood.map(f64::from),
            _ => None,
        }
    }

    /// Tags recorded under `field`; empty when this kind of entry does not carry it
    pub fn tags(&self, field: TagField) -> &[Tag] {
        match (&self.kind, field) {
            (LogKind::Sleep(s), TagField::Disturbances) => &s.disturbances,
            (LogKind::Symptom(s), TagField::Symptoms) => &s.symptoms,
            (LogKind::Symptom(s), TagField::Triggers) => &s.triggers,
            _ => &[],
        }
    }
}

// ============================================================================
// Field selectors
// ============================================================================

/// Numeric field an aggregate or trend is computed over
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValueField {
    /// Exercise duration in minutes
    DurationMinutes,
    /// Sleep duration in hours
    HoursSlept,
    /// Sleep quality (1-5)
    Quality,
    /// Symptom severity (1-10)
    Severity,
    /// Symptom mood or post-exercise mood (1-5)
    Mood,
}

/// Categorical tag field a frequency ranking is computed over
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    Disturbances,
    Symptoms,
    Triggers,
}
