//! Validation at the ingestion boundary.
//!
//! Raw submissions are checked and normalized into [`LogEntry`] values
//! before anything is stored or computed. Tag vocabularies are folded into
//! canonical [`Tag`]s here so the engine never sees display strings.

use crate::{
    ActivityType, Error, ExerciseLog, Intensity, LogEntry, LogKind, Result, SleepLog, SymptomLog,
    Tag,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Longest exercise session accepted, in minutes
pub const MAX_DURATION_MINUTES: u32 = 1440;

/// Raw sleep submission
#[derive(Clone, Debug)]
pub struct NewSleepLog {
    pub subject_id: String,
    /// Defaults to the wake time
    pub logged_at: Option<DateTime<Utc>>,
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,
    /// Derived from bedtime and wake time when absent
    pub hours_slept: Option<f64>,
    pub quality: u8,
    pub disturbances: Vec<String>,
}

/// Raw exercise submission
#[derive(Clone, Debug)]
pub struct NewExerciseLog {
    pub subject_id: String,
    pub logged_at: DateTime<Utc>,
    pub activity_type: String,
    pub duration_minutes: u32,
    pub intensity: String,
    pub mood_after: Option<u8>,
}

/// Raw symptom submission
#[derive(Clone, Debug)]
pub struct NewSymptomLog {
    pub subject_id: String,
    pub logged_at: DateTime<Utc>,
    pub symptoms: Vec<String>,
    pub severity: u8,
    pub triggers: Vec<String>,
    pub mood: Option<u8>,
}

/// Hours between `bedtime` and `wake_time`, rounded to two decimals
///
/// A wake time earlier than the bedtime is read as the next morning.
pub fn derive_hours(bedtime: DateTime<Utc>, wake_time: DateTime<Utc>) -> f64 {
    let mut hours = (wake_time - bedtime).num_minutes() as f64 / 60.0;
    if hours < 0.0 {
        hours += 24.0;
    }
    (hours * 100.0).round() / 100.0
}

/// Normalize and deduplicate tags, keeping first-seen order
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    for tag in raw.iter().filter_map(|r| Tag::normalize(r.as_ref())) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn check_subject(subject_id: &str) -> Result<String> {
    let trimmed = subject_id.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("subject id must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn check_range(name: &str, value: u8, min: u8, max: u8) -> Result<u8> {
    if value < min || value > max {
        return Err(Error::invalid(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

fn check_mood(name: &str, mood: Option<u8>) -> Result<Option<u8>> {
    mood.map(|m| check_range(name, m, 1, 5)).transpose()
}

fn check_not_future(logged_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if logged_at > now {
        return Err(Error::invalid(format!(
            "logged_at {} is in the future (now is {})",
            logged_at.to_rfc3339(),
            now.to_rfc3339()
        )));
    }
    Ok(logged_at)
}

fn entry(subject_id: String, logged_at: DateTime<Utc>, now: DateTime<Utc>, kind: LogKind) -> LogEntry {
    LogEntry {
        id: Uuid::new_v4(),
        subject_id,
        logged_at,
        created_at: now,
        kind,
    }
}

impl NewSleepLog {
    pub fn validate(self, now: DateTime<Utc>) -> Result<LogEntry> {
        let subject_id = check_subject(&self.subject_id)?;
        let logged_at = check_not_future(self.logged_at.unwrap_or(self.wake_time), now)?;
        let quality = check_range("sleep quality", self.quality, 1, 5)?;

        let hours_slept = match self.hours_slept {
            Some(hours) => hours,
            None => derive_hours(self.bedtime, self.wake_time),
        };
        if !hours_slept.is_finite() || !(0.0..=24.0).contains(&hours_slept) {
            return Err(Error::invalid(format!(
                "hours slept must be between 0 and 24, got {}",
                hours_slept
            )));
        }

        let kind = LogKind::Sleep(SleepLog {
            bedtime: self.bedtime,
            wake_time: self.wake_time,
            hours_slept,
            quality,
            disturbances: normalize_tags(&self.disturbances),
        });
        Ok(entry(subject_id, logged_at, now, kind))
    }
}

impl NewExerciseLog {
    pub fn validate(self, now: DateTime<Utc>) -> Result<LogEntry> {
        let subject_id = check_subject(&self.subject_id)?;
        let logged_at = check_not_future(self.logged_at, now)?;

        let activity_type = ActivityType::parse(&self.activity_type).ok_or_else(|| {
            Error::invalid(format!("unknown activity type: {}", self.activity_type))
        })?;
        let intensity = Intensity::parse(&self.intensity)
            .ok_or_else(|| Error::invalid(format!("unknown intensity: {}", self.intensity)))?;

        if self.duration_minutes == 0 || self.duration_minutes > MAX_DURATION_MINUTES {
            return Err(Error::invalid(format!(
                "duration must be between 1 and {} minutes, got {}",
                MAX_DURATION_MINUTES, self.duration_minutes
            )));
        }

        let kind = LogKind::Exercise(ExerciseLog {
            activity_type,
            duration_minutes: self.duration_minutes,
            intensity,
            mood_after: check_mood("mood after exercise", self.mood_after)?,
        });
        Ok(entry(subject_id, logged_at, now, kind))
    }
}

impl NewSymptomLog {
    pub fn validate(self, now: DateTime<Utc>) -> Result<LogEntry> {
        let subject_id = check_subject(&self.subject_id)?;
        let logged_at = check_not_future(self.logged_at, now)?;
        let severity = check_range("severity", self.severity, 1, 10)?;

        let symptoms = normalize_tags(&self.symptoms);
        if symptoms.is_empty() {
            return Err(Error::invalid("at least one symptom is required"));
        }

        let kind = LogKind::Symptom(SymptomLog {
            symptoms,
            severity,
            triggers: normalize_tags(&self.triggers),
            mood: check_mood("mood", self.mood)?,
        });
        Ok(entry(subject_id, logged_at, now, kind))
    }
}
