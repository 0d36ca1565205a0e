//! Log persistence.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! so the CLI and a concurrent sweep can share one store.

use crate::{LogEntry, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Source and sink of raw log entries
pub trait LogStore {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    /// Entries for `subject_id` logged within `[from, to]`
    fn fetch(
        &self,
        subject_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>>;

    /// Every subject with at least one entry, sorted
    fn subjects(&self) -> Result<Vec<String>>;

    /// Entries for each of `subjects` logged within `[from, to]`
    ///
    /// Every requested subject gets a key, empty when it has no entries.
    fn fetch_many(
        &self,
        subjects: &[&str],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BTreeMap<String, Vec<LogEntry>>> {
        subjects
            .iter()
            .map(|&subject| -> Result<(String, Vec<LogEntry>)> {
                Ok((subject.to_string(), self.fetch(subject, from, to)?))
            })
            .collect()
    }
}

/// JSONL-based log store with file locking
pub struct JsonlLogStore {
    path: PathBuf,
}

impl JsonlLogStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl LogStore for JsonlLogStore {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            id = %entry.id,
            subject = %entry.subject_id,
            category = ?entry.category(),
            "appended log entry"
        );
        Ok(())
    }

    fn fetch(
        &self,
        subject_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>> {
        let entries: Vec<LogEntry> = read_entries(&self.path)?
            .into_iter()
            .filter(|e| e.subject_id == subject_id && e.logged_at >= from && e.logged_at <= to)
            .collect();
        tracing::debug!(subject = subject_id, count = entries.len(), "fetched log entries");
        Ok(entries)
    }

    fn subjects(&self) -> Result<Vec<String>> {
        let subjects: BTreeSet<String> = read_entries(&self.path)?
            .into_iter()
            .map(|e| e.subject_id)
            .collect();
        Ok(subjects.into_iter().collect())
    }

    /// One pass over the file, partitioned by subject
    fn fetch_many(
        &self,
        subjects: &[&str],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BTreeMap<String, Vec<LogEntry>>> {
        let mut by_subject: BTreeMap<String, Vec<LogEntry>> =
            subjects.iter().map(|s| (s.to_string(), Vec::new())).collect();

        for entry in read_entries(&self.path)? {
            if entry.logged_at < from || entry.logged_at > to {
                continue;
            }
            if let Some(bucket) = by_subject.get_mut(entry.subject_id.as_str()) {
                bucket.push(entry);
            }
        }

        tracing::debug!(subjects = by_subject.len(), "fetched log entries in one pass");
        Ok(by_subject)
    }
}

/// Read every entry from a JSONL log file
///
/// A missing file reads as empty. Lines that are not valid UTF-8 or not a
/// log entry are skipped with a warning; only I/O failures are errors.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for (index, raw) in BufReader::new(&file).split(b'\n').enumerate() {
        let raw = raw?;
        match parse_line(&raw) {
            Some(Ok(entry)) => entries.push(entry),
            Some(Err(e)) => {
                skipped += 1;
                tracing::warn!(line = index + 1, error = %e, "skipping unreadable log line");
            }
            None => {}
        }
    }

    file.unlock()?;
    tracing::debug!(read = entries.len(), skipped, path = ?path, "read log store");
    Ok(entries)
}

/// `None` for blank lines
fn parse_line(raw: &[u8]) -> Option<serde_json::Result<LogEntry>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(serde_json::from_slice(raw))
}
