//! Calendar-day windows in a subject's local timezone.
//!
//! Every component buckets instants into calendar dates through a
//! [`TimeWindow`], so a log at 23:50 and a wake event at 00:10 the next day
//! land on different dates exactly when they do on the subject's clock.

use crate::{Error, LogEntry, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Standard window lengths offered to callers
pub const WEEK_DAYS: i64 = 7;
pub const MONTH_DAYS: i64 = 30;
pub const QUARTER_DAYS: i64 = 90;

/// Longest window accepted, roughly a century of history
pub const MAX_WINDOW_DAYS: i64 = 36_525;

/// Resolve an optional IANA identifier, falling back to UTC
pub fn parse_timezone(id: Option<&str>) -> Result<Tz> {
    match id {
        None => Ok(chrono_tz::UTC),
        Some(id) => id
            .trim()
            .parse::<Tz>()
            .map_err(|_| Error::InvalidTimezone(id.to_string())),
    }
}

/// Calendar date of `instant` on a clock in `tz`
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    date.checked_sub_signed(offset).unwrap_or(NaiveDate::MIN)
}

/// An inclusive range of calendar dates in one timezone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
    tz: Tz,
}

/// One calendar day of a window and the entries logged on it
#[derive(Clone, Debug)]
pub struct DaySlot<'a> {
    pub date: NaiveDate,
    pub entries: Vec<&'a LogEntry>,
}

impl DaySlot<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TimeWindow {
    /// Build a window of `length_days` dates ending on `as_of`'s local date
    pub fn build(as_of: DateTime<Utc>, length_days: i64, tz: Tz) -> Result<Self> {
        Self::ending_on(local_date(as_of, tz), length_days, tz)
    }

    /// Build a window of `length_days` dates ending on `end` (inclusive)
    pub fn ending_on(end: NaiveDate, length_days: i64, tz: Tz) -> Result<Self> {
        if length_days <= 0 {
            return Err(Error::invalid(format!(
                "window length must be positive, got {} days",
                length_days
            )));
        }

        if length_days > MAX_WINDOW_DAYS {
            return Err(Error::invalid(format!(
                "window length must be at most {} days, got {}",
                MAX_WINDOW_DAYS, length_days
            )));
        }

        let start = Duration::try_days(length_days - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                Error::invalid(format!("window of {} days before {} underflows", length_days, end))
            })?;

        Ok(Self { start, end, tz })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Dates of the window, oldest first. Each call starts a fresh iterator.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len_days() as usize)
    }

    /// Local calendar date of `instant` in this window's timezone
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        local_date(instant, self.tz)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `entry` was logged on a date inside the window
    pub fn contains(&self, entry: &LogEntry) -> bool {
        self.contains_date(self.local_date(entry.logged_at))
    }

    /// Entries inside the window, oldest first
    ///
    /// Ties on `logged_at` are broken by `created_at` and then id, so the
    /// result never depends on the order the caller supplied.
    pub fn entries_within<'a>(&self, entries: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        let mut within: Vec<&LogEntry> = entries.iter().filter(|e| self.contains(e)).collect();
        within.sort_by(|a, b| {
            a.logged_at
                .cmp(&b.logged_at)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        within
    }

    /// One slot per date of the window, oldest first, empty days included
    pub fn slots<'a>(&self, entries: &'a [LogEntry]) -> Vec<DaySlot<'a>> {
        let mut slots: Vec<DaySlot<'a>> = self
            .days()
            .map(|date| DaySlot {
                date,
                entries: Vec::new(),
            })
            .collect();

        for entry in self.entries_within(entries) {
            let offset = (self.local_date(entry.logged_at) - self.start).num_days() as usize;
            slots[offset].entries.push(entry);
        }

        slots
    }

    /// UTC bounds wide enough to cover the window under any UTC offset
    ///
    /// Intended for coarse store queries; the engine filters by local date again.
    pub fn fetch_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self
            .start
            .checked_sub_signed(Duration::days(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let to = self
            .end
            .checked_add_signed(Duration::days(2))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (from, to)
    }
}
