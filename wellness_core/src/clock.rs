//! Time-of-day arithmetic for sleep timing.
//!
//! Bedtimes are placed on a continuous scale that runs past midnight: a
//! bedtime before noon is shifted by +1440 minutes, so 23:30 (1410) and
//! 00:10 (1450) stay 40 minutes apart instead of 1400.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Bedtimes earlier than this are treated as belonging to the previous evening
const BEDTIME_ROLLOVER_MINUTE: u32 = 12 * 60;

/// Minutes since local midnight, 0..1440
pub fn minutes_since_midnight(instant: DateTime<Utc>, tz: Tz) -> u32 {
    let local = instant.with_timezone(&tz);
    local.hour() * 60 + local.minute()
}

/// Bedtime on the continuous evening scale, 720..2160
pub fn bedtime_minutes(instant: DateTime<Utc>, tz: Tz) -> u32 {
    let minutes = minutes_since_midnight(instant, tz);
    if minutes < BEDTIME_ROLLOVER_MINUTE {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// A local wall-clock time with minute precision, rendered as `HH:MM`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Wraps values of a day or more back into 00:00..23:59
    pub fn from_minutes(minutes: u32) -> Self {
        ClockTime(minutes % MINUTES_PER_DAY)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(ClockTime(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Parse `HH:MM`
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        Self::from_hm(h.parse().ok()?, m.parse().ok()?)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    pub fn minute(&self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bedtime_after_midnight_is_shifted() {
        let tz = chrono_tz::UTC;
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 2, 0, 10, 0).unwrap();

        assert_eq!(bedtime_minutes(before, tz), 1410);
        assert_eq!(bedtime_minutes(after, tz), 1450);
    }

    #[test]
    fn test_minutes_use_local_clock() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        // 14:00 UTC is 23:00 in Tokyo
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap();
        assert_eq!(minutes_since_midnight(instant, tz), 23 * 60);
    }

    #[test]
    fn test_clock_time_wraps_and_formats() {
        assert_eq!(ClockTime::from_minutes(1450).to_string(), "00:10");
        assert_eq!(ClockTime::from_minutes(1380).to_string(), "23:00");
        assert_eq!(ClockTime::from_minutes(65).to_string(), "01:05");
    }

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(ClockTime::parse("07:30").unwrap().minutes(), 450);
        assert!(ClockTime::parse("24:00").is_none());
        assert!(ClockTime::parse("7h30").is_none());
    }

    #[test]
    fn test_clock_time_serializes_as_string() {
        let json = serde_json::to_string(&ClockTime::from_hm(22, 45).unwrap()).unwrap();
        assert_eq!(json, "\"22:45\"");
    }
}
