//! Wall-clock times for arrivals and departures.
//!
//! Feeds carry scheduled/estimated times as bare "HH:MM" strings with no
//! date and no timezone. All of them are station-local (IST, +05:30), so
//! overdue checks pin the string to today's date in that offset before
//! comparing against the server clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// Station-local offset from UTC (+05:30).
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Grace period past the estimated departure before a train counts as gone.
pub const DEPARTURE_GRACE_MINS: i64 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockTimeError {
    #[error("expected \"HH:MM\", got {0:?}")]
    Format(String),
    #[error("hour {0} out of range")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range")]
    MinuteOutOfRange(u32),
}

/// A validated "HH:MM" time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ClockTimeError> {
        if hour > 23 {
            return Err(ClockTimeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(ClockTimeError::MinuteOutOfRange(minute));
        }
        Ok(ClockTime { hour, minute })
    }

    pub fn minutes_of_day(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ClockTimeError::Format(s.to_string()))?;
        let hour: u32 = h
            .trim()
            .parse()
            .map_err(|_| ClockTimeError::Format(s.to_string()))?;
        let minute: u32 = m
            .trim()
            .parse()
            .map_err(|_| ClockTimeError::Format(s.to_string()))?;
        ClockTime::new(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("static offset is in range")
}

/// The server clock shifted into station-local time.
pub fn station_now(now_utc: DateTime<Utc>) -> NaiveDateTime {
    now_utc.with_timezone(&ist_offset()).naive_local()
}

/// Whether a train with the given estimated departure is past its window:
/// today's `etd` in station-local time, plus the 15-minute grace buffer,
/// lies strictly before the adjusted now.
pub fn is_past_departure(etd: ClockTime, now_utc: DateTime<Utc>) -> bool {
    let now_local = station_now(now_utc);
    let departure = NaiveDateTime::new(now_local.date(), NaiveTime::MIN)
        + Duration::minutes(etd.minutes_of_day());
    now_local > departure + Duration::minutes(DEPARTURE_GRACE_MINS)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc_for_local(h: u32, m: u32) -> DateTime<Utc> {
        // 05:30 behind the wanted station-local time, kept on the same day.
        Utc.with_ymd_and_hms(2025, 7, 14, h, m, 0).unwrap() - Duration::minutes(330)
    }

    #[test]
    fn parses_valid_times() {
        assert_eq!("09:05".parse(), ClockTime::new(9, 5));
        assert_eq!("23:59".parse(), ClockTime::new(23, 59));
        assert_eq!("0:00".parse(), ClockTime::new(0, 0));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(
            "1045".parse::<ClockTime>(),
            Err(ClockTimeError::Format("1045".into()))
        );
        assert_eq!(
            "10:xx".parse::<ClockTime>(),
            Err(ClockTimeError::Format("10:xx".into()))
        );
        assert_eq!(
            "24:00".parse::<ClockTime>(),
            Err(ClockTimeError::HourOutOfRange(24))
        );
        assert_eq!(
            "10:60".parse::<ClockTime>(),
            Err(ClockTimeError::MinuteOutOfRange(60))
        );
        assert!("".parse::<ClockTime>().is_err());
    }

    #[test]
    fn displays_zero_padded() {
        let t: ClockTime = "9:5".parse().unwrap();
        assert_eq!(t.to_string(), "09:05");
    }

    #[test]
    fn overdue_once_grace_is_exceeded() {
        let etd: ClockTime = "10:00".parse().unwrap();
        // Local 10:20 is five minutes past the grace window.
        assert!(is_past_departure(etd, utc_for_local(10, 20)));
    }

    #[test]
    fn not_overdue_within_grace() {
        let etd: ClockTime = "10:00".parse().unwrap();
        assert!(!is_past_departure(etd, utc_for_local(10, 10)));
        // Exactly on the boundary still counts as within the window.
        assert!(!is_past_departure(etd, utc_for_local(10, 15)));
    }

    #[test]
    fn not_overdue_before_departure() {
        let etd: ClockTime = "18:30".parse().unwrap();
        assert!(!is_past_departure(etd, utc_for_local(9, 0)));
    }
}
