//! Time-of-day values and the wall clock.
//!
//! Schedule times are parsed once, at the load boundary, into [`TimeOfDay`]
//! and never compared as strings afterwards. "Now" is a [`Moment`] sampled
//! from a [`Clock`] exactly once per render.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormatError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A minute-precision time of day in 24-hour civil time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Build from hour and minute, `None` when out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Parse strict "HH:MM" (two digits each, 24-hour).
    ///
    /// No seconds, no AM/PM and no single-digit fields: "9:05", "09:5" and
    /// "9am" are all rejected, as are out-of-range values like "25:61".
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let bytes = text.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(FormatError::new(text));
        }
        let digit = |i: usize| -> Result<u32, FormatError> {
            let b = bytes[i];
            if b.is_ascii_digit() {
                Ok(u32::from(b - b'0'))
            } else {
                Err(FormatError::new(text))
            }
        };
        let hour = digit(0)? * 10 + digit(1)?;
        let minute = digit(3)? * 10 + digit(4)?;
        Self::new(hour, minute).ok_or_else(|| FormatError::new(text))
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Minutes since midnight.
    pub fn minutes_from_midnight(&self) -> u16 {
        self.minutes
    }

    /// Truncate any civil time to minute precision.
    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        Self {
            minutes: (t.hour() * 60 + t.minute()) as u16 % MINUTES_PER_DAY,
        }
    }
}

/// Signed minutes from `a` to `b`.
///
/// Negative when `b` precedes `a`; there is no wrap-around past midnight.
pub fn minutes_between(a: TimeOfDay, b: TimeOfDay) -> i64 {
    i64::from(b.minutes) - i64::from(a.minutes)
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a weekday name, ignoring case and surrounding whitespace.
pub fn parse_weekday(text: &str) -> Option<Weekday> {
    text.trim().parse::<Weekday>().ok()
}

/// A single sampled "now": weekday plus minute-precision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    pub day: Weekday,
    pub time: TimeOfDay,
}

impl Moment {
    pub fn new(day: Weekday, time: TimeOfDay) -> Self {
        Self { day, time }
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            day: dt.weekday(),
            time: TimeOfDay::from_timelike(dt),
        }
    }

    /// Parse "<weekday> HH:MM", e.g. "monday 10:30".
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut parts = text.split_whitespace();
        let (Some(day), Some(time), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(FormatError::new(text));
        };
        let day = parse_weekday(day).ok_or_else(|| FormatError::new(text))?;
        Ok(Self::new(day, TimeOfDay::parse(time)?))
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}

/// Source of "now".
pub trait Clock {
    fn now(&self) -> Moment;
}

/// Wall clock pinned to one fixed UTC offset. No DST handling.
#[derive(Debug, Clone, Copy)]
pub struct FixedOffsetClock {
    offset: FixedOffset,
}

impl FixedOffsetClock {
    /// `None` when the offset is outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for FixedOffsetClock {
    fn now(&self) -> Moment {
        Moment::from_datetime(&Utc::now().with_timezone(&self.offset))
    }
}

/// Clock frozen at a preset moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Moment);

impl Clock for FixedClock {
    fn now(&self) -> Moment {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(text: &str) -> TimeOfDay {
        TimeOfDay::parse(text).unwrap()
    }

    #[test]
    fn parses_valid_times() {
        assert_eq!(t("00:00").minutes_from_midnight(), 0);
        assert_eq!(t("08:30").hour(), 8);
        assert_eq!(t("08:30").minute(), 30);
        assert_eq!(t("23:59").minutes_from_midnight(), 23 * 60 + 59);
    }

    #[test]
    fn rejects_malformed_times() {
        let bad_inputs = [
            "25:61", "9:5", "9am", "9:05", "24:00", "12:60", "", "12:00:00", "1a:00", " 9:05",
        ];
        for bad in bad_inputs {
            assert!(TimeOfDay::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn minutes_between_is_signed() {
        assert_eq!(minutes_between(t("09:00"), t("10:30")), 90);
        assert_eq!(minutes_between(t("10:30"), t("09:00")), -90);
        assert_eq!(minutes_between(t("09:00"), t("09:00")), 0);
    }

    #[test]
    fn display_pads_fields() {
        assert_eq!(t("08:05").to_string(), "08:05");
    }

    #[test]
    fn serde_uses_hh_mm_strings() {
        let json = serde_json::to_string(&t("14:00")).unwrap();
        assert_eq!(json, "\"14:00\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("14:00"));
        assert!(serde_json::from_str::<TimeOfDay>("\"2pm\"").is_err());
    }

    #[test]
    fn weekday_parsing_ignores_case() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday(" FRIDAY "), Some(Weekday::Fri));
        assert_eq!(parse_weekday("funday"), None);
    }

    #[test]
    fn moment_parse() {
        let m = Moment::parse("tuesday 13:45").unwrap();
        assert_eq!(m.day, Weekday::Tue);
        assert_eq!(m.time, t("13:45"));
        assert!(Moment::parse("tuesday").is_err());
        assert!(Moment::parse("someday 13:45").is_err());
        assert!(Moment::parse("tuesday 13:45 extra").is_err());
    }

    #[test]
    fn fixed_offset_clock_applies_offset() {
        let clock = FixedOffsetClock::from_offset_minutes(300).unwrap();
        assert_eq!(clock.offset().local_minus_utc(), 300 * 60);
        assert!(FixedOffsetClock::from_offset_minutes(25 * 60).is_none());
    }

    #[test]
    fn moment_truncates_seconds() {
        let dt = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 9, 2, 10, 30, 59)
            .unwrap();
        let m = Moment::from_datetime(&dt);
        assert_eq!(m.day, Weekday::Mon);
        assert_eq!(m.time, t("10:30"));
    }

    proptest! {
        #[test]
        fn valid_times_round_trip(hour in 0u32..24, minute in 0u32..60) {
            let text = format!("{hour:02}:{minute:02}");
            let parsed = TimeOfDay::parse(&text).unwrap();
            prop_assert_eq!(parsed.hour(), hour);
            prop_assert_eq!(parsed.minute(), minute);
            prop_assert_eq!(parsed.to_string(), text);
        }

        #[test]
        fn out_of_range_times_fail(hour in 24u32..100, minute in 60u32..100) {
            let bad_hour = format!("{hour:02}:00");
            let bad_minute = format!("00:{minute:02}");
            prop_assert!(TimeOfDay::parse(&bad_hour).is_err());
            prop_assert!(TimeOfDay::parse(&bad_minute).is_err());
        }
    }
}
