use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Slider value meaning "no time filter".
pub const ANY_TIME: i32 = -1;

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Could not parse timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("Minute {0} is outside of -1..=1439")]
    MinuteOutOfRange(i32),
}

/// A minute of the day, always in `0..1440`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Minute(u16);

impl Minute {
    pub const MIDNIGHT: Self = Self(0);

    pub const fn new(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    pub const fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if minutes >= 60 || hours >= 24 {
            return None;
        }
        Self::new(hours * 60 + minutes)
    }

    pub const fn as_minutes(&self) -> u16 {
        self.0
    }

    /// Distance on a straight line from 0 to 1439, midnight does not wrap.
    pub const fn abs_diff(&self, other: Self) -> u16 {
        self.0.abs_diff(other.0)
    }

    fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.0 / 60), u32::from(self.0 % 60), 0)
            .unwrap_or_default()
    }
}

impl Display for Minute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_naive_time().format("%-I:%M %p"))
    }
}

/// Wall clock minutes since midnight of `timestamp`.
pub fn minutes_since_midnight(timestamp: &NaiveDateTime) -> Minute {
    Minute((timestamp.hour() * 60 + timestamp.minute()) as u16)
}

/// Parses a trip timestamp. Offsets are dropped in favour of the local wall
/// clock time they describe.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, Error> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| Error::InvalidTimestamp(value.to_string()))
}

/// The state of the time-of-day slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    Any,
    At(Minute),
}

impl TryFrom<i32> for TimeFilter {
    type Error = self::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value == ANY_TIME {
            return Ok(Self::Any);
        }
        u16::try_from(value)
            .ok()
            .and_then(Minute::new)
            .map(Self::At)
            .ok_or(Error::MinuteOutOfRange(value))
    }
}

impl From<TimeFilter> for i32 {
    fn from(value: TimeFilter) -> Self {
        match value {
            TimeFilter::Any => ANY_TIME,
            TimeFilter::At(minute) => i32::from(minute.as_minutes()),
        }
    }
}

impl From<Minute> for TimeFilter {
    fn from(value: Minute) -> Self {
        Self::At(value)
    }
}

impl TimeFilter {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Text shown next to the slider.
    pub fn label(&self) -> String {
        match self {
            Self::Any => "(any time)".to_string(),
            Self::At(minute) => minute.to_string(),
        }
    }
}

impl Serialize for TimeFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(i32::from(*self))
    }
}

impl<'de> Deserialize<'de> for TimeFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i32::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[test]
fn minutes_since_midnight_test_1() {
    let time = parse_timestamp("2024-03-01 00:00:00").unwrap();
    assert_eq!(minutes_since_midnight(&time).as_minutes(), 0);
}

#[test]
fn minutes_since_midnight_test_2() {
    let time = parse_timestamp("2024-03-01 10:00:59").unwrap();
    assert_eq!(minutes_since_midnight(&time).as_minutes(), 600);
}

#[test]
fn minutes_since_midnight_test_3() {
    let time = parse_timestamp("2024-03-31 23:59:59.999").unwrap();
    assert_eq!(minutes_since_midnight(&time).as_minutes(), 1439);
}

#[test]
fn parse_rfc3339_keeps_wall_clock() {
    let time = parse_timestamp("2024-03-01T08:15:00-05:00").unwrap();
    assert_eq!(minutes_since_midnight(&time).as_minutes(), 495);
}

#[test]
fn parse_t_separator() {
    let time = parse_timestamp("2024-03-01T17:30:00").unwrap();
    assert_eq!(minutes_since_midnight(&time).as_minutes(), 1050);
}

#[test]
fn invalid_timestamp_test_1() {
    assert!(parse_timestamp("yesterday").is_err());
}

#[test]
fn invalid_timestamp_test_2() {
    assert_eq!(
        parse_timestamp("2024-03-01 25:00:00"),
        Err(Error::InvalidTimestamp("2024-03-01 25:00:00".into()))
    );
}

#[test]
fn time_filter_from_slider() {
    assert_eq!(TimeFilter::try_from(-1), Ok(TimeFilter::Any));
    assert_eq!(
        TimeFilter::try_from(0),
        Ok(TimeFilter::At(Minute::MIDNIGHT))
    );
    assert_eq!(
        TimeFilter::try_from(1439).map(i32::from),
        Ok(1439)
    );
    assert_eq!(TimeFilter::try_from(1440), Err(Error::MinuteOutOfRange(1440)));
    assert_eq!(TimeFilter::try_from(-2), Err(Error::MinuteOutOfRange(-2)));
}

#[test]
fn label_any_time() {
    assert_eq!(TimeFilter::Any.label(), "(any time)");
}

#[test]
fn label_twelve_hour() {
    let label = |minutes| TimeFilter::At(Minute::new(minutes).unwrap()).label();
    assert_eq!(label(0), "12:00 AM");
    assert_eq!(label(5), "12:05 AM");
    assert_eq!(label(600), "10:00 AM");
    assert_eq!(label(720), "12:00 PM");
    assert_eq!(label(1439), "11:59 PM");
}

#[test]
fn abs_diff_does_not_wrap() {
    let late = Minute::new(1430).unwrap();
    let early = Minute::new(10).unwrap();
    assert_eq!(late.abs_diff(early), 1420);
}
