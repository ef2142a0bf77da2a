use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

/// Slot labels for [`WeeklySeries::counts`], Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One observed game session, as delivered by the record collaborators.
///
/// Timestamps are kept as the raw strings from the wire so that a malformed
/// value surfaces as a dropped record in the builders instead of failing the
/// whole batch at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "instance_name")]
    pub instance_label: String,
    #[serde(rename = "category_name")]
    pub category: String,
    pub start_time: String,
    /// `None` while the session is still running.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl SessionRecord {
    pub fn finished(
        instance_label: impl Into<String>,
        category: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            instance_label: instance_label.into(),
            category: category.into(),
            start_time: start_time.into(),
            end_time: Some(end_time.into()),
        }
    }

    pub fn ongoing(
        instance_label: impl Into<String>,
        category: impl Into<String>,
        start_time: impl Into<String>,
    ) -> Self {
        Self {
            instance_label: instance_label.into(),
            category: category.into(),
            start_time: start_time.into(),
            end_time: None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Display color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const NEUTRAL: Color = Color::rgb(0x9e, 0x9e, 0x9e);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::NEUTRAL
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorParseError(input.to_string());
        let hex = input.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub color: Color,
}

/// One instance's time span on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub instance_label: String,
    pub start_millis: i64,
    pub end_millis: i64,
    pub color: Color,
}

impl Interval {
    pub fn duration_millis(&self) -> i64 {
        self.end_millis - self.start_millis
    }
}

/// Weekday session counts for one category, Monday at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySeries {
    pub category: String,
    pub counts: [u32; 7],
}

impl WeeklySeries {
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            counts: [0; 7],
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn has_activity(&self) -> bool {
        self.counts.iter().any(|count| *count > 0)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err(format!("range ends before it starts: {start} > {end}"));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}
