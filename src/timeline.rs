//! Range-bar dataset: session records grouped into per-category intervals.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::color::CategoryPalette;
use crate::domain::{Color, Interval, SessionRecord};
use crate::validation::{audit_record, resolve_span};

/// Intervals for one category, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIntervals {
    pub category: String,
    pub intervals: Vec<Interval>,
}

/// Category → intervals mapping.
///
/// Categories iterate in the order they were first seen in the record batch,
/// which is not necessarily the palette order. The JSON form is an object
/// whose keys follow that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    groups: Vec<CategoryIntervals>,
    index: HashMap<String, usize>,
}

impl Timeline {
    fn push(&mut self, category: &str, interval: Interval) {
        let position = match self.index.get(category) {
            Some(position) => *position,
            None => {
                self.groups.push(CategoryIntervals {
                    category: category.to_string(),
                    intervals: Vec::new(),
                });
                self.index.insert(category.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[position].intervals.push(interval);
    }

    pub fn groups(&self) -> &[CategoryIntervals] {
        &self.groups
    }

    pub fn intervals_for(&self, category: &str) -> Option<&[Interval]> {
        self.index
            .get(category)
            .map(|position| self.groups[*position].intervals.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.category.as_str())
    }

    pub fn interval_count(&self) -> usize {
        self.groups.iter().map(|group| group.intervals.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.category, &group.intervals)?;
        }
        map.end()
    }
}

/// Groups records into timeline intervals.
///
/// Records whose start or end cannot be parsed are dropped with a warning; the
/// rest of the batch is still grouped. Categories missing from `palette` get
/// `fallback`.
pub fn build_timeline(
    records: &[SessionRecord],
    palette: &CategoryPalette,
    fallback: Color,
    now: DateTime<Utc>,
) -> Timeline {
    let mut timeline = Timeline::default();

    for (position, record) in records.iter().enumerate() {
        audit_record(position, record);

        let (start_millis, end_millis) = match resolve_span(record, now) {
            Ok(span) => span,
            Err(reason) => {
                warn!(
                    position,
                    instance = %record.instance_label,
                    category = %record.category,
                    "dropping record from timeline: {reason}"
                );
                continue;
            }
        };

        timeline.push(
            &record.category,
            Interval {
                instance_label: record.instance_label.clone(),
                start_millis,
                end_millis,
                color: palette.color_of(&record.category).unwrap_or(fallback),
            },
        );
    }

    timeline
}
