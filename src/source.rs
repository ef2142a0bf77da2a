use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Local, Utc};
use tracing::debug;

use crate::domain::{DateRange, SessionRecord};
use crate::error::SourceError;
use crate::validation::parse_instant;

const WEEK_WINDOW_DAYS: i64 = 7;

/// The three collaborator calls the dashboard depends on.
///
/// Where the records live and how the weekly window is cut is up to the
/// implementation.
pub trait RecordSource {
    /// Ordered, unique category names. The order is the legend order.
    fn distinct_categories(&self) -> Result<Vec<String>, SourceError>;

    /// Records that started within `range` (local calendar days).
    fn fetch_records(&self, range: DateRange) -> Result<Vec<SessionRecord>, SourceError>;

    /// Records for the source's trailing week.
    fn fetch_weekly_records(&self) -> Result<Vec<SessionRecord>, SourceError>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn distinct_categories(&self) -> Result<Vec<String>, SourceError> {
        (**self).distinct_categories()
    }

    fn fetch_records(&self, range: DateRange) -> Result<Vec<SessionRecord>, SourceError> {
        (**self).fetch_records(range)
    }

    fn fetch_weekly_records(&self) -> Result<Vec<SessionRecord>, SourceError> {
        (**self).fetch_weekly_records()
    }
}

/// Read-only source over a JSON Lines export, one wire record per line.
#[derive(Debug, Clone)]
pub struct JsonlRecordSource {
    path: PathBuf,
    anchor: Option<DateTime<Utc>>,
}

impl JsonlRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            anchor: None,
        }
    }

    /// Pins the end of the weekly window instead of using the wall clock.
    pub fn anchored_at(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    fn load(&self) -> Result<Vec<SessionRecord>, SourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: SessionRecord =
                serde_json::from_str(line).map_err(|source| SourceError::Decode {
                    line: index + 1,
                    source,
                })?;
            records.push(record);
        }

        debug!(path = %self.path.display(), count = records.len(), "loaded session records");
        Ok(records)
    }

    fn load_started_where(
        &self,
        keep: impl Fn(DateTime<Utc>) -> bool,
    ) -> Result<Vec<SessionRecord>, SourceError> {
        let records = self
            .load()?
            .into_iter()
            .filter(|record| match parse_instant(&record.start_time) {
                Some(started_at) => keep(started_at),
                None => {
                    debug!(start_time = %record.start_time, "start_time outside any window");
                    false
                }
            })
            .collect();
        Ok(records)
    }
}

impl RecordSource for JsonlRecordSource {
    fn distinct_categories(&self) -> Result<Vec<String>, SourceError> {
        let mut names: Vec<String> = Vec::new();
        for record in self.load()? {
            if !names.contains(&record.category) {
                names.push(record.category);
            }
        }
        Ok(names)
    }

    fn fetch_records(&self, range: DateRange) -> Result<Vec<SessionRecord>, SourceError> {
        self.load_started_where(|started_at| {
            range.contains(started_at.with_timezone(&Local).date_naive())
        })
    }

    fn fetch_weekly_records(&self) -> Result<Vec<SessionRecord>, SourceError> {
        let window_end = self.anchor.unwrap_or_else(Utc::now);
        let window_start = window_end - Duration::days(WEEK_WINDOW_DAYS);
        self.load_started_where(|started_at| window_start <= started_at && started_at <= window_end)
    }
}
