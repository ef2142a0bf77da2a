//! Fetch lifecycle and derived dashboard state.
//!
//! Each `refresh_*` call is one independent fetch. A successful fetch replaces
//! its slice of state wholesale and runs the recomputation rules that depend
//! on it; a failed fetch is logged and leaves everything as it was.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::color::CategoryPalette;
use crate::domain::{Category, Color, DateRange, SessionRecord, WEEKDAY_LABELS, WeeklySeries};
use crate::source::RecordSource;
use crate::timeline::{Timeline, build_timeline};
use crate::weekly::build_weekly;

pub struct Dashboard<S> {
    source: S,
    fallback: Color,
    palette: CategoryPalette,
    range: DateRange,
    daily_records: Vec<SessionRecord>,
    built_at: DateTime<Utc>,
    weekly_records: Vec<SessionRecord>,
    timeline: Timeline,
    weekly: Vec<WeeklySeries>,
}

/// Presentation-ready datasets, handed to the chart widgets as JSON.
#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub range: DateRange,
    pub categories: &'a [Category],
    pub timeline: &'a Timeline,
    pub weekday_labels: [&'static str; 7],
    pub weekly: &'a [WeeklySeries],
}

impl<S: RecordSource> Dashboard<S> {
    pub fn new(source: S, fallback: Color, range: DateRange) -> Self {
        Self {
            source,
            fallback,
            palette: CategoryPalette::default(),
            range,
            daily_records: Vec::new(),
            built_at: Utc::now(),
            weekly_records: Vec::new(),
            timeline: Timeline::default(),
            weekly: Vec::new(),
        }
    }

    /// Runs all three fetches. Returns how many of them succeeded.
    pub fn refresh_all(&mut self, now: DateTime<Utc>) -> usize {
        let range = self.range;
        [
            self.refresh_categories(),
            self.refresh_records(range, now),
            self.refresh_weekly(),
        ]
        .into_iter()
        .filter(|succeeded| *succeeded)
        .count()
    }

    pub fn refresh_categories(&mut self) -> bool {
        match self.source.distinct_categories() {
            Ok(names) => {
                self.apply_categories(names);
                true
            }
            Err(err) => {
                warn!("failed to fetch categories, keeping previous palette: {err}");
                false
            }
        }
    }

    pub fn refresh_records(&mut self, range: DateRange, now: DateTime<Utc>) -> bool {
        match self.source.fetch_records(range) {
            Ok(records) => {
                self.apply_records(range, records, now);
                true
            }
            Err(err) => {
                warn!(
                    start = %range.start,
                    end = %range.end,
                    "failed to fetch records, keeping previous timeline: {err}"
                );
                false
            }
        }
    }

    pub fn refresh_weekly(&mut self) -> bool {
        match self.source.fetch_weekly_records() {
            Ok(records) => {
                self.apply_weekly_records(records);
                true
            }
            Err(err) => {
                warn!("failed to fetch weekly records, keeping previous series: {err}");
                false
            }
        }
    }

    /// A new category list: recolor, then rebuild both datasets against it.
    pub fn apply_categories(&mut self, names: Vec<String>) {
        self.recolor(names);
        self.regroup_timeline();
        self.reaggregate_weekly();
    }

    pub fn apply_records(
        &mut self,
        range: DateRange,
        records: Vec<SessionRecord>,
        now: DateTime<Utc>,
    ) {
        self.range = range;
        self.daily_records = records;
        self.built_at = now;
        self.regroup_timeline();
    }

    pub fn apply_weekly_records(&mut self, records: Vec<SessionRecord>) {
        self.weekly_records = records;
        self.reaggregate_weekly();
    }

    fn recolor(&mut self, names: Vec<String>) {
        self.palette = CategoryPalette::from_names(names);
        info!(categories = self.palette.len(), "palette updated");
    }

    fn regroup_timeline(&mut self) {
        self.timeline = build_timeline(
            &self.daily_records,
            &self.palette,
            self.fallback,
            self.built_at,
        );
    }

    fn reaggregate_weekly(&mut self) {
        self.weekly = build_weekly(&self.palette.names(), &self.weekly_records);
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn weekly(&self) -> &[WeeklySeries] {
        &self.weekly
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            range: self.range,
            categories: self.palette.categories(),
            timeline: &self.timeline,
            weekday_labels: WEEKDAY_LABELS,
            weekly: &self.weekly,
        }
    }
}
