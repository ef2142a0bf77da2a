//! Data layer for the game-session analytics dashboard.
//!
//! Turns raw session records into the two datasets the dashboard charts:
//! a per-category timeline of instance intervals and a per-category weekday
//! histogram. Category colors are derived from the category name alone.

pub mod color;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod source;
pub mod timeline;
pub mod validation;
pub mod weekly;

pub use color::{CategoryPalette, assign_color};
pub use dashboard::{Dashboard, DashboardView};
pub use domain::{Category, Color, DateRange, Interval, SessionRecord, WeeklySeries};
pub use error::{ConfigError, SourceError};
pub use source::{JsonlRecordSource, RecordSource};
pub use timeline::{CategoryIntervals, Timeline, build_timeline};
pub use weekly::{build_weekly, build_weekly_in};
