//! Weekday histogram: session starts counted per category and weekday.

use std::collections::HashMap;

use chrono::{Datelike, Local, TimeZone};
use tracing::{debug, warn};

use crate::domain::{SessionRecord, WeeklySeries};
use crate::validation::parse_instant;

/// Counts session starts per category and local weekday.
pub fn build_weekly(categories: &[String], records: &[SessionRecord]) -> Vec<WeeklySeries> {
    build_weekly_in(&Local, categories, records)
}

/// Counts session starts per category and weekday in `zone`.
///
/// One series per distinct entry of `categories`, in that order; records of
/// other categories are ignored. Series without any session are left out.
pub fn build_weekly_in<Tz: TimeZone>(
    zone: &Tz,
    categories: &[String],
    records: &[SessionRecord],
) -> Vec<WeeklySeries> {
    let mut series: Vec<WeeklySeries> = Vec::with_capacity(categories.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(categories.len());
    for category in categories {
        if !index.contains_key(category.as_str()) {
            index.insert(category.as_str(), series.len());
            series.push(WeeklySeries::empty(category.clone()));
        }
    }

    for (position, record) in records.iter().enumerate() {
        let Some(series_position) = index.get(record.category.as_str()) else {
            debug!(position, category = %record.category, "category not in list, skipping");
            continue;
        };

        let Some(started_at) = parse_instant(&record.start_time) else {
            warn!(
                position,
                instance = %record.instance_label,
                "cannot bucket record with unparseable start_time {:?}",
                record.start_time
            );
            continue;
        };

        let slot = started_at
            .with_timezone(zone)
            .weekday()
            .num_days_from_monday() as usize;
        series[*series_position].counts[slot] += 1;
    }

    series.retain(WeeklySeries::has_activity);
    series
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::{build_weekly, build_weekly_in};
    use crate::domain::SessionRecord;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn wednesday_lands_in_slot_two() {
        // 2026-01-07 is a Wednesday.
        let records = vec![SessionRecord::ongoing("a", "Combat", "2026-01-07T12:00:00Z")];
        let series = build_weekly_in(&Utc, &names(&["Combat"]), &records);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].category, "Combat");
        assert_eq!(series[0].counts, [0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn sunday_lands_in_last_slot() {
        let records = vec![
            SessionRecord::ongoing("a", "Combat", "2026-01-11T12:00:00Z"),
            SessionRecord::ongoing("b", "Combat", "2026-01-05T12:00:00Z"),
        ];
        let series = build_weekly_in(&Utc, &names(&["Combat"]), &records);
        assert_eq!(series[0].counts, [1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn weekday_is_taken_in_the_given_zone() {
        // Monday 04:30 UTC is still Sunday evening five hours west.
        let records = vec![SessionRecord::ongoing("a", "Combat", "2026-01-12T04:30:00Z")];
        let categories = names(&["Combat"]);
        let west = FixedOffset::west_opt(5 * 3600).expect("valid offset");

        assert_eq!(
            build_weekly_in(&west, &categories, &records)[0].counts,
            [0, 0, 0, 0, 0, 0, 1]
        );
        assert_eq!(
            build_weekly_in(&Utc, &categories, &records)[0].counts,
            [1, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn east_offset_can_move_sunday_into_monday() {
        // Sunday 20:00 UTC is already Monday five hours east.
        let records = vec![SessionRecord::ongoing("a", "Combat", "2026-01-11T20:00:00Z")];
        let categories = names(&["Combat"]);
        let east = FixedOffset::east_opt(5 * 3600).expect("valid offset");

        assert_eq!(
            build_weekly_in(&east, &categories, &records)[0].counts,
            [1, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            build_weekly_in(&Utc, &categories, &records)[0].counts,
            [0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn local_zone_entry_point_uses_midday_safely() {
        // Midday UTC stays on the same calendar day for every common offset.
        let records = vec![SessionRecord::ongoing("a", "Combat", "2026-01-07T12:00:00Z")];
        let series = build_weekly(&names(&["Combat"]), &records);
        assert_eq!(series[0].total(), 1);
    }

    #[test]
    fn empty_categories_are_filtered_and_order_is_kept() {
        let records = vec![
            SessionRecord::ongoing("a", "Racing", "2026-01-06T12:00:00Z"),
            SessionRecord::ongoing("b", "Combat", "2026-01-08T12:00:00Z"),
            SessionRecord::ongoing("c", "Combat", "2026-01-08T13:00:00Z"),
        ];
        let series = build_weekly_in(&Utc, &names(&["Combat", "Puzzle", "Racing"]), &records);
        assert_eq!(
            series.iter().map(|entry| entry.category.as_str()).collect::<Vec<_>>(),
            vec!["Combat", "Racing"]
        );
        assert_eq!(series[0].counts, [0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(series[1].counts, [0, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn unknown_categories_and_bad_starts_are_ignored() {
        let records = vec![
            SessionRecord::ongoing("a", "Strategy", "2026-01-07T12:00:00Z"),
            SessionRecord::ongoing("b", "Combat", "whenever"),
        ];
        let series = build_weekly_in(&Utc, &names(&["Combat"]), &records);
        assert!(series.is_empty());
    }

    #[test]
    fn duplicate_category_names_collapse() {
        let records = vec![SessionRecord::ongoing("a", "Combat", "2026-01-07T12:00:00Z")];
        let series = build_weekly_in(&Utc, &names(&["Combat", "Combat"]), &records);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total(), 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            SessionRecord::ongoing("a", "Combat", "2026-01-07T12:00:00Z"),
            SessionRecord::ongoing("b", "Puzzle", "2026-01-10T12:00:00Z"),
        ];
        let categories = names(&["Combat", "Puzzle"]);
        assert_eq!(
            build_weekly_in(&Utc, &categories, &records),
            build_weekly_in(&Utc, &categories, &records)
        );
    }
}
