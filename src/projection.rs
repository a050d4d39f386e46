//! Read-side projections over fetched lecture lists. These mirror what
//! the presentation layer computes client-side: no queries, just pure
//! filtering and grouping over records already in hand.

use crate::models::LectureRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

fn parse_date(record: &LectureRecord) -> Option<NaiveDate> {
    record
        .lecture_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Case-insensitive substring match over title, category, and summary.
/// An empty or whitespace-only query matches everything.
pub fn filter_by_search<'a>(records: &'a [LectureRecord], query: &str) -> Vec<&'a LectureRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            record.title.to_lowercase().contains(&needle)
                || record
                    .category
                    .as_deref()
                    .map(|c| c.to_lowercase().contains(&needle))
                    .unwrap_or(false)
                || record
                    .summary
                    .as_deref()
                    .map(|s| s.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect()
}

/// Records whose date falls in the given calendar month. Records with a
/// missing or unparseable date are excluded.
pub fn filter_by_month<'a>(
    records: &'a [LectureRecord],
    year: i32,
    month: u32,
) -> Vec<&'a LectureRecord> {
    records
        .iter()
        .filter(|record| {
            parse_date(record)
                .map(|date| date.year() == year && date.month() == month)
                .unwrap_or(false)
        })
        .collect()
}

/// Group records by calendar day for calendar rendering. Within a day,
/// records keep their input order; dateless records are skipped.
pub fn group_by_day<'a>(
    records: &'a [LectureRecord],
) -> BTreeMap<NaiveDate, Vec<&'a LectureRecord>> {
    let mut days: BTreeMap<NaiveDate, Vec<&LectureRecord>> = BTreeMap::new();
    for record in records {
        if let Some(date) = parse_date(record) {
            days.entry(date).or_default().push(record);
        }
    }
    days
}
