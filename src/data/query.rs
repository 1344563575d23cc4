use chrono::{NaiveDate, NaiveDateTime};

use super::error::DataError;
use super::model::{Record, TimeSeriesTable};

/// Format accepted for range bounds typed by the user.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse an `MM/DD/YYYY` bound as midnight of that day.
pub fn parse_date(text: &str) -> Result<NaiveDateTime, DataError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DataError::TimestampParse {
            context: "date bound".to_string(),
            value: text.to_string(),
        })
}

/// Records with `start < timestamp < end`, in table order.
///
/// An inverted or empty interval gives an empty table.
pub fn range_query(table: &TimeSeriesTable, start: NaiveDateTime, end: NaiveDateTime) -> TimeSeriesTable {
    let records = table
        .records()
        .iter()
        .filter(|r| start < r.timestamp && r.timestamp < end)
        .cloned()
        .collect();
    table.with_records(records)
}

/// The record stamped exactly `at`.
///
/// Duplicate timestamps are a data problem, not a failure: the first match
/// is returned and a warning logged.
pub fn point_query(table: &TimeSeriesTable, at: NaiveDateTime) -> Option<&Record> {
    let mut matches = table.records().iter().filter(|r| r.timestamp == at);
    let first = matches.next()?;
    let extra = matches.count();
    if extra > 0 {
        log::warn!("{} records share timestamp {at}; using the first", extra + 1);
    }
    Some(first)
}

/// Timestamp of the record closest to `at`, earlier record on ties.
pub fn nearest_timestamp(table: &TimeSeriesTable, at: NaiveDateTime) -> Option<NaiveDateTime> {
    table
        .records()
        .iter()
        .map(|r| r.timestamp)
        .min_by_key(|ts| (*ts - at).num_seconds().unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Channel;
    use chrono::Duration;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2005, 3, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn table(days: &[u32]) -> TimeSeriesTable {
        TimeSeriesTable::new(
            "Time",
            vec![Channel::new("t")],
            days.iter()
                .enumerate()
                .map(|(i, &d)| Record { timestamp: day(d), values: vec![i as f64] })
                .collect(),
        )
    }

    #[test]
    fn range_bounds_are_exclusive() {
        let t = table(&[1, 2, 3, 4, 5]);
        let out = range_query(&t, day(2), day(5));
        let days: Vec<_> = out.records().iter().map(|r| r.timestamp).collect();
        assert_eq!(days, vec![day(3), day(4)]);
        assert!(out.records().iter().all(|r| t.records().contains(r)));
        assert_eq!(out.channels(), t.channels());
    }

    #[test]
    fn inverted_range_is_empty() {
        let t = table(&[1, 2, 3]);
        assert!(range_query(&t, day(3), day(1)).is_empty());
        assert!(range_query(&t, day(2), day(2)).is_empty());
    }

    #[test]
    fn point_query_returns_first_of_duplicates() {
        let t = table(&[1, 2, 2, 3]);
        let rec = point_query(&t, day(2)).unwrap();
        assert_eq!(rec.values, vec![1.0]);
        assert!(point_query(&t, day(9)).is_none());
    }

    #[test]
    fn dates_are_midnight_bounds() {
        assert_eq!(parse_date("03/04/2005").unwrap(), day(4));
        assert_eq!(parse_date(" 03/04/2005 ").unwrap(), day(4));
        assert!(matches!(parse_date("2005-03-04"), Err(DataError::TimestampParse { .. })));
        assert!(matches!(parse_date("13/40/2005"), Err(DataError::TimestampParse { .. })));
    }

    #[test]
    fn nearest_snaps_to_a_record() {
        let t = table(&[1, 5, 9]);
        assert_eq!(nearest_timestamp(&t, day(4)), Some(day(5)));
        assert_eq!(nearest_timestamp(&t, day(3)), Some(day(1)));
        assert_eq!(nearest_timestamp(&table(&[]), day(3)), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_range_keeps_exactly_the_interior(
            offsets in prop::collection::vec(0i64..60, 0..30),
            start in 0i64..60,
            end in 0i64..60,
        ) {
            let base = day(1);
            let t = TimeSeriesTable::new(
                "Time",
                vec![Channel::new("t")],
                offsets
                    .iter()
                    .map(|&h| Record { timestamp: base + Duration::hours(h), values: vec![h as f64] })
                    .collect(),
            );
            let (start, end) = (base + Duration::hours(start), base + Duration::hours(end));
            let out = range_query(&t, start, end);
            prop_assert!(out.records().iter().all(|r| start < r.timestamp && r.timestamp < end));
            prop_assert!(out.records().iter().all(|r| t.records().contains(r)));
            let expected = t.records().iter().filter(|r| start < r.timestamp && r.timestamp < end).count();
            prop_assert_eq!(out.len(), expected);
        }
    }
}
