use super::error::DataError;
use super::model::{Envelope, TimeSeriesTable};

/// Find the records holding the global maximum and minimum reading.
///
/// Rows are scanned in order and channels within a row in order; the first
/// occurrence of an extreme wins ties.
pub fn compute_envelope(table: &TimeSeriesTable) -> Result<Envelope, DataError> {
    let mut max: Option<(usize, usize, f64)> = None;
    let mut min: Option<(usize, usize, f64)> = None;

    for (row, record) in table.records().iter().enumerate() {
        for (ch, &v) in record.values.iter().enumerate() {
            if max.map_or(true, |(_, _, m)| v > m) {
                max = Some((row, ch, v));
            }
            if min.map_or(true, |(_, _, m)| v < m) {
                min = Some((row, ch, v));
            }
        }
    }

    let ((max_row, max_channel, _), (min_row, min_channel, _)) = max.zip(min).ok_or(DataError::EmptyTable)?;
    let records = table.records();
    Ok(Envelope {
        max_record: records[max_row].clone(),
        max_channel,
        min_record: records[min_row].clone(),
        min_channel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Channel, Record};
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2001, 6, 1).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn table(rows: &[&[f64]]) -> TimeSeriesTable {
        let width = rows.first().map_or(1, |r| r.len());
        TimeSeriesTable::new(
            "Time",
            (0..width).map(|i| Channel::new(format!("c{i}"))).collect(),
            rows.iter()
                .enumerate()
                .map(|(i, r)| Record { timestamp: ts(i as u32), values: r.to_vec() })
                .collect(),
        )
    }

    #[test]
    fn picks_whole_records_of_the_extremes() {
        let t = table(&[&[1.0, 2.0, 3.0], &[-4.0, 0.5, 9.0], &[0.0, 0.0, 0.0]]);
        let env = compute_envelope(&t).unwrap();
        assert_eq!(env.max_record, t.records()[1].clone());
        assert_eq!(env.max_channel, 2);
        assert_eq!(env.min_record.timestamp, ts(1));
        assert_eq!(env.min_channel, 0);
        assert_eq!(env.max_value(), 9.0);
        assert_eq!(env.min_value(), -4.0);
    }

    #[test]
    fn extremes_bound_every_reading() {
        let t = table(&[&[0.3, -1.2], &[2.7, 1.1], &[-3.3, 0.0], &[2.7, -3.3]]);
        let env = compute_envelope(&t).unwrap();
        for r in t.records() {
            for &v in &r.values {
                assert!(env.max_value() >= v);
                assert!(env.min_value() <= v);
            }
        }
    }

    #[test]
    fn ties_go_to_the_first_row_then_channel() {
        let t = table(&[&[1.0, 5.0], &[5.0, -2.0], &[-2.0, 5.0]]);
        let env = compute_envelope(&t).unwrap();
        assert_eq!(env.max_record.timestamp, ts(0));
        assert_eq!(env.max_channel, 1);
        assert_eq!(env.min_record.timestamp, ts(1));
        assert_eq!(env.min_channel, 1);
    }

    #[test]
    fn empty_table_has_no_envelope() {
        let t = table(&[]);
        assert!(matches!(compute_envelope(&t), Err(DataError::EmptyTable)));
    }

    fn grid() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1usize..6).prop_flat_map(|width| {
            prop::collection::vec(prop::collection::vec(-40.0f64..40.0, width), 1..20)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_extremes_bound_every_reading(rows in grid()) {
            let refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
            let t = table(&refs);
            let env = compute_envelope(&t).unwrap();
            for record in t.records() {
                for &v in &record.values {
                    prop_assert!(env.min_value() <= v && v <= env.max_value());
                }
            }
            prop_assert!(t.records().contains(&env.max_record));
            prop_assert!(t.records().contains(&env.min_record));
        }
    }
}
