use std::borrow::Cow;

use chrono::NaiveDateTime;

use super::error::DataError;
use super::model::{Channel, Record, TimeSeriesTable};
use super::raw::RawTable;

/// Format of a joined `date time` pair.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Pad a one-digit hour (`0:00:10` → `00:00:10`).
///
/// The logger export writes early-morning hours without their leading zero.
pub fn repair_time(time: &str) -> Cow<'_, str> {
    let hour = time.split(':').next().unwrap_or("");
    if hour.len() == 1 && hour.as_bytes()[0].is_ascii_digit() {
        Cow::Owned(format!("0{time}"))
    } else {
        Cow::Borrowed(time)
    }
}

/// Parse a date and a time cell into one timestamp.
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let time = repair_time(time.trim());
    let joined = format!("{} {}", date.trim(), time);
    NaiveDateTime::parse_from_str(&joined, TIMESTAMP_FORMAT).ok()
}

/// Turn raw rows into typed records.
///
/// The date and time columns merge into each record's timestamp; every
/// other column becomes a numeric channel, in column order.
pub fn normalize(raw: &RawTable, date_column: &str, time_column: &str) -> Result<TimeSeriesTable, DataError> {
    let date_idx = raw
        .column_index(date_column)
        .ok_or_else(|| DataError::MissingColumn { name: date_column.to_string() })?;
    let time_idx = raw
        .column_index(time_column)
        .ok_or_else(|| DataError::MissingColumn { name: time_column.to_string() })?;

    let channel_cols: Vec<usize> = (0..raw.width())
        .filter(|&i| i != date_idx && i != time_idx)
        .collect();
    if channel_cols.is_empty() {
        return Err(DataError::NoChannels);
    }
    if raw.is_empty() {
        return Err(DataError::EmptyTable);
    }

    let mut records = Vec::with_capacity(raw.len());
    for (row_no, row) in raw.rows.iter().enumerate() {
        let (date, time) = (&row[date_idx], &row[time_idx]);
        let timestamp = parse_timestamp(date, time).ok_or_else(|| DataError::TimestampParse {
            context: format!("row {row_no}"),
            value: format!("{date} {time}"),
        })?;

        let values = channel_cols
            .iter()
            .map(|&col| parse_reading(&row[col]).ok_or_else(|| DataError::ChannelType {
                column: raw.columns[col].clone(),
                row: row_no,
                value: row[col].clone(),
            }))
            .collect::<Result<Vec<f64>, DataError>>()?;

        records.push(Record { timestamp, values });
    }

    let channels = channel_cols
        .iter()
        .map(|&col| Channel::new(raw.columns[col].clone()))
        .collect();

    Ok(TimeSeriesTable::new(raw.columns[time_idx].clone(), channels, records))
}

/// Finite numbers only; `NaN`/`inf` spellings count as non-numeric.
fn parse_reading(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::{parse, ParseOptions};
    use chrono::NaiveDate;

    fn raw(text: &str) -> RawTable {
        parse(text, &ParseOptions::default()).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn single_digit_hours_are_padded() {
        assert_eq!(repair_time("0:00:10"), "00:00:10");
        assert_eq!(repair_time("7:30:00"), "07:30:00");
        assert_eq!(repair_time("00:00:05"), "00:00:05");
        assert_eq!(repair_time("12:00:00"), "12:00:00");
    }

    #[test]
    fn repaired_timestamps_scenario() {
        let table = normalize(
            &raw("09/25/1999,00:00:05,1.1\n09/25/1999,0:00:10,2.2"),
            "col0",
            "col1",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].timestamp, at(1999, 9, 25, 0, 0, 5));
        assert_eq!(table.records()[1].timestamp, at(1999, 9, 25, 0, 0, 10));
        assert_eq!(table.records()[1].values, vec![2.2]);
        assert_eq!(table.time_column, "col1");
    }

    #[test]
    fn date_column_is_dropped_and_channels_keep_order() {
        let table = normalize(
            &parse(
                "Date,Time,Bead #1(-0.60m),Bead #2(-0.90m)\n01/02/2003,13:14:15,1,-2.5",
                &ParseOptions { has_header: true, ..Default::default() },
            )
            .unwrap(),
            "Date",
            "Time",
        )
        .unwrap();
        let names: Vec<&str> = table.channels().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bead #1(-0.60m)", "Bead #2(-0.90m)"]);
        assert_eq!(table.records()[0].values, vec![1.0, -2.5]);
        assert_eq!(table.records()[0].timestamp, at(2003, 1, 2, 13, 14, 15));
    }

    #[test]
    fn bad_timestamp_names_the_row() {
        let err = normalize(&raw("01/01/2000,00:00:00,1\n2000-01-02,00:00:00,2"), "col0", "col1").unwrap_err();
        match err {
            DataError::TimestampParse { context, value } => {
                assert_eq!(context, "row 1");
                assert_eq!(value, "2000-01-02 00:00:00");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_channel_names_the_column() {
        let err = normalize(&raw("01/01/2000,00:00:00,1,x"), "col0", "col1").unwrap_err();
        assert!(matches!(err, DataError::ChannelType { ref column, row: 0, .. } if column == "col3"));

        let err = normalize(&raw("01/01/2000,00:00:00,NaN"), "col0", "col1").unwrap_err();
        assert!(matches!(err, DataError::ChannelType { .. }));
    }

    #[test]
    fn missing_columns_and_channels() {
        assert!(matches!(
            normalize(&raw("01/01/2000,00:00:00,1"), "Date", "col1"),
            Err(DataError::MissingColumn { .. })
        ));
        assert!(matches!(
            normalize(&raw("01/01/2000,00:00:00"), "col0", "col1"),
            Err(DataError::NoChannels)
        ));
    }
}
