use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Channel – one sensor depth
// ---------------------------------------------------------------------------

/// A numeric column of the table: one sensor at one depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    /// Depth in metres (negative below surface), if the name carries one,
    /// e.g. `Bead #3(-1.20m)`.
    pub depth_m: Option<f64>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let depth_m = depth_from_name(&name);
        Channel { name, depth_m }
    }

    /// Depth used on profile charts; channels without one are stacked
    /// one metre apart in column order.
    pub fn plot_depth(&self, index: usize) -> f64 {
        self.depth_m.unwrap_or(-(index as f64 + 1.0))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn depth_from_name(name: &str) -> Option<f64> {
    let name = name.trim();
    let open = name.rfind('(')?;
    let inner = name[open + 1..].strip_suffix(')')?.trim();
    inner.strip_suffix('m')?.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// Record – one timestamped row
// ---------------------------------------------------------------------------

/// One row of the table: a timestamp and one value per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// TimeSeriesTable
// ---------------------------------------------------------------------------

/// Typed table of records sharing a fixed channel set.
///
/// Records keep source order; nothing here sorts them.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable {
    /// Name of the timestamp column, for display.
    pub time_column: String,
    channels: Vec<Channel>,
    /// Channel name → position in `channels`.
    index: BTreeMap<String, usize>,
    records: Vec<Record>,
}

impl TimeSeriesTable {
    /// Build a table; every record must carry `channels.len()` values.
    pub fn new(time_column: impl Into<String>, channels: Vec<Channel>, records: Vec<Record>) -> Self {
        debug_assert!(records.iter().all(|r| r.values.len() == channels.len()));
        let mut index = BTreeMap::new();
        for (i, ch) in channels.iter().enumerate() {
            index.entry(ch.name.clone()).or_insert(i);
        }
        TimeSeriesTable {
            time_column: time_column.into(),
            channels,
            index,
            records,
        }
    }

    /// A table with the same channels and a different set of records.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        TimeSeriesTable {
            time_column: self.time_column.clone(),
            channels: self.channels.clone(),
            index: self.index.clone(),
            records,
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Values of one channel in row order.
    pub fn channel_values(&self, channel: usize) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(move |r| r.values[channel])
    }

    /// Drop the records for which `keep` is false.
    pub(crate) fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.records.retain(keep);
    }

    /// Earliest and latest timestamp.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.first()?.timestamp;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.timestamp), hi.max(r.timestamp))
        }))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Envelope – trumpet curve reference records
// ---------------------------------------------------------------------------

/// The records holding the highest and the lowest reading of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub max_record: Record,
    /// Channel in `max_record` that holds the maximum.
    pub max_channel: usize,
    pub min_record: Record,
    /// Channel in `min_record` that holds the minimum.
    pub min_channel: usize,
}

impl Envelope {
    pub fn max_value(&self) -> f64 {
        self.max_record.values[self.max_channel]
    }

    pub fn min_value(&self) -> f64 {
        self.min_record.values[self.min_channel]
    }
}
