use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::model::TimeSeriesTable;

/// Fence half-width in interquartile ranges.
pub const IQR_FACTOR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Fence mode
// ---------------------------------------------------------------------------

/// Where each channel's quartiles come from when filtering every channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceMode {
    /// Channel k is fenced on the table left after channels 0..k were filtered.
    #[default]
    Sequential,
    /// All fences come from the unfiltered table.
    Original,
}

impl FenceMode {
    pub const ALL: [FenceMode; 2] = [FenceMode::Sequential, FenceMode::Original];

    pub fn label(self) -> &'static str {
        match self {
            FenceMode::Sequential => "Sequential",
            FenceMode::Original => "From original table",
        }
    }
}

// ---------------------------------------------------------------------------
// Fence
// ---------------------------------------------------------------------------

/// Open interval `(q1 - 1.5·IQR, q3 + 1.5·IQR)` of accepted values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub low: f64,
    pub high: f64,
}

impl Fence {
    /// Fence of a set of values; `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Fence> {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile(&sorted, 0.25)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Fence {
            low: q1 - IQR_FACTOR * iqr,
            high: q3 + IQR_FACTOR * iqr,
        })
    }

    /// Zero spread: both bounds are the same value.
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }

    /// Strictly inside the bounds. A degenerate fence keeps exact matches.
    pub fn contains(&self, value: f64) -> bool {
        if self.is_degenerate() {
            value == self.low
        } else {
            self.low < value && value < self.high
        }
    }
}

/// Quantile of sorted values with linear interpolation between the two
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Remove the rows whose `channel` value lies outside that channel's fence,
/// computed over `table` as given.
pub fn filter_outliers(table: TimeSeriesTable, channel: &str) -> Result<TimeSeriesTable, DataError> {
    let idx = table
        .channel_index(channel)
        .ok_or_else(|| DataError::MissingColumn { name: channel.to_string() })?;
    Ok(filter_channel(table, idx))
}

fn filter_channel(mut table: TimeSeriesTable, channel: usize) -> TimeSeriesTable {
    let Some(fence) = Fence::from_values(table.channel_values(channel)) else {
        return table;
    };
    warn_if_degenerate(&table, channel, &fence);

    let before = table.len();
    table.retain(|r| fence.contains(r.values[channel]));
    log::debug!(
        "Channel '{}': fence ({:.3}, {:.3}) removed {} of {} rows",
        table.channels()[channel],
        fence.low,
        fence.high,
        before - table.len(),
        before
    );
    table
}

/// Filter every channel, in channel order.
pub fn filter_all(table: TimeSeriesTable, mode: FenceMode) -> TimeSeriesTable {
    let before = table.len();
    let filtered = match mode {
        FenceMode::Sequential => (0..table.channels().len()).fold(table, filter_channel),
        FenceMode::Original => {
            let fences: Vec<Option<Fence>> = (0..table.channels().len())
                .map(|ch| {
                    let fence = Fence::from_values(table.channel_values(ch));
                    if let Some(f) = &fence {
                        warn_if_degenerate(&table, ch, f);
                    }
                    fence
                })
                .collect();
            let mut table = table;
            table.retain(|r| {
                fences
                    .iter()
                    .zip(&r.values)
                    .all(|(fence, &v)| fence.map_or(true, |f| f.contains(v)))
            });
            table
        }
    };

    if filtered.is_empty() && before > 0 {
        log::warn!("Outlier filtering removed all {before} rows");
    }
    filtered
}

fn warn_if_degenerate(table: &TimeSeriesTable, channel: usize, fence: &Fence) {
    if fence.is_degenerate() {
        log::warn!(
            "Channel '{}' has zero interquartile range; only readings equal to {} are kept",
            table.channels()[channel],
            fence.low
        );
    }
}
