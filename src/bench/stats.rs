//! Summary statistics over RTT samples
//!
//! Percentiles use the nearest-rank method without interpolation: the value
//! at percentile `p` is `sorted[floor(count * p / 100)]`, with the index
//! clamped to the last sample. Summaries are computed on demand from the raw
//! samples and never cached.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bench::errors::StatsError;

/// Percentiles computed for every summary
pub const CANONICAL_PERCENTILES: [u8; 8] = [0, 10, 25, 50, 75, 90, 95, 99];

/// Percentiles shown in the detailed table
pub const DISPLAY_PERCENTILES: [u8; 7] = [10, 25, 50, 75, 90, 95, 99];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementSummary {
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub percentiles: BTreeMap<u8, Duration>,
}

impl MeasurementSummary {
    pub fn percentile(&self, p: u8) -> Option<Duration> {
        self.percentiles.get(&p).copied()
    }

    pub fn median(&self) -> Duration {
        // 50 is always part of the canonical set
        self.percentiles.get(&50).copied().unwrap_or(self.mean)
    }
}

/// Summarize `samples` with the canonical percentile set.
pub fn summarize(samples: &[Duration]) -> Result<MeasurementSummary, StatsError> {
    summarize_with(samples, &CANONICAL_PERCENTILES)
}

/// Summarize `samples`, computing the given percentiles (0..=100).
///
/// Fails with `StatsError::EmptySampleSet` on an empty slice.
pub fn summarize_with(
    samples: &[Duration],
    percentiles: &[u8],
) -> Result<MeasurementSummary, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySampleSet);
    }

    let mut sorted = samples.to_vec();
    sorted.sort();

    let table = percentiles
        .iter()
        .map(|&p| (p, nearest_rank(&sorted, p)))
        .collect();

    Ok(MeasurementSummary {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: mean(&sorted),
        percentiles: table,
    })
}

/// Value at percentile `p` of an ascending slice. Callers guarantee the
/// slice is non-empty.
pub fn nearest_rank(sorted: &[Duration], p: u8) -> Duration {
    let count = sorted.len();
    let index = (count * p as usize) / 100;
    sorted[index.min(count - 1)]
}

/// Arithmetic mean, accumulated in u128 nanoseconds
fn mean(samples: &[Duration]) -> Duration {
    let total: u128 = samples.iter().map(|d| d.as_nanos()).sum();
    let avg = total / samples.len() as u128;
    Duration::from_nanos(avg.min(u64::MAX as u128) as u64)
}
