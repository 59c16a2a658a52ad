//! Ranking of nameservers by a latency statistic
//!
//! Order is fully deterministic for a given snapshot:
//!
//! 1. measured nameservers by ascending sort key,
//! 2. equal keys by ascending address,
//! 3. nameservers without a single successful sample last, by address.

use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bench::config::SortType;
use crate::bench::stats::{summarize, MeasurementSummary};
use crate::bench::store::{BenchmarkStore, NameserverRecord, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub address: String,
    pub name: String,
    pub country: Option<String>,
    pub count: usize,
    pub errors_connection: usize,
    pub errors_validation: usize,
    /// `None` when the nameserver never answered
    pub summary: Option<MeasurementSummary>,
    pub sort_key: Option<Duration>,
}

impl RankedEntry {
    fn from_record(record: &NameserverRecord, sort: SortType) -> RankedEntry {
        let summary = summarize(&record.samples).ok();
        let sort_key = summary.as_ref().map(|s| sort_key(s, sort));

        RankedEntry {
            address: record.address.clone(),
            name: record.name.clone(),
            country: record.country.clone(),
            count: record.count,
            errors_connection: record.errors_connection,
            errors_validation: record.errors_validation,
            summary,
            sort_key,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.summary.is_some()
    }
}

pub fn sort_key(summary: &MeasurementSummary, sort: SortType) -> Duration {
    match sort {
        SortType::Min => summary.min,
        SortType::Max => summary.max,
        SortType::Avg => summary.mean,
        SortType::Median => summary.median(),
    }
}

fn compare(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    match (a.sort_key, b.sort_key) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.address.cmp(&b.address))
}

/// Rank every nameserver of `snapshot`, fastest first.
pub fn rank(snapshot: &Snapshot, sort: SortType) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = snapshot
        .records
        .iter()
        .map(|record| RankedEntry::from_record(record, sort))
        .collect();

    entries.sort_by(compare);
    entries
}

/// Snapshot the store and rank it
pub fn rank_store(store: &BenchmarkStore, sort: SortType) -> Vec<RankedEntry> {
    rank(&store.snapshot_all(), sort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::probe::ProbeOutcome;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn store_with(samples: &[(&str, &[u64])]) -> BenchmarkStore {
        let store = BenchmarkStore::new();
        for (address, values) in samples {
            store.register_nameserver(address, address, None);
            for v in values.iter() {
                store.record_sample(address, ms(*v), ProbeOutcome::Answered);
            }
        }
        store
    }

    fn addresses(entries: &[RankedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.address.as_str()).collect()
    }

    #[test]
    fn test_rank_by_max_ignores_mean() {
        // a: mean 20, max 50    b: mean 40, max 41
        let store = store_with(&[("10.0.0.1", &[5, 5, 50]), ("10.0.0.2", &[39, 40, 41])]);

        let by_max = rank_store(&store, SortType::Max);
        assert_eq!(addresses(&by_max), vec!["10.0.0.2", "10.0.0.1"]);
        assert_eq!(by_max[0].sort_key, Some(ms(41)));

        let by_avg = rank_store(&store, SortType::Avg);
        assert_eq!(addresses(&by_avg), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_rank_by_min_and_median() {
        let store = store_with(&[("10.0.0.1", &[1, 90, 95]), ("10.0.0.2", &[10, 11, 12])]);

        assert_eq!(addresses(&rank_store(&store, SortType::Min)), vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(addresses(&rank_store(&store, SortType::Median)), vec!["10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn test_ties_break_by_address() {
        let store = store_with(&[("9.9.9.9", &[10]), ("1.1.1.1", &[10]), ("8.8.8.8", &[10])]);
        let ranked = rank_store(&store, SortType::Avg);
        assert_eq!(addresses(&ranked), vec!["1.1.1.1", "8.8.8.8", "9.9.9.9"]);
    }

    #[test]
    fn test_unmeasured_nameservers_rank_last() {
        let store = store_with(&[("10.0.0.9", &[100]), ("10.0.0.1", &[])]);
        for _ in 0..5 {
            store.record_sample("10.0.0.1", ms(2000), ProbeOutcome::ConnectionError);
        }
        store.register_nameserver("10.0.0.0", "never queried", None);

        let ranked = rank_store(&store, SortType::Avg);
        assert_eq!(addresses(&ranked), vec!["10.0.0.9", "10.0.0.0", "10.0.0.1"]);

        let dead = &ranked[2];
        assert!(!dead.is_measured());
        assert_eq!(dead.sort_key, None);
        assert_eq!(dead.errors_connection, 5);
        assert_eq!(dead.count, 0);
    }

    #[test]
    fn test_rank_is_repeatable() {
        let store = store_with(&[
            ("10.0.0.3", &[7, 7, 7]),
            ("10.0.0.1", &[7, 7, 7]),
            ("10.0.0.2", &[3, 30]),
            ("10.0.0.4", &[]),
        ]);
        let snapshot = store.snapshot_all();

        let first = rank(&snapshot, SortType::Median);
        let second = rank(&snapshot, SortType::Median);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_empty_snapshot() {
        assert!(rank(&Snapshot::default(), SortType::Avg).is_empty());
    }

    #[test]
    fn test_entry_carries_identity() {
        let store = BenchmarkStore::new();
        store.register_nameserver("9.9.9.9", "Quad9", Some("CH"));
        store.record_sample("9.9.9.9", ms(12), ProbeOutcome::Answered);
        store.record_sample("9.9.9.9", ms(0), ProbeOutcome::ValidationError);

        let ranked = rank_store(&store, SortType::Avg);
        let entry = &ranked[0];
        assert_eq!(entry.name, "Quad9");
        assert_eq!(entry.country.as_deref(), Some("CH"));
        assert_eq!(entry.count, 1);
        assert_eq!(entry.errors_validation, 1);
        assert_eq!(entry.summary.as_ref().unwrap().mean, ms(12));
    }
}
