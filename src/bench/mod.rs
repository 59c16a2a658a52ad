//! DNS Nameserver Benchmark
//!
//! Measures how quickly a set of nameservers answers queries for a set of
//! domains and ranks them by a latency statistic.
//!
//! # Module Structure
//!
//! * `store` - concurrency-safe per-nameserver RTT samples
//! * `stats` - min / max / mean and nearest-rank percentiles
//! * `orchestrator` - drives the {domain x nameserver} query loop
//! * `ranking` - deterministic ordering by the chosen statistic
//! * `probe` - timing a single DNS query
//! * `localdns` - discovering the host's own resolver
//! * `report` - table, plain, JSON and YAML output

/// Benchmark configuration
pub mod config;

/// Built-in nameserver and domain lists
pub mod defaults;

/// Error types
pub mod errors;

/// Discovery of the locally configured resolver
pub mod localdns;

/// Benchmark orchestration
pub mod orchestrator;

/// Timed DNS queries
pub mod probe;

/// Ranking of nameservers
pub mod ranking;

/// Result rendering
pub mod report;

/// Summary statistics over RTT samples
pub mod stats;

/// Per-nameserver sample store
pub mod store;

pub use config::{BenchmarkConfig, DiscoveryMethod, OutputFormat, SortType};
pub use errors::{BenchError, BenchResult, LocalResolverError, StatsError};
pub use orchestrator::{BenchmarkRunner, RunSummary};
pub use probe::{DnsProbe, HickoryProbe, Probe, ProbeOutcome};
pub use ranking::{rank, rank_store, RankedEntry};
pub use stats::{summarize, summarize_with, MeasurementSummary};
pub use store::{BenchmarkStore, DomainRecord, NameserverRecord, Snapshot};
