//! NAMEinator
//!
//! Benchmarks DNS resolution latency of a set of nameservers against a set of
//! domains and ranks the nameservers by a chosen latency statistic.
//!
//! # Architecture
//!
//! Everything lives in the `bench` module:
//! * the sample store and statistics engine hold and summarize RTTs
//! * the orchestrator fans queries out and records the results
//! * the ranking adapter orders a consistent snapshot of the store

/// Nameserver latency benchmark
pub mod bench;
