//! Concurrency-safe store of per-nameserver RTT samples
//!
//! All mutation goes through a single `parking_lot::RwLock` guarding the
//! whole map. Update critical sections are O(1), so writers never hold the
//! lock for long, and readers (debug lookups, snapshots) may proceed in
//! parallel with each other but never alongside a writer.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::bench::probe::ProbeOutcome;

/// Everything measured for a single nameserver during one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameserverRecord {
    pub address: String,
    pub name: String,
    pub country: Option<String>,
    /// Successful RTT samples in arrival order. Append only.
    pub samples: Vec<Duration>,
    /// Always equal to `samples.len()`
    pub count: usize,
    pub errors_connection: usize,
    pub errors_validation: usize,
}

impl NameserverRecord {
    fn placeholder(address: &str) -> NameserverRecord {
        NameserverRecord {
            address: address.to_string(),
            ..Default::default()
        }
    }

    pub fn total_errors(&self) -> usize {
        self.errors_connection + self.errors_validation
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub fqdn: String,
}

/// Immutable point-in-time copy of every nameserver record, ordered by
/// address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<NameserverRecord>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&NameserverRecord> {
        self.records.iter().find(|r| r.address == address)
    }
}

#[derive(Default)]
struct NameserverTable {
    records: HashMap<String, NameserverRecord>,
    /// Addresses in first-seen order, used to drive the benchmark loop
    order: Vec<String>,
}

impl NameserverTable {
    fn entry(&mut self, address: &str) -> &mut NameserverRecord {
        if !self.records.contains_key(address) {
            self.order.push(address.to_string());
        }

        self.records
            .entry(address.to_string())
            .or_insert_with(|| NameserverRecord::placeholder(address))
    }
}

#[derive(Default)]
struct DomainTable {
    domains: Vec<DomainRecord>,
    seen: HashSet<String>,
}

/// Store owning every nameserver and domain record of a benchmark run
#[derive(Default)]
pub struct BenchmarkStore {
    nameservers: RwLock<NameserverTable>,
    domains: RwLock<DomainTable>,
}

impl BenchmarkStore {
    pub fn new() -> BenchmarkStore {
        BenchmarkStore::default()
    }

    /// Insert or update the identity of a nameserver. Samples and counters of
    /// an existing record are left untouched.
    pub fn register_nameserver(&self, address: &str, name: &str, country: Option<&str>) {
        let mut table = self.nameservers.write();
        let entry = table.entry(address);
        entry.name = name.to_string();
        entry.country = country.map(|c| c.to_string());
    }

    /// Fold one query result into the addressed record.
    ///
    /// An answered query appends its RTT. A failed query only bumps the
    /// matching error counter, its RTT is discarded.
    pub fn record_sample(&self, address: &str, rtt: Duration, outcome: ProbeOutcome) {
        let mut table = self.nameservers.write();
        let entry = table.entry(address);

        match outcome {
            ProbeOutcome::Answered => {
                entry.samples.push(rtt);
                entry.count += 1;
            }
            ProbeOutcome::ConnectionError => entry.errors_connection += 1,
            ProbeOutcome::ValidationError => entry.errors_validation += 1,
        }
    }

    /// Current record for `address`, or an empty placeholder carrying only
    /// the address if it was never seen.
    pub fn get_record(&self, address: &str) -> NameserverRecord {
        self.nameservers
            .read()
            .records
            .get(address)
            .cloned()
            .unwrap_or_else(|| NameserverRecord::placeholder(address))
    }

    /// Copy of all records taken under one read lock
    pub fn snapshot_all(&self) -> Snapshot {
        let table = self.nameservers.read();
        let mut records: Vec<NameserverRecord> = table.records.values().cloned().collect();
        drop(table);

        records.sort_by(|a, b| a.address.cmp(&b.address));
        Snapshot { records }
    }

    /// Nameserver addresses in registration order
    pub fn nameservers(&self) -> Vec<String> {
        self.nameservers.read().order.clone()
    }

    pub fn has_nameserver(&self, address: &str) -> bool {
        self.nameservers.read().records.contains_key(address)
    }

    pub fn nameserver_count(&self) -> usize {
        self.nameservers.read().order.len()
    }

    /// Add a domain to the test set. Duplicates are ignored; returns whether
    /// the domain was new.
    pub fn load_domain(&self, fqdn: &str) -> bool {
        let mut table = self.domains.write();
        if !table.seen.insert(fqdn.to_string()) {
            return false;
        }

        table.domains.push(DomainRecord {
            fqdn: fqdn.to_string(),
        });
        true
    }

    /// Domains in load order
    pub fn domains(&self) -> Vec<DomainRecord> {
        self.domains.read().domains.clone()
    }

    pub fn domain_count(&self) -> usize {
        self.domains.read().domains.len()
    }
}
