//! Benchmark orchestration
//!
//! `prepare` fills the store with the nameservers and domains of a run,
//! `run` walks the {domain x nameserver} cross product and folds every
//! timed query back into the store.
//!
//! Domains form the outer loop. Each domain is sent to every nameserver
//! before the next domain is started, which spreads load across the
//! nameservers instead of firing back-to-back queries at one of them.

use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::bench::config::BenchmarkConfig;
use crate::bench::defaults::{DOMAINS, LOCALHOST_NAME, NAMESERVERS, USER_SUPPLIED_NAME};
use crate::bench::errors::BenchResult;
use crate::bench::localdns::LocalResolverLocator;
use crate::bench::probe::{fqdn, DnsProbe};
use crate::bench::store::BenchmarkStore;

/// Counters describing a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub domains: usize,
    pub nameservers: usize,
    pub queries: usize,
    pub failures: usize,
}

pub struct BenchmarkRunner<'a> {
    config: &'a BenchmarkConfig,
    store: &'a BenchmarkStore,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(config: &'a BenchmarkConfig, store: &'a BenchmarkStore) -> BenchmarkRunner<'a> {
        BenchmarkRunner { config, store }
    }

    /// Register nameservers and load domains according to the configuration.
    ///
    /// In contest mode the host's resolver is looked up first and registered
    /// as "localhost"; failing to find it aborts the run.
    pub fn prepare(&self, locator: &dyn LocalResolverLocator) -> BenchResult<()> {
        if self.config.contest {
            let local = locator.locate()?;
            log::info!("Local DNS server {} joins the contest", local);
            self.store.register_nameserver(&local, LOCALHOST_NAME, None);
        }

        self.prepare_nameservers();
        self.prepare_domains()?;

        log::info!(
            "Prepared {} nameservers and {} domains",
            self.store.nameserver_count(),
            self.store.domain_count()
        );
        Ok(())
    }

    fn prepare_nameservers(&self) {
        match self.config.nameserver {
            Some(ref address) => {
                self.register_unless_known(address, USER_SUPPLIED_NAME, None);
            }
            None => {
                for &(address, name, country) in NAMESERVERS {
                    self.register_unless_known(address, name, Some(country));
                }
            }
        }
    }

    /// The local resolver keeps its "localhost" identity even when it is
    /// also part of the list.
    fn register_unless_known(&self, address: &str, name: &str, country: Option<&str>) {
        if self.store.has_nameserver(address) {
            log::debug!("Nameserver {} already registered, keeping existing entry", address);
            return;
        }
        self.store.register_nameserver(address, name, country);
    }

    fn prepare_domains(&self) -> BenchResult<()> {
        let candidates = match self.config.domains_file {
            Some(ref path) => read_domain_file(path)?,
            None => DOMAINS.iter().map(|d| d.to_string()).collect(),
        };

        for domain in candidates {
            if self.store.domain_count() >= self.config.number_of_domains {
                break;
            }
            self.store.load_domain(&fqdn(&domain));
        }

        if self.store.domain_count() < self.config.number_of_domains {
            log::warn!(
                "Only {} domains available, {} requested",
                self.store.domain_count(),
                self.config.number_of_domains
            );
        }
        Ok(())
    }

    /// Query every domain against every nameserver.
    ///
    /// `progress` is called once per domain, after all nameservers have been
    /// queried for it. Query failures are recorded and never abort the run.
    pub fn run<P>(&self, probe: &P, progress: &dyn Fn(&str)) -> RunSummary
    where
        P: DnsProbe + ?Sized,
    {
        let nameservers = self.store.nameservers();
        let domains = self.store.domains();

        let mut summary = RunSummary {
            domains: domains.len(),
            nameservers: nameservers.len(),
            ..Default::default()
        };

        if nameservers.is_empty() || domains.is_empty() {
            log::warn!(
                "Nothing to benchmark: {} nameservers, {} domains",
                nameservers.len(),
                domains.len()
            );
            return summary;
        }

        for domain in &domains {
            let failures = if self.config.parallel {
                self.query_parallel(probe, &domain.fqdn, &nameservers)
            } else {
                self.query_sequential(probe, &domain.fqdn, &nameservers)
            };

            summary.queries += nameservers.len();
            summary.failures += failures;
            progress(&domain.fqdn);
        }

        log::info!(
            "Benchmark finished: {} queries, {} failed",
            summary.queries,
            summary.failures
        );
        summary
    }

    fn query_sequential<P>(&self, probe: &P, domain: &str, nameservers: &[String]) -> usize
    where
        P: DnsProbe + ?Sized,
    {
        nameservers
            .iter()
            .filter(|ns| !self.query_one(probe, domain, ns))
            .count()
    }

    /// One thread per nameserver, joined before the next domain starts
    fn query_parallel<P>(&self, probe: &P, domain: &str, nameservers: &[String]) -> usize
    where
        P: DnsProbe + ?Sized,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = nameservers
                .iter()
                .map(|ns| scope.spawn(move || self.query_one(probe, domain, ns)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(answered) => answered,
                    Err(_) => {
                        log::warn!("Query thread for {} panicked", domain);
                        false
                    }
                })
                .filter(|answered| !answered)
                .count()
        })
    }

    /// Returns whether the nameserver answered
    fn query_one<P>(&self, probe: &P, domain: &str, nameserver: &str) -> bool
    where
        P: DnsProbe + ?Sized,
    {
        let result = probe.probe(domain, nameserver);
        log::debug!("{} @{}: {:?} in {:?}", domain, nameserver, result.outcome, result.rtt);

        self.store.record_sample(nameserver, result.rtt, result.outcome);
        result.outcome.is_success()
    }
}

/// One domain per line; blank lines and `#` comments are skipped
pub fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_ascii_lowercase())
        .collect()
}

fn read_domain_file(path: &Path) -> BenchResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let domains = parse_domain_list(&content);
    log::debug!("Read {} domains from {}", domains.len(), path.display());
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::errors::{BenchError, LocalResolverError};
    use crate::bench::localdns::LocateResult;
    use crate::bench::probe::{Probe, ProbeOutcome};
    use parking_lot::Mutex;
    use std::cell::RefCell;
    use std::time::Duration;

    fn local_resolver() -> LocateResult {
        Ok("192.0.2.53".to_string())
    }

    fn no_resolver() -> LocateResult {
        Err(LocalResolverError::NoAnswer)
    }

    fn config(nameserver: Option<&str>, domains: usize, contest: bool) -> BenchmarkConfig {
        BenchmarkConfig {
            number_of_domains: domains,
            contest,
            nameserver: nameserver.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_contest_registers_localhost_first() {
        let config = config(None, 3, true);
        let store = BenchmarkStore::new();
        BenchmarkRunner::new(&config, &store).prepare(&local_resolver).unwrap();

        let nameservers = store.nameservers();
        assert_eq!(nameservers[0], "192.0.2.53");
        assert_eq!(store.get_record("192.0.2.53").name, LOCALHOST_NAME);
        assert_eq!(nameservers.len(), NAMESERVERS.len() + 1);

        let domains: Vec<String> = store.domains().into_iter().map(|d| d.fqdn).collect();
        assert_eq!(domains, vec!["google.com.", "youtube.com.", "facebook.com."]);
    }

    #[test]
    fn test_prepare_override_replaces_default_list() {
        let config = config(Some("9.9.9.9"), 1, false);
        let store = BenchmarkStore::new();
        BenchmarkRunner::new(&config, &store).prepare(&no_resolver).unwrap();

        assert_eq!(store.nameservers(), vec!["9.9.9.9".to_string()]);
        assert_eq!(store.get_record("9.9.9.9").name, USER_SUPPLIED_NAME);
    }

    #[test]
    fn test_prepare_keeps_localhost_identity() {
        let config = config(Some("192.0.2.53"), 1, true);
        let store = BenchmarkStore::new();
        BenchmarkRunner::new(&config, &store).prepare(&local_resolver).unwrap();

        assert_eq!(store.nameserver_count(), 1);
        assert_eq!(store.get_record("192.0.2.53").name, LOCALHOST_NAME);
    }

    #[test]
    fn test_prepare_fails_when_local_resolver_unknown() {
        let config = config(None, 3, true);
        let store = BenchmarkStore::new();
        let result = BenchmarkRunner::new(&config, &store).prepare(&no_resolver);

        match result {
            Err(BenchError::LocalResolver(LocalResolverError::NoAnswer)) => {}
            other => panic!("Expected LocalResolver error, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_missing_domain_file_is_io_error() {
        let mut config = config(None, 3, false);
        config.domains_file = Some("/nonexistent/nameinator/domains.txt".into());
        let store = BenchmarkStore::new();

        match BenchmarkRunner::new(&config, &store).prepare(&no_resolver) {
            Err(BenchError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_run_visits_domains_in_outer_loop() {
        let config = config(None, 0, false);
        let store = BenchmarkStore::new();
        store.register_nameserver("10.0.0.1", "a", None);
        store.register_nameserver("10.0.0.2", "b", None);
        store.load_domain("one.test.");
        store.load_domain("two.test.");

        let calls = Mutex::new(Vec::new());
        let probe = |domain: &str, nameserver: &str| {
            calls.lock().push(format!("{}@{}", domain, nameserver));
            Probe::answered(Duration::from_millis(5))
        };

        let ticks = RefCell::new(Vec::new());
        let summary = BenchmarkRunner::new(&config, &store).run(&probe, &|d: &str| ticks.borrow_mut().push(d.to_string()));

        assert_eq!(
            *calls.lock(),
            vec!["one.test.@10.0.0.1", "one.test.@10.0.0.2", "two.test.@10.0.0.1", "two.test.@10.0.0.2"]
        );
        assert_eq!(*ticks.borrow(), vec!["one.test.", "two.test."]);
        assert_eq!(summary.queries, 4);
        assert_eq!(summary.failures, 0);
    }

    #[test]
    fn test_run_tolerates_failures() {
        let config = config(None, 0, false);
        let store = BenchmarkStore::new();
        store.register_nameserver("10.0.0.1", "good", None);
        store.register_nameserver("10.0.0.2", "flaky", None);
        for d in &["a.test.", "b.test.", "c.test."] {
            store.load_domain(d);
        }

        let probe = |domain: &str, nameserver: &str| {
            if nameserver == "10.0.0.2" && domain != "b.test." {
                Probe::failed(Duration::from_secs(2), ProbeOutcome::ConnectionError)
            } else if nameserver == "10.0.0.2" {
                Probe::failed(Duration::from_millis(9), ProbeOutcome::ValidationError)
            } else {
                Probe::answered(Duration::from_millis(7))
            }
        };

        let summary = BenchmarkRunner::new(&config, &store).run(&probe, &|_: &str| {});
        assert_eq!(summary.queries, 6);
        assert_eq!(summary.failures, 3);

        let good = store.get_record("10.0.0.1");
        assert_eq!(good.count, 3);

        let flaky = store.get_record("10.0.0.2");
        assert_eq!(flaky.count, 0);
        assert!(flaky.samples.is_empty());
        assert_eq!(flaky.errors_connection, 2);
        assert_eq!(flaky.errors_validation, 1);
    }

    #[test]
    fn test_run_with_empty_inputs() {
        let config = config(None, 0, false);
        let store = BenchmarkStore::new();
        store.register_nameserver("10.0.0.1", "a", None);

        let probe = |_: &str, _: &str| -> Probe { panic!("no domains, no queries") };
        let summary = BenchmarkRunner::new(&config, &store).run(&probe, &|_: &str| {});

        assert_eq!(summary.queries, 0);
        assert_eq!(summary.domains, 0);
        assert_eq!(summary.nameservers, 1);
    }

    #[test]
    fn test_parallel_run_matches_sequential_counts() {
        let mut config = config(None, 0, false);
        config.parallel = true;
        let store = BenchmarkStore::new();
        for i in 1..=8 {
            store.register_nameserver(&format!("10.0.0.{}", i), "ns", None);
        }
        for i in 0..20 {
            store.load_domain(&format!("d{}.test.", i));
        }

        let probe = |domain: &str, nameserver: &str| {
            if nameserver == "10.0.0.8" {
                Probe::failed(Duration::from_secs(1), ProbeOutcome::ConnectionError)
            } else {
                Probe::answered(Duration::from_micros(domain.len() as u64))
            }
        };

        let ticks = Mutex::new(0usize);
        let summary = BenchmarkRunner::new(&config, &store).run(&probe, &|_: &str| *ticks.lock() += 1);

        assert_eq!(summary.queries, 160);
        assert_eq!(summary.failures, 20);
        assert_eq!(*ticks.lock(), 20);
        for i in 1..=7 {
            assert_eq!(store.get_record(&format!("10.0.0.{}", i)).count, 20);
        }
        assert_eq!(store.get_record("10.0.0.8").errors_connection, 20);
    }

    #[test]
    fn test_parse_domain_list() {
        let content = "# popular\nexample.com\n\n  Example.ORG  # trailing\n#skip.me\n";
        assert_eq!(parse_domain_list(content), vec!["example.com", "example.org"]);
    }
}
