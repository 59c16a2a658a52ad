//! Timing single DNS queries against a nameserver
//!
//! The benchmark only needs "how long did it take, and did it work". The
//! `DnsProbe` trait captures exactly that, so the orchestrator can be driven
//! by the real resolver or by a closure in tests.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::{Name, Resolver};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub const DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// The nameserver produced a response
    Answered,
    /// No response: timeout, unreachable, transport or wire error
    ConnectionError,
    /// The exchange completed but the result is unusable
    ValidationError,
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        *self == ProbeOutcome::Answered
    }
}

/// Result of a single timed query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub rtt: Duration,
    pub outcome: ProbeOutcome,
}

impl Probe {
    pub fn answered(rtt: Duration) -> Probe {
        Probe {
            rtt,
            outcome: ProbeOutcome::Answered,
        }
    }

    pub fn failed(rtt: Duration, outcome: ProbeOutcome) -> Probe {
        Probe { rtt, outcome }
    }
}

/// Sends one query for `domain` to `nameserver` (port 53) and times it.
/// Implementations handle their own timeouts and must never panic on
/// network failure.
pub trait DnsProbe: Sync {
    fn probe(&self, domain: &str, nameserver: &str) -> Probe;
}

impl<F> DnsProbe for F
where
    F: Fn(&str, &str) -> Probe + Sync,
{
    fn probe(&self, domain: &str, nameserver: &str) -> Probe {
        self(domain, nameserver)
    }
}

/// Probe backed by hickory-resolver, one uncached resolver per nameserver
pub struct HickoryProbe {
    timeout: Duration,
    resolvers: RwLock<HashMap<String, Arc<Resolver>>>,
}

impl HickoryProbe {
    pub fn new(timeout: Duration) -> HickoryProbe {
        HickoryProbe {
            timeout,
            resolvers: RwLock::new(HashMap::new()),
        }
    }

    fn resolver_for(&self, nameserver: &str) -> std::io::Result<Arc<Resolver>> {
        if let Some(resolver) = self.resolvers.read().get(nameserver) {
            return Ok(resolver.clone());
        }

        let ip: IpAddr = nameserver.parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid nameserver address {}: {}", nameserver, e),
            )
        })?;

        let ns_config = NameServerConfig::new(SocketAddr::new(ip, DNS_PORT), Protocol::Udp);
        let config = ResolverConfig::from_parts(None, vec![], vec![ns_config]);

        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = false;
        opts.ndots = 0;

        let resolver = Arc::new(Resolver::new(config, opts)?);
        self.resolvers
            .write()
            .entry(nameserver.to_string())
            .or_insert_with(|| resolver.clone());

        log::debug!("Created resolver for nameserver {}", nameserver);
        Ok(resolver)
    }
}

impl DnsProbe for HickoryProbe {
    fn probe(&self, domain: &str, nameserver: &str) -> Probe {
        let name = match Name::from_ascii(fqdn(domain)) {
            Ok(name) => name,
            Err(e) => {
                log::warn!("Skipping invalid domain name {}: {}", domain, e);
                return Probe::failed(Duration::ZERO, ProbeOutcome::ValidationError);
            }
        };

        let resolver = match self.resolver_for(nameserver) {
            Ok(resolver) => resolver,
            Err(e) => {
                log::warn!("Failed to set up resolver for {}: {}", nameserver, e);
                return Probe::failed(Duration::ZERO, ProbeOutcome::ConnectionError);
            }
        };

        let start = Instant::now();
        let result = resolver.lookup(name, RecordType::A);
        let rtt = start.elapsed();

        match result {
            Ok(_) => Probe::answered(rtt),
            Err(e) => {
                let outcome = classify_error(&e);
                log::debug!("Query {} @{} failed after {:?}: {} ({:?})", domain, nameserver, rtt, e, outcome);
                Probe::failed(rtt, outcome)
            }
        }
    }
}

/// Append the root label so search domains are never applied
pub fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{}.", domain)
    }
}

fn classify_error(err: &ResolveError) -> ProbeOutcome {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            classify_response_code(*response_code)
        }
        _ => ProbeOutcome::ConnectionError,
    }
}

/// A response without usable records still proves the server answered,
/// unless the server itself signalled failure.
fn classify_response_code(code: ResponseCode) -> ProbeOutcome {
    match code {
        ResponseCode::NoError | ResponseCode::NXDomain => ProbeOutcome::Answered,
        _ => ProbeOutcome::ValidationError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn_appends_root_once() {
        assert_eq!(fqdn("example.com"), "example.com.");
        assert_eq!(fqdn("example.com."), "example.com.");
    }

    #[test]
    fn test_response_code_classification() {
        assert_eq!(classify_response_code(ResponseCode::NoError), ProbeOutcome::Answered);
        assert_eq!(classify_response_code(ResponseCode::NXDomain), ProbeOutcome::Answered);
        assert_eq!(classify_response_code(ResponseCode::ServFail), ProbeOutcome::ValidationError);
        assert_eq!(classify_response_code(ResponseCode::Refused), ProbeOutcome::ValidationError);
    }

    #[test]
    fn test_timeout_is_connection_error() {
        let err = ResolveError::from(ResolveErrorKind::Timeout);
        assert_eq!(classify_error(&err), ProbeOutcome::ConnectionError);
    }

    #[test]
    fn test_closure_is_a_probe() {
        let probe = |domain: &str, nameserver: &str| {
            if nameserver == "192.0.2.1" {
                Probe::failed(Duration::from_secs(2), ProbeOutcome::ConnectionError)
            } else {
                Probe::answered(Duration::from_millis(domain.len() as u64))
            }
        };

        assert_eq!(probe.probe("abc.", "1.1.1.1"), Probe::answered(Duration::from_millis(4)));
        assert!(!probe.probe("abc.", "192.0.2.1").outcome.is_success());
    }

    #[test]
    fn test_invalid_nameserver_is_connection_error() {
        let probe = HickoryProbe::new(Duration::from_millis(100));
        let result = probe.probe("example.com", "not-an-ip");
        assert_eq!(result.outcome, ProbeOutcome::ConnectionError);
    }
}
