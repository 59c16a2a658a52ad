//! Discovery of the resolver configured on this host
//!
//! Only IPv4 resolvers are recognised.

use std::io;
use std::net::IpAddr;
use std::process::Command;

use lazy_static::lazy_static;
use regex::Regex;

use crate::bench::config::DiscoveryMethod;
use crate::bench::errors::LocalResolverError;

lazy_static! {
    static ref IPV4_REGEX: Regex =
        Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").expect("Failed to compile IPv4 regex");
}

pub type LocateResult = std::result::Result<String, LocalResolverError>;

pub trait LocalResolverLocator {
    fn locate(&self) -> LocateResult;
}

impl<F> LocalResolverLocator for F
where
    F: Fn() -> LocateResult,
{
    fn locate(&self) -> LocateResult {
        self()
    }
}

pub fn locator_for(method: DiscoveryMethod) -> Box<dyn LocalResolverLocator> {
    match method {
        DiscoveryMethod::Nslookup => Box::new(NslookupLocator::default()),
        DiscoveryMethod::System => Box::new(SystemConfLocator),
    }
}

/// Asks `nslookup .` which server it talks to
pub struct NslookupLocator {
    program: String,
}

impl Default for NslookupLocator {
    fn default() -> Self {
        NslookupLocator {
            program: "nslookup".to_string(),
        }
    }
}

impl NslookupLocator {
    pub fn with_program(program: &str) -> NslookupLocator {
        NslookupLocator {
            program: program.to_string(),
        }
    }
}

impl LocalResolverLocator for NslookupLocator {
    fn locate(&self) -> LocateResult {
        let output = Command::new(&self.program)
            .arg(".")
            .output()
            .map_err(LocalResolverError::ToolUnavailable)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        log::debug!("nslookup output:\n{}", stdout);

        check_exit_code(output.status.code())?;

        let address = parse_nslookup_output(&stdout).ok_or(LocalResolverError::NoAnswer)?;
        log::debug!("Local DNS server: {}", address);
        Ok(address)
    }
}

/// Newer nslookup builds exit with 1 for `nslookup .` while still printing
/// the server they used.
pub fn check_exit_code(code: Option<i32>) -> Result<(), LocalResolverError> {
    match code {
        Some(0) | Some(1) => Ok(()),
        code => Err(LocalResolverError::ToolFailed { code }),
    }
}

/// First IPv4 address printed by nslookup
pub fn parse_nslookup_output(output: &str) -> Option<String> {
    IPV4_REGEX
        .find_iter(output)
        .map(|m| m.as_str())
        .find(|candidate| candidate.parse::<std::net::Ipv4Addr>().is_ok())
        .map(|m| m.to_string())
}

/// Reads the host resolver configuration (resolv.conf, registry) directly
pub struct SystemConfLocator;

impl LocalResolverLocator for SystemConfLocator {
    fn locate(&self) -> LocateResult {
        let (config, _opts) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|e| LocalResolverError::SystemConf(io::Error::new(io::ErrorKind::Other, e)))?;

        config
            .name_servers()
            .iter()
            .map(|ns| ns.socket_addr.ip())
            .find(IpAddr::is_ipv4)
            .map(|ip| ip.to_string())
            .ok_or(LocalResolverError::NoAnswer)
    }
}
