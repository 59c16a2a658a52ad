//! Benchmark configuration
//!
//! A single `BenchmarkConfig` value is assembled once (defaults, then an
//! optional TOML file, then command line flags) and handed by reference to
//! every component that needs it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bench::errors::BenchResult;

/// Statistic used as the ranking sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    Min,
    Max,
    #[serde(alias = "mean")]
    #[value(alias = "mean")]
    Avg,
    Median,
}

impl Default for SortType {
    fn default() -> Self {
        SortType::Avg
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortType::Min => "min",
            SortType::Max => "max",
            SortType::Avg => "avg",
            SortType::Median => "median",
        };
        f.write_str(name)
    }
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(SortType::Min),
            "max" => Ok(SortType::Max),
            "avg" | "mean" => Ok(SortType::Avg),
            "median" | "med" => Ok(SortType::Median),
            other => Err(format!("unknown sort type '{}', expected min|max|avg|median", other)),
        }
    }
}

/// How the operating system's resolver is discovered in contest mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMethod {
    /// Run `nslookup .` and take the first IPv4 address it prints
    Nslookup,
    /// Read the resolver configuration of the host directly
    System,
}

impl Default for DiscoveryMethod {
    fn default() -> Self {
        DiscoveryMethod::Nslookup
    }
}

/// Result rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Plain,
    Json,
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Number of domains taken from the domain list
    pub number_of_domains: usize,
    pub debug: bool,
    /// Benchmark the locally configured resolver alongside the others
    pub contest: bool,
    /// Benchmark only this nameserver instead of the built-in list
    pub nameserver: Option<String>,
    pub show_percentiles: bool,
    pub sort: SortType,
    pub query_timeout_ms: u64,
    /// Query every nameserver of a domain concurrently
    pub parallel: bool,
    pub domains_file: Option<PathBuf>,
    pub discovery: DiscoveryMethod,
    pub output: OutputFormat,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            number_of_domains: 100,
            debug: false,
            contest: true,
            nameserver: None,
            show_percentiles: false,
            sort: SortType::Avg,
            query_timeout_ms: 2000,
            parallel: false,
            domains_file: None,
            discovery: DiscoveryMethod::Nslookup,
            output: OutputFormat::Table,
        }
    }
}

impl BenchmarkConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> BenchResult<BenchmarkConfig> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> BenchResult<BenchmarkConfig> {
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}
