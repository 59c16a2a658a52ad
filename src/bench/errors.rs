//! Error types for benchmark setup, resolver discovery and statistics

use std::error::Error as StdError;
use std::fmt;
use std::io;

use derive_more::{Display, Error, From};

/// Setup-phase failure. Per-query failures never end up here, they are
/// folded into the nameserver's error counters instead.
#[derive(Debug, Display, From, Error)]
pub enum BenchError {
    LocalResolver(LocalResolverError),
    Io(io::Error),
    Config(toml::de::Error),
}

pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Returned by the statistics engine when asked to summarize nothing.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    EmptySampleSet,
}

/// Outcome classification for locating the operating system's resolver
#[derive(Debug)]
pub enum LocalResolverError {
    /// The lookup utility is not installed or cannot be executed
    ToolUnavailable(io::Error),
    /// The lookup utility exited with a status that is not known to be benign
    ToolFailed { code: Option<i32> },
    /// The lookup ran but reported no usable IPv4 resolver address
    NoAnswer,
    /// The system resolver configuration could not be read
    SystemConf(io::Error),
}

impl fmt::Display for LocalResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalResolverError::ToolUnavailable(e) => {
                write!(f, "could not run \"nslookup\" to obtain the local DNS server - is it available? ({})", e)
            }
            LocalResolverError::ToolFailed { code: Some(code) } => {
                write!(f, "\"nslookup\" exited with status {}", code)
            }
            LocalResolverError::ToolFailed { code: None } => {
                write!(f, "\"nslookup\" was terminated by a signal")
            }
            LocalResolverError::NoAnswer => {
                write!(f, "no IPv4 address for the local DNS server was found")
            }
            LocalResolverError::SystemConf(e) => {
                write!(f, "failed to read the system resolver configuration: {}", e)
            }
        }
    }
}

impl StdError for LocalResolverError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            LocalResolverError::ToolUnavailable(e) | LocalResolverError::SystemConf(e) => Some(e),
            _ => None,
        }
    }
}
