//! NAMEinator CLI
//!
//! Benchmarks public nameservers (and, in contest mode, the resolver this
//! host is configured with) and prints them ranked by latency.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use nameinator::bench::localdns::locator_for;
use nameinator::bench::report::Report;
use nameinator::bench::{
    rank_store, BenchError, BenchmarkConfig, BenchmarkRunner, BenchmarkStore, DiscoveryMethod,
    HickoryProbe, OutputFormat, SortType,
};

/// NAMEinator - find the fastest DNS server for you
#[derive(Parser)]
#[command(name = "nameinator")]
#[command(version)]
#[command(about = "Benchmark DNS nameservers and rank them by latency", long_about = None)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(short, long, env = "NAMEINATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Number of domains to be tested
    #[arg(short, long)]
    domains: Option<usize>,

    /// Read domains from this file (one per line) instead of the built-in list
    #[arg(long)]
    domains_file: Option<PathBuf>,

    /// Benchmark this nameserver instead of the built-in list
    #[arg(short, long)]
    nameserver: Option<String>,

    /// Contest against the locally configured DNS server
    #[arg(long, value_name = "BOOL")]
    contest: Option<bool>,

    /// How to find the locally configured DNS server
    #[arg(long, value_enum)]
    discovery: Option<DiscoveryMethod>,

    /// Statistic to rank by
    #[arg(short, long, value_enum)]
    sort: Option<SortType>,

    /// Show the full percentiles table
    #[arg(short, long)]
    percentiles: bool,

    /// Per-query timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Query all nameservers of a domain concurrently
    #[arg(long)]
    parallel: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Enable debug logging and raw record output
    #[arg(long)]
    debug: bool,

    /// No color output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn into_config(self) -> Result<BenchmarkConfig, BenchError> {
        let mut config = match self.config {
            Some(ref path) => BenchmarkConfig::load(path)?,
            None => BenchmarkConfig::default(),
        };

        if let Some(domains) = self.domains {
            config.number_of_domains = domains;
        }
        if self.domains_file.is_some() {
            config.domains_file = self.domains_file;
        }
        if self.nameserver.is_some() {
            config.nameserver = self.nameserver;
        }
        if let Some(contest) = self.contest {
            config.contest = contest;
        }
        if let Some(discovery) = self.discovery {
            config.discovery = discovery;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.query_timeout_ms = timeout_ms;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config.show_percentiles |= self.percentiles;
        config.parallel |= self.parallel;
        config.debug |= self.debug;

        Ok(config)
    }
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn domain_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} domains {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn main() {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("Invalid configuration: {}", e));
            process::exit(1);
        }
    };

    let level = if config.debug { log::Level::Debug } else { log::Level::Warn };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    log::info!("starting nameinator {} with {:?}", env!("CARGO_PKG_VERSION"), config);

    let store = BenchmarkStore::new();
    let runner = BenchmarkRunner::new(&config, &store);

    let locator = locator_for(config.discovery);
    if let Err(e) = runner.prepare(locator.as_ref()) {
        print_error(&format!("Failed to prepare benchmark: {}", e));
        process::exit(1);
    }

    let started = chrono::Local::now();
    let probe = HickoryProbe::new(config.query_timeout());
    let pb = domain_progress(store.domain_count());
    let summary = runner.run(&probe, &|domain: &str| {
        pb.set_message(domain.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let entries = rank_store(&store, config.sort);
    let records: Vec<_> = entries.iter().map(|e| store.get_record(&e.address)).collect();

    let report = Report {
        config: &config,
        started,
        summary,
        entries: &entries,
        records: &records,
    };
    println!("{}", report.render());
}
