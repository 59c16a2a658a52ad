//! Rendering of ranked results for humans and machines

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local};
use colored::*;
use comfy_table::Table;
use serde_json::{json, Value};

use crate::bench::config::{BenchmarkConfig, OutputFormat};
use crate::bench::orchestrator::RunSummary;
use crate::bench::ranking::RankedEntry;
use crate::bench::stats::DISPLAY_PERCENTILES;
use crate::bench::store::NameserverRecord;

/// Everything the report needs about a finished run
pub struct Report<'a> {
    pub config: &'a BenchmarkConfig,
    pub started: DateTime<Local>,
    pub summary: RunSummary,
    pub entries: &'a [RankedEntry],
    /// Raw store records by address, shown in debug mode
    pub records: &'a [NameserverRecord],
}

pub fn millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

fn fmt_duration(d: Option<Duration>) -> String {
    match d {
        Some(d) => format!("{:?}", d),
        None => "-".to_string(),
    }
}

impl<'a> Report<'a> {
    pub fn render(&self) -> String {
        match self.config.output {
            OutputFormat::Table => self.render_table(),
            OutputFormat::Plain => self.render_plain(),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.to_json()).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
            }
            OutputFormat::Yaml => serde_yaml::to_string(&self.to_json()).unwrap_or_else(|e| format!("error: {}", e)),
        }
    }

    /// Stable machine-readable document, durations in milliseconds
    pub fn to_json(&self) -> Value {
        let results: Vec<Value> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let stats = entry.summary.as_ref().map(|s| {
                    let percentiles: serde_json::Map<String, Value> = s
                        .percentiles
                        .iter()
                        .map(|(p, d)| (format!("p{}", p), json!(millis(*d))))
                        .collect();
                    json!({
                        "min_ms": millis(s.min),
                        "mean_ms": millis(s.mean),
                        "median_ms": millis(s.median()),
                        "max_ms": millis(s.max),
                        "percentiles_ms": percentiles,
                    })
                });

                json!({
                    "rank": i + 1,
                    "address": entry.address,
                    "name": entry.name,
                    "country": entry.country,
                    "count": entry.count,
                    "errors_connection": entry.errors_connection,
                    "errors_validation": entry.errors_validation,
                    "sort_key_ms": entry.sort_key.map(millis),
                    "stats": stats,
                })
            })
            .collect();

        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "started": self.started.to_rfc3339(),
            "sort": self.config.sort.to_string(),
            "domains": self.summary.domains,
            "nameservers": self.summary.nameservers,
            "queries": self.summary.queries,
            "failures": self.summary.failures,
            "results": results,
        })
    }

    fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.header().bold());

        let mut table = Table::new();
        table.set_header(vec!["#", "Nameserver", "Name", "Min", "Avg", "Median", "95%", "Max", "Answered", "Errors"]);

        for (i, entry) in self.entries.iter().enumerate() {
            let summary = entry.summary.as_ref();
            table.add_row(vec![
                (i + 1).to_string(),
                entry.address.clone(),
                entry.name.clone(),
                fmt_duration(summary.map(|s| s.min)),
                fmt_duration(summary.map(|s| s.mean)),
                fmt_duration(summary.map(|s| s.median())),
                fmt_duration(summary.and_then(|s| s.percentile(95))),
                fmt_duration(summary.map(|s| s.max)),
                entry.count.to_string(),
                format!("{}/{}", entry.errors_connection, entry.errors_validation),
            ]);
        }
        let _ = writeln!(out, "{}", table);

        if self.config.show_percentiles {
            let _ = writeln!(out, "{}", self.percentile_table());
        }

        if self.config.debug {
            self.write_debug_records(&mut out);
        }

        out
    }

    fn percentile_table(&self) -> Table {
        let mut table = Table::new();
        let mut header = vec!["Nameserver".to_string()];
        header.extend(DISPLAY_PERCENTILES.iter().map(|p| format!("{}%", p)));
        table.set_header(header);

        for entry in self.entries {
            let mut row = vec![entry.address.clone()];
            row.extend(
                DISPLAY_PERCENTILES
                    .iter()
                    .map(|p| fmt_duration(entry.summary.as_ref().and_then(|s| s.percentile(*p)))),
            );
            table.add_row(row);
        }
        table
    }

    /// Line-oriented output in the classic format
    fn render_plain(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.header());

        for entry in self.entries {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} ({}): ", entry.address, entry.name);

            match entry.summary {
                Some(ref s) => {
                    let _ = writeln!(
                        out,
                        "Min. [{:?}], Avg. [{:?}], Med. [{:?}], 95% [{:?}], Max. [{:?}]",
                        s.min,
                        s.mean,
                        s.median(),
                        s.percentile(95).unwrap_or(s.max),
                        s.max
                    );
                    if self.config.show_percentiles {
                        for p in DISPLAY_PERCENTILES.iter() {
                            let _ = writeln!(out, "{}%:  {}", p, fmt_duration(s.percentile(*p)));
                        }
                    }
                }
                None => {
                    let _ = writeln!(out, "no successful queries");
                }
            }

            let _ = writeln!(
                out,
                "Answered: {}, connection errors: {}, validation errors: {}",
                entry.count, entry.errors_connection, entry.errors_validation
            );
        }

        if self.config.debug {
            let _ = writeln!(out);
            self.write_debug_records(&mut out);
        }

        out
    }

    fn write_debug_records(&self, out: &mut String) {
        for entry in self.entries {
            if let Some(record) = self.records.iter().find(|r| r.address == entry.address) {
                let _ = writeln!(out, "DEBUG: {:?}", record);
            }
        }
    }

    fn header(&self) -> String {
        format!(
            "nameinator {} - {} - {} domains x {} nameservers, {} queries ({} failed), sorted by {}",
            env!("CARGO_PKG_VERSION"),
            self.started.format("%Y-%m-%d %H:%M:%S"),
            self.summary.domains,
            self.summary.nameservers,
            self.summary.queries,
            self.summary.failures,
            self.config.sort
        )
    }
}
