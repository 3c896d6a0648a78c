//! dnsreport - DNS resolver latency reports.
//!
//! This crate provides both a library API and a CLI tool that:
//! - Pings each DNS server once using ICMP echo
//! - Prints one latency line per server
//! - Writes a self-contained HTML report with a results table and an
//!   embedded PNG bar chart
//! - Opens the report in the default viewer
//!
//! # Library Usage
//!
//! ```ignore
//! use dnsreport::{render_chart, render_report, IcmpPinger, Prober};
//!
//! let results = Prober::new(IcmpPinger::new()).probe(&servers).await;
//! let chart = render_chart(&results)?;
//! let html = render_report(&results, &chart)?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Probe the built-in resolver list and open the report
//! dnsreport
//!
//! # Custom servers, shorter timeout, no viewer
//! dnsreport --dns 8.8.8.8#Google --dns 1.1.1.1#Cloudflare --timeout 1 --no-open
//!
//! # Probe four servers at a time, CSV on stdout
//! dnsreport -j 4 --format csv
//!
//! # Show the servers that would be probed
//! dnsreport list
//! ```
//!
//! # Unreachable servers
//!
//! A server that does not answer within the timeout is recorded as
//! [`Latency::Unreachable`]. It prints as `inf ms`, shows as `unreachable`
//! in the table and is drawn as a hatched crimson bar 1.2 times as tall as
//! the slowest answer.

pub mod cli;
pub mod config;
pub mod dns;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::{ConfigLoader, Settings};
pub use dns::types::{DnsList, DnsServer, Latency, ResultSet, Sample, TestSummary};
pub use dns::{IcmpPinger, Pinger, Prober};
pub use error::{Error, Result};
pub use output::{write_report, Launcher};
pub use pipeline::{Pipeline, RunOutcome};
pub use report::{render_chart, render_report, ReportRenderer};
