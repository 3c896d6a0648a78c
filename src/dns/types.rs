//! DNS types and data structures.
//!
//! This module provides the core types used for resolver targets,
//! probe outcomes and the ordered result set of a run.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// DNS server to probe.
///
/// Represents a single resolver with its display label and address.
/// The address is usually an IP literal but a hostname is accepted too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsServer {
    /// Server label (e.g., "Cloudflare", "Google")
    pub name: String,
    /// Address of the DNS server
    #[serde(rename = "IP")]
    pub ip: String,
}

impl DnsServer {
    /// Create a new DNS server.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let server = DnsServer::new("Cloudflare", "1.1.1.1");
    /// ```
    pub fn new(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
        }
    }
}

/// DNS server list container.
///
/// Represents an ordered collection of targets, typically loaded from
/// a JSON configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsList {
    /// List of DNS servers
    #[serde(rename = "list")]
    pub servers: Vec<DnsServer>,
}

impl DnsList {
    /// Create a new empty DNS list.
    #[must_use]
    pub fn new() -> Self {
        Self { servers: vec![] }
    }

    /// Create a DNS list from a vector of servers.
    #[must_use]
    pub fn from_servers(servers: Vec<DnsServer>) -> Self {
        Self { servers }
    }

    /// Get the number of servers in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Find the first label that appears more than once.
    #[must_use]
    pub fn duplicate_label(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.servers
            .iter()
            .map(|s| s.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

impl Default for DnsList {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "latency_ms", rename_all = "lowercase")]
pub enum Latency {
    /// Round-trip time in milliseconds
    Reachable(f64),
    /// No answer within the timeout, or the probe could not be sent
    Unreachable,
}

impl Latency {
    /// Build a reachable latency from a measured round-trip time.
    #[must_use]
    pub fn from_duration(rtt: Duration) -> Self {
        Self::Reachable(rtt.as_secs_f64() * 1000.0)
    }

    /// Latency in milliseconds, if reachable.
    #[must_use]
    pub fn as_millis(&self) -> Option<f64> {
        match self {
            Self::Reachable(ms) => Some(*ms),
            Self::Unreachable => None,
        }
    }

    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }

    /// Ordering where every reachable latency ranks before `Unreachable`.
    #[must_use]
    pub fn sort_key(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Reachable(a), Self::Reachable(b)) => a.total_cmp(b),
            (Self::Reachable(_), Self::Unreachable) => Ordering::Less,
            (Self::Unreachable, Self::Reachable(_)) => Ordering::Greater,
            (Self::Unreachable, Self::Unreachable) => Ordering::Equal,
        }
    }
}

/// Formats as milliseconds with two decimals, or `inf` when unreachable.
impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable(ms) => write!(f, "{ms:.2}"),
            Self::Unreachable => write!(f, "inf"),
        }
    }
}

/// Result of probing one DNS server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// The DNS server that was probed
    pub server: DnsServer,
    /// Probe outcome
    #[serde(flatten)]
    pub latency: Latency,
    /// Why the probe failed, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Sample {
    /// Create a successful sample.
    #[must_use]
    pub fn reachable(server: DnsServer, rtt: Duration) -> Self {
        Self {
            server,
            latency: Latency::from_duration(rtt),
            error: None,
        }
    }

    /// Create an unreachable sample.
    pub fn unreachable(server: DnsServer, error: impl Into<String>) -> Self {
        Self {
            server,
            latency: Latency::Unreachable,
            error: Some(error.into()),
        }
    }

    /// Label of the probed server.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.server.name
    }

    /// Terminal line, `"<label>: <ms> ms"`.
    #[must_use]
    pub fn terminal_line(&self) -> String {
        format!("{}: {} ms", self.server.name, self.latency)
    }
}

/// Samples of a run, in the order the targets were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    samples: Vec<Sample>,
}

impl ResultSet {
    /// Wrap samples that are already in target order.
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest reachable latency in milliseconds.
    #[must_use]
    pub fn max_reachable(&self) -> Option<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.latency.as_millis())
            .reduce(f64::max)
    }

    /// Sample with the lowest latency, if any target answered.
    #[must_use]
    pub fn fastest(&self) -> Option<&Sample> {
        self.samples
            .iter()
            .filter(|s| s.latency.is_reachable())
            .min_by(|a, b| a.latency.sort_key(&b.latency))
    }

    /// Calculate summary statistics.
    #[must_use]
    pub fn summary(&self) -> TestSummary {
        let mut summary = TestSummary::new();
        for sample in &self.samples {
            summary.add_sample(sample);
        }
        summary
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Overall run summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSummary {
    /// Total number of servers probed
    pub total: usize,
    /// Number of servers that answered
    pub reachable: usize,
    /// Number of servers that did not answer
    pub unreachable: usize,
    /// Average latency in milliseconds
    pub avg_latency: Option<f64>,
    /// Minimum latency in milliseconds
    pub min_latency: Option<f64>,
    /// Maximum latency in milliseconds
    pub max_latency: Option<f64>,
}

impl TestSummary {
    /// Create a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample to the summary.
    pub fn add_sample(&mut self, sample: &Sample) {
        self.total += 1;
        match sample.latency {
            Latency::Reachable(latency) => {
                self.reachable += 1;
                self.avg_latency = Some(
                    self.avg_latency
                        .map(|a| {
                            a.mul_add((self.reachable - 1) as f64, latency)
                                / self.reachable as f64
                        })
                        .unwrap_or(latency),
                );
                self.min_latency =
                    Some(self.min_latency.map(|m| m.min(latency)).unwrap_or(latency));
                self.max_latency =
                    Some(self.max_latency.map(|m| m.max(latency)).unwrap_or(latency));
            }
            Latency::Unreachable => self.unreachable += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_latency_formats_two_decimals() {
        let latency = Latency::from_duration(Duration::from_secs_f64(0.0234));
        assert_eq!(latency.to_string(), "23.40");
        assert_eq!(Latency::Unreachable.to_string(), "inf");
    }

    #[test]
    fn test_terminal_line() {
        let a = Sample::reachable(DnsServer::new("A", "10.0.0.1"), ms(15));
        let b = Sample::unreachable(DnsServer::new("B", "10.0.0.2"), "timeout");
        assert_eq!(a.terminal_line(), "A: 15.00 ms");
        assert_eq!(b.terminal_line(), "B: inf ms");
    }

    #[test]
    fn test_unreachable_sorts_last() {
        let mut values = vec![
            Latency::Unreachable,
            Latency::Reachable(40.0),
            Latency::Reachable(3.5),
        ];
        values.sort_by(Latency::sort_key);
        assert_eq!(
            values,
            vec![
                Latency::Reachable(3.5),
                Latency::Reachable(40.0),
                Latency::Unreachable
            ]
        );
    }

    #[test]
    fn test_duplicate_label() {
        let list = DnsList::from_servers(vec![
            DnsServer::new("Google", "8.8.8.8"),
            DnsServer::new("Quad9", "9.9.9.9"),
            DnsServer::new("Google", "8.8.4.4"),
        ]);
        assert_eq!(list.duplicate_label(), Some("Google"));
        assert_eq!(DnsList::new().duplicate_label(), None);
    }

    #[test]
    fn test_summary() {
        let server = DnsServer::new("Test", "8.8.8.8");
        let results = ResultSet::new(vec![
            Sample::reachable(server.clone(), ms(10)),
            Sample::reachable(server.clone(), ms(20)),
            Sample::unreachable(server, "timeout"),
        ]);
        let summary = results.summary();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.reachable, 2);
        assert_eq!(summary.unreachable, 1);
        assert_eq!(summary.avg_latency, Some(15.0));
        assert_eq!(summary.min_latency, Some(10.0));
        assert_eq!(summary.max_latency, Some(20.0));
        assert_eq!(results.max_reachable(), Some(20.0));
    }

    #[test]
    fn test_fastest_skips_unreachable() {
        let results = ResultSet::new(vec![
            Sample::unreachable(DnsServer::new("Down", "10.0.0.9"), "timeout"),
            Sample::reachable(DnsServer::new("Slow", "10.0.0.1"), ms(90)),
            Sample::reachable(DnsServer::new("Fast", "10.0.0.2"), ms(7)),
        ]);
        assert_eq!(results.fastest().map(Sample::label), Some("Fast"));
        assert!(ResultSet::default().fastest().is_none());
    }

    #[test]
    fn test_sample_json_shape() {
        let sample = Sample::reachable(DnsServer::new("Google", "8.8.8.8"), ms(12));
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["status"], "reachable");
        assert_eq!(json["latency_ms"], 12.0);
        assert_eq!(json["server"]["IP"], "8.8.8.8");

        let down = Sample::unreachable(DnsServer::new("X", "10.0.0.1"), "timeout");
        let json = serde_json::to_value(&down).unwrap();
        assert_eq!(json["status"], "unreachable");
        assert_eq!(json["error"], "timeout");
    }
}
