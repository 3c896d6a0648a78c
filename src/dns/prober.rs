//! Latency probing.
//!
//! [`Prober`] sends one reachability probe per target through a [`Pinger`]
//! and folds every failure into an unreachable [`Sample`].

#![allow(clippy::missing_errors_doc)]

use crate::dns::types::{DnsServer, ResultSet, Sample};
use crate::error::Result;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for each probe in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Default pause after each sequential probe in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// Upper bound on parallel probes.
pub const MAX_CONCURRENCY: usize = 8;

/// A single echo-style reachability check.
///
/// Implementations return the measured round-trip time. They do not need to
/// enforce the timeout themselves; [`Prober`] bounds every call.
pub trait Pinger {
    fn ping(
        &self,
        server: &DnsServer,
        timeout: Duration,
    ) -> impl Future<Output = Result<Duration>> + Send;
}

/// Sends probes and assembles the ordered result set.
///
/// # Example
///
/// ```ignore
/// let prober = Prober::new(IcmpPinger::new())
///     .with_timeout(Duration::from_secs(2))
///     .with_interval(Duration::from_secs(1));
/// let results = prober.probe(&servers).await;
/// ```
pub struct Prober<P> {
    pinger: P,
    timeout: Duration,
    interval: Duration,
    concurrency: usize,
}

impl<P: Pinger> Prober<P> {
    /// Create a sequential prober with the default timeout and interval.
    pub fn new(pinger: P) -> Self {
        Self {
            pinger,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            concurrency: 1,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Number of probes in flight at once, clamped to `1..=MAX_CONCURRENCY`.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Probe a single server.
    ///
    /// Never fails: errors and timeouts become an unreachable sample.
    pub async fn probe_one(&self, server: &DnsServer) -> Sample {
        match timeout(self.timeout, self.pinger.ping(server, self.timeout)).await {
            Ok(Ok(rtt)) => {
                tracing::debug!("{} ({}) answered in {rtt:?}", server.name, server.ip);
                Sample::reachable(server.clone(), rtt)
            }
            Ok(Err(e)) => {
                tracing::debug!("Probe error for {} ({}): {e}", server.name, server.ip);
                Sample::unreachable(server.clone(), e.to_string())
            }
            Err(_) => {
                tracing::debug!("Probe for {} ({}) timed out", server.name, server.ip);
                Sample::unreachable(server.clone(), "timeout")
            }
        }
    }

    /// Probe every server and return one sample per server, in input order.
    ///
    /// Sequential probing sleeps `interval` after every probe. With a
    /// concurrency above one the interval is not applied and results are
    /// still ordered by input position, not completion.
    pub async fn probe(&self, servers: &[DnsServer]) -> ResultSet {
        let workers = self.concurrency.min(servers.len()).max(1);
        tracing::info!(
            "Probing {} servers (timeout {:?}, {} at a time)",
            servers.len(),
            self.timeout,
            workers
        );

        if workers == 1 {
            let mut samples = Vec::with_capacity(servers.len());
            for server in servers {
                samples.push(self.probe_one(server).await);
                tokio::time::sleep(self.interval).await;
            }
            return ResultSet::new(samples);
        }

        let samples = stream::iter(servers)
            .map(|server| self.probe_one(server))
            .buffered(workers)
            .collect::<Vec<_>>()
            .await;
        ResultSet::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::types::Latency;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::time::Instant;

    /// Answers after a configured delay; unknown addresses fail.
    struct FakePinger {
        delays: HashMap<String, Duration>,
    }

    impl FakePinger {
        fn new(entries: &[(&str, u64)]) -> Self {
            Self {
                delays: entries
                    .iter()
                    .map(|(ip, ms)| ((*ip).to_string(), Duration::from_millis(*ms)))
                    .collect(),
            }
        }
    }

    impl Pinger for FakePinger {
        fn ping(
            &self,
            server: &DnsServer,
            _timeout: Duration,
        ) -> impl Future<Output = Result<Duration>> + Send {
            let delay = self.delays.get(&server.ip).copied();
            async move {
                match delay {
                    Some(delay) => {
                        tokio::time::sleep(delay).await;
                        Ok(delay)
                    }
                    None => Err(Error::network("destination host unreachable")),
                }
            }
        }
    }

    fn servers(entries: &[(&str, &str)]) -> Vec<DnsServer> {
        entries
            .iter()
            .map(|(name, ip)| DnsServer::new(*name, *ip))
            .collect()
    }

    #[tokio::test]
    async fn test_one_sample_per_target_in_order() {
        let pinger = FakePinger::new(&[("10.0.0.1", 5), ("10.0.0.3", 1)]);
        let prober = Prober::new(pinger).with_interval(Duration::ZERO);
        let targets = servers(&[("A", "10.0.0.1"), ("B", "10.0.0.2"), ("C", "10.0.0.3")]);

        let results = prober.probe(&targets).await;

        let labels: Vec<_> = results.iter().map(Sample::label).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert!(results.samples()[0].latency.is_reachable());
        assert_eq!(results.samples()[1].latency, Latency::Unreachable);
        assert!(results.samples()[2].latency.is_reachable());
    }

    #[tokio::test]
    async fn test_silent_target_is_unreachable() {
        let pinger = FakePinger::new(&[("10.0.0.1", 10_000)]);
        let prober = Prober::new(pinger)
            .with_timeout(Duration::from_millis(50))
            .with_interval(Duration::ZERO);

        let start = Instant::now();
        let results = prober.probe(&servers(&[("Slow", "10.0.0.1")])).await;

        assert!(start.elapsed() < Duration::from_secs(5));
        let sample = &results.samples()[0];
        assert_eq!(sample.latency, Latency::Unreachable);
        assert_eq!(sample.error.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn test_concurrent_probe_keeps_target_order() {
        let pinger = FakePinger::new(&[("10.0.0.1", 80), ("10.0.0.2", 1), ("10.0.0.3", 30)]);
        let prober = Prober::new(pinger).with_concurrency(3);
        let targets = servers(&[("Slow", "10.0.0.1"), ("Fast", "10.0.0.2"), ("Mid", "10.0.0.3")]);

        let results = prober.probe(&targets).await;

        let labels: Vec<_> = results.iter().map(Sample::label).collect();
        assert_eq!(labels, vec!["Slow", "Fast", "Mid"]);
        assert!(results.iter().all(|s| s.latency.is_reachable()));
    }

    #[tokio::test]
    async fn test_concurrent_probes_time_out_individually() {
        let pinger = FakePinger::new(&[("10.0.0.1", 5), ("10.0.0.2", 60_000), ("10.0.0.3", 10)]);
        let prober = Prober::new(pinger)
            .with_timeout(Duration::from_millis(200))
            .with_concurrency(3);
        let targets = servers(&[("A", "10.0.0.1"), ("Silent", "10.0.0.2"), ("C", "10.0.0.3")]);

        let start = Instant::now();
        let results = prober.probe(&targets).await;

        assert!(start.elapsed() < Duration::from_secs(5));
        let samples = results.samples();
        assert!(samples[0].latency.is_reachable());
        assert_eq!(samples[1].latency, Latency::Unreachable);
        assert_eq!(samples[1].error.as_deref(), Some("timeout"));
        assert!(samples[2].latency.is_reachable());
    }

    #[tokio::test]
    async fn test_sequential_probe_waits_interval() {
        let pinger = FakePinger::new(&[("10.0.0.1", 0), ("10.0.0.2", 0)]);
        let prober = Prober::new(pinger).with_interval(Duration::from_millis(30));
        let targets = servers(&[("A", "10.0.0.1"), ("B", "10.0.0.2")]);

        let start = Instant::now();
        let results = prober.probe(&targets).await;

        assert_eq!(results.len(), 2);
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_empty_target_list() {
        let prober = Prober::new(FakePinger::new(&[])).with_interval(Duration::ZERO);
        let results = prober.probe(&[]).await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_concurrency_is_clamped() {
        let prober = Prober::new(FakePinger::new(&[])).with_concurrency(64);
        assert_eq!(prober.concurrency, MAX_CONCURRENCY);
        let prober = Prober::new(FakePinger::new(&[])).with_concurrency(0);
        assert_eq!(prober.concurrency, 1);
    }
}
