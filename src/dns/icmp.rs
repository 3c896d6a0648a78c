//! ICMP echo probing.
//!
//! This module provides the production [`Pinger`] which measures the round
//! trip of a single ICMP echo request. Raw ICMP sockets usually need root or
//! `CAP_NET_RAW` (Linux also allows unprivileged DGRAM sockets when
//! `net.ipv4.ping_group_range` permits it).

#![allow(clippy::missing_errors_doc)]

use crate::dns::prober::Pinger;
use crate::dns::types::DnsServer;
use crate::error::{Error, Result};
use std::future::Future;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, ICMP};

/// Default packet size for ping in bytes.
const DEFAULT_PACKET_SIZE: usize = 32;

/// ICMP echo pinger.
///
/// One client per address family is opened up front. A family whose socket
/// cannot be opened is remembered as unavailable and every probe on it fails
/// with the error reported when the socket was opened.
///
/// # Example
///
/// ```ignore
/// let pinger = IcmpPinger::new();
/// let rtt = pinger.ping(&DnsServer::new("Cloudflare", "1.1.1.1"), timeout).await?;
/// ```
pub struct IcmpPinger {
    v4: std::result::Result<Client, String>,
    v6: std::result::Result<Client, String>,
    sequence: AtomicU16,
}

impl IcmpPinger {
    /// Open the IPv4 and IPv6 ICMP clients.
    #[must_use]
    pub fn new() -> Self {
        Self {
            v4: open_client(ICMP::V4),
            v6: open_client(ICMP::V6),
            sequence: AtomicU16::new(0),
        }
    }

    /// Whether at least one address family can send probes.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.v4.is_ok() || self.v6.is_ok()
    }

    fn client_for(&self, ip: IpAddr) -> Result<&Client> {
        let client = if ip.is_ipv4() { &self.v4 } else { &self.v6 };
        client.as_ref().map_err(|e| Error::network(e.clone()))
    }

    async fn echo(&self, server: &DnsServer, timeout: Duration) -> Result<Duration> {
        let addrs = resolve(&server.ip).await?;
        let ip = pick_address(&addrs, |ip| self.client_for(ip).is_ok())
            .ok_or_else(|| Error::network(format!("{} has no addresses", server.ip)))?;
        let client = self.client_for(ip)?;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        let mut pinger = client.pinger(ip, PingIdentifier(rand_id())).await;
        pinger.timeout(timeout);

        let payload = [0u8; DEFAULT_PACKET_SIZE];
        let (_packet, rtt) = pinger
            .ping(PingSequence(seq), &payload)
            .await
            .map_err(|e| Error::network(e.to_string()))?;
        Ok(rtt)
    }
}

impl Default for IcmpPinger {
    fn default() -> Self {
        Self::new()
    }
}

impl Pinger for IcmpPinger {
    fn ping(
        &self,
        server: &DnsServer,
        timeout: Duration,
    ) -> impl Future<Output = Result<Duration>> + Send {
        self.echo(server, timeout)
    }
}

fn open_client(kind: ICMP) -> std::result::Result<Client, String> {
    let family = if matches!(kind, ICMP::V4) { "IPv4" } else { "IPv6" };
    let config = Config::builder().kind(kind).build();
    Client::new(&config).map_err(|e| {
        tracing::warn!("Cannot open {family} ICMP socket: {e}");
        format!("{family} ICMP socket unavailable: {e}")
    })
}

/// Turn an address or hostname into its IP addresses, in resolver order.
async fn resolve(address: &str) -> Result<Vec<IpAddr>> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let addrs: Vec<IpAddr> = tokio::net::lookup_host((address, 0))
        .await
        .map_err(|e| Error::network(format!("cannot resolve {address}: {e}")))?
        .map(|addr| addr.ip())
        .collect();
    if addrs.is_empty() {
        return Err(Error::network(format!("{address} has no addresses")));
    }
    Ok(addrs)
}

/// First address whose family has an open socket, else the first address.
fn pick_address(addrs: &[IpAddr], usable: impl Fn(IpAddr) -> bool) -> Option<IpAddr> {
    addrs
        .iter()
        .copied()
        .find(|ip| usable(*ip))
        .or_else(|| addrs.first().copied())
}

/// Generate a random ping identifier.
fn rand_id() -> u16 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    (nanos % 65536) as u16
}
