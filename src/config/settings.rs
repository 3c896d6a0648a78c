//! Run settings.
//!
//! Settings come from three layers, highest priority first: command-line
//! overrides, the JSON configuration file, built-in defaults.

use crate::config::loader::{check_address, ConfigLoader};
use crate::dns::prober::{DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS, MAX_CONCURRENCY};
use crate::dns::types::{DnsList, DnsServer};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default report file name.
pub const DEFAULT_OUTPUT_PATH: &str = "dns_performance.html";

/// Built-in resolver list, probed when nothing else is configured.
const DEFAULT_SERVERS: &[(&str, &str)] = &[
    ("Google", "8.8.8.8"),
    ("Cloudflare", "1.1.1.1"),
    ("OpenDNS", "208.67.222.222"),
    ("Quad9", "9.9.9.9"),
    ("Level3", "209.244.0.3"),
    ("Comodo Secure", "8.26.56.26"),
    ("AdGuard DNS", "94.140.14.14"),
];

/// The built-in resolver list.
#[must_use]
pub fn default_servers() -> DnsList {
    DnsList::from_servers(
        DEFAULT_SERVERS
            .iter()
            .map(|(name, ip)| DnsServer::new(*name, *ip))
            .collect(),
    )
}

/// Contents of a JSON configuration file. Every field is optional.
///
/// ```json
/// { "timeout_secs": 2.0, "open_after": false,
///   "list": [{ "name": "Google", "IP": "8.8.8.8" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub timeout_secs: Option<f64>,
    pub interval_secs: Option<f64>,
    pub output_path: Option<PathBuf>,
    pub open_after: Option<bool>,
    pub concurrency: Option<usize>,
    #[serde(rename = "list")]
    pub servers: Option<Vec<DnsServer>>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub timeout_secs: Option<f64>,
    pub interval_secs: Option<f64>,
    pub output_path: Option<PathBuf>,
    pub open_after: Option<bool>,
    pub concurrency: Option<usize>,
    /// Custom servers in `IP#Name` form; replaces the configured list.
    pub dns_servers: Vec<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub servers: DnsList,
    pub timeout: Duration,
    pub interval: Duration,
    pub output_path: PathBuf,
    pub open_after: bool,
    pub concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            open_after: true,
            concurrency: 1,
        }
    }
}

impl Settings {
    /// Merge the file and command-line layers over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for negative or non-finite durations, a zero
    /// or too large concurrency, and duplicate server labels. A malformed
    /// address is `Error::Parse`, whether it came from `--dns` or the file.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let defaults = Self::default();

        let timeout = match overrides.timeout_secs.or(file.timeout_secs) {
            Some(secs) => secs_to_duration("timeout", secs)?,
            None => defaults.timeout,
        };
        let interval = match overrides.interval_secs.or(file.interval_secs) {
            Some(secs) => secs_to_duration("interval", secs)?,
            None => defaults.interval,
        };
        if timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }

        let concurrency = overrides
            .concurrency
            .or(file.concurrency)
            .unwrap_or(defaults.concurrency);
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(Error::config(format!(
                "concurrency must be between 1 and {MAX_CONCURRENCY}, got {concurrency}"
            )));
        }

        let servers = if !overrides.dns_servers.is_empty() {
            ConfigLoader::from_args(overrides.dns_servers)?
        } else if let Some(servers) = file.servers {
            for server in &servers {
                check_address(&server.ip)?;
            }
            DnsList::from_servers(servers)
        } else {
            defaults.servers
        };
        if let Some(label) = servers.duplicate_label() {
            return Err(Error::config(format!("duplicate server label: {label}")));
        }

        Ok(Self {
            servers,
            timeout,
            interval,
            output_path: overrides
                .output_path
                .or(file.output_path)
                .unwrap_or(defaults.output_path),
            open_after: overrides
                .open_after
                .or(file.open_after)
                .unwrap_or(defaults.open_after),
            concurrency,
        })
    }
}

fn secs_to_duration(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::config(format!("{field} must be a non-negative number, got {secs}")))
}
