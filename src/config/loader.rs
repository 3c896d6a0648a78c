//! Configuration loader.
//!
//! This module provides functionality to load settings and DNS server lists
//! from JSON files, command-line arguments, or default locations.

use crate::config::settings::FileConfig;
use crate::dns::types::{DnsList, DnsServer};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration file name in the current directory.
const LOCAL_CONFIG_FILE_NAME: &str = "dnsreport.json";

/// Configuration loader.
///
/// Provides various methods to load settings and server lists
/// from different sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = ConfigLoader::load_from_file("dnsreport.json")?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        let config: FileConfig = serde_json::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load settings from the default locations.
    ///
    /// Searches in the following order:
    /// 1. `$CONFIG_DIR/dnsreport/config.json`
    /// 2. `dnsreport.json` in current directory
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    ///
    /// # Errors
    ///
    /// Returns an error if a default file exists but cannot be parsed.
    pub fn load_default() -> Result<FileConfig> {
        for path in Self::default_paths() {
            if path.is_file() {
                return Self::load_from_file(path);
            }
        }
        Ok(FileConfig::default())
    }

    /// Load an explicit file if given, else the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing or any file is invalid.
    pub fn load(path: Option<&Path>) -> Result<FileConfig> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_default(),
        }
    }

    /// Get the config directory path.
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dnsreport")
    }

    /// Candidate configuration files, in search order.
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        vec![
            Self::config_dir().join(CONFIG_FILE_NAME),
            PathBuf::from(LOCAL_CONFIG_FILE_NAME),
        ]
    }

    /// Create a custom DNS list from command-line arguments.
    ///
    /// # Arguments
    ///
    /// * `dns_servers` - Vector of strings in format "IP#Name"; the name
    ///   defaults to the address when omitted
    ///
    /// # Errors
    ///
    /// Returns an error if an entry has an empty address, or an address that
    /// is neither an IP literal nor a plausible hostname.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let args = vec!["8.8.8.8#Google".to_string(), "1.1.1.1#Cloudflare".to_string()];
    /// let list = ConfigLoader::from_args(args)?;
    /// ```
    pub fn from_args(dns_servers: Vec<String>) -> Result<DnsList> {
        let mut servers = Vec::new();
        for s in dns_servers {
            let (ip, name) = match s.split_once('#') {
                Some((ip, name)) => (ip.trim(), name.trim()),
                None => (s.trim(), ""),
            };

            check_address(ip)?;

            let name = if name.is_empty() { ip } else { name };
            servers.push(DnsServer::new(name, ip));
        }
        Ok(DnsList { servers })
    }
}

/// Accept an IP literal or a plausible hostname.
pub(crate) fn check_address(address: &str) -> Result<()> {
    let plausible = address.parse::<std::net::IpAddr>().is_ok()
        || (!address.is_empty()
            && address
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'));
    if plausible {
        Ok(())
    } else {
        Err(Error::Parse(format!("Invalid address: {address:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_from_args() {
        let args = vec![
            "8.8.8.8#Google".to_string(),
            "1.1.1.1#Cloudflare".to_string(),
        ];
        let list = ConfigLoader::from_args(args).unwrap();
        assert_eq!(list.servers.len(), 2);
        assert_eq!(list.servers[0].name, "Google");
        assert_eq!(list.servers[1].name, "Cloudflare");
    }

    #[test]
    fn test_config_from_args_without_name() {
        let list = ConfigLoader::from_args(vec!["dns.quad9.net".to_string()]).unwrap();
        assert_eq!(list.servers[0], DnsServer::new("dns.quad9.net", "dns.quad9.net"));
    }

    #[test]
    fn test_config_from_args_invalid_address() {
        let args = vec!["invalid ip#Test".to_string()];
        assert!(ConfigLoader::from_args(args).is_err());
        assert!(ConfigLoader::from_args(vec!["#Empty".to_string()]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"timeout_secs": 3, "open_after": false,
                "list": [{{"name": "Quad9", "IP": "9.9.9.9"}}]}}"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.timeout_secs, Some(3.0));
        assert_eq!(config.open_after, Some(false));
        assert_eq!(config.servers, Some(vec![DnsServer::new("Quad9", "9.9.9.9")]));
        assert!(config.interval_secs.is_none());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout": 3}}"#).unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(file.path()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            ConfigLoader::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }
}
