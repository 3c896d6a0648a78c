//! Error types module.
//!
//! This module defines the error types used throughout the dnsreport application.
//! It uses `thiserror` for structured error handling and provides
//! a custom `Result` type alias for convenience.
//!
//! Probe failures never show up here: they are folded into
//! [`Latency::Unreachable`](crate::dns::Latency) samples. Everything in this
//! enum is a pipeline-stage failure that ends the run.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for dnsreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for dnsreport.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (reading configuration, terminal output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (configuration files, JSON output)
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network-related error (socket setup, address resolution)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error (invalid settings, duplicate labels)
    #[error("Config error: {0}")]
    Config(String),

    /// Parse error (invalid input format, malformed data)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Chart or document rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// The report could not be written to disk
    #[error("failed to write report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No way to open files on this platform
    #[error("opening files is not supported on this platform ({0})")]
    UnsupportedPlatform(String),

    /// The viewer could not be launched
    #[error("Launch error: {0}")]
    Launch(String),
}

impl Error {
    /// Create a new network error with a message.
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new parse error with a message.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new render error with a message.
    #[must_use]
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a new launch error with a message.
    #[must_use]
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Whether this error should stop the run.
    ///
    /// Launch problems are reported but the report file is already the
    /// deliverable at that point.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Launch(_) | Self::UnsupportedPlatform(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<minijinja::Error> for Error {
    fn from(e: minijinja::Error) -> Self {
        Self::Render(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_errors_are_not_fatal() {
        assert!(!Error::launch("xdg-open missing").is_fatal());
        assert!(!Error::UnsupportedPlatform("plan9".into()).is_fatal());
        assert!(Error::render("encoder failed").is_fatal());
        assert!(Error::config("bad timeout").is_fatal());
    }

    #[test]
    fn test_write_error_names_path() {
        let err = Error::Write {
            path: PathBuf::from("/ro/report.html"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/ro/report.html"));
    }

    #[test]
    fn test_template_errors_are_render_errors() {
        let err: Error =
            minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end").into();
        assert!(matches!(err, Error::Render(_)));
        assert!(err.is_fatal());
    }
}
