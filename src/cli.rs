//! Command-line interface (CLI) argument parsing module.
//!
//! This module provides CLI argument parsing using `clap`.
//! Without a subcommand the tool probes the resolvers and writes the report;
//! `list` shows the resolvers that would be probed and `completions` prints
//! a shell completion script.

use crate::config::Overrides;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI argument parser using clap derive macro.
///
/// # Example
///
/// ```ignore
/// let cli = Cli::parse();
/// match cli.command {
///     Some(Commands::List) => { /* ... */ }
///     Some(Commands::Completions { shell }) => { /* ... */ }
///     None => { /* probe and write the report */ }
/// }
/// ```
#[derive(Parser, Debug)]
#[command(
    name = "dnsreport",
    version,
    about = "Measure DNS resolver latency and write an HTML report",
    long_about = "Pings a list of DNS resolvers once each, prints the round-trip times \
                  and writes a self-contained HTML report with a table and a bar chart.",
    infer_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Terminal output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for a report run.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Settings file (JSON)
    #[arg(short, long, global = true, env = "DNSREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Timeout per probe in seconds [default: 2]
    #[arg(short, long)]
    pub timeout: Option<f64>,

    /// Pause after each probe in seconds [default: 1]
    #[arg(short, long)]
    pub interval: Option<f64>,

    /// Report file [default: dns_performance.html]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not open the report when done
    #[arg(long = "no-open")]
    pub no_open: bool,

    /// Number of probes to run at once (1-8) [default: 1]
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Custom DNS servers (format: IP#Name)
    #[arg(long = "dns", global = true)]
    pub dns_servers: Vec<String>,
}

impl RunArgs {
    /// The command-line layer of the settings.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            timeout_secs: self.timeout,
            interval_secs: self.interval,
            output_path: self.output.clone(),
            open_after: self.no_open.then_some(false),
            concurrency: self.concurrency,
            dns_servers: self.dns_servers.clone(),
        }
    }
}

/// Output format for probe results on the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<name>: <ms> ms` lines (default)
    #[default]
    Text,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated)
    Tsv,
}

impl OutputFormat {
    /// Get all available output format names.
    #[must_use]
    pub fn names() -> &'static [&'static str] {
        &["text", "json", "csv", "tsv"]
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(format!(
                "Unknown format: {}. Valid options are: {:?}",
                s,
                Self::names()
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the DNS servers that would be probed
    #[command(alias = "l")]
    List,

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut impl std::io::Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

/// Parse CLI arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("tsv".parse::<OutputFormat>(), Ok(OutputFormat::Tsv));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "dnsreport",
            "--timeout",
            "0.5",
            "-o",
            "out.html",
            "--no-open",
            "-j",
            "4",
            "--dns",
            "9.9.9.9#Quad9",
        ])
        .unwrap();
        assert!(cli.command.is_none());

        let overrides = cli.run.overrides();
        assert_eq!(overrides.timeout_secs, Some(0.5));
        assert_eq!(overrides.interval_secs, None);
        assert_eq!(overrides.output_path, Some(PathBuf::from("out.html")));
        assert_eq!(overrides.open_after, Some(false));
        assert_eq!(overrides.concurrency, Some(4));
        assert_eq!(overrides.dns_servers, vec!["9.9.9.9#Quad9".to_string()]);
    }

    #[test]
    fn test_open_defaults_to_config() {
        let cli = Cli::try_parse_from(["dnsreport"]).unwrap();
        assert_eq!(cli.run.overrides().open_after, None);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["dnsreport", "list", "--dns", "1.1.1.1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.run.dns_servers, vec!["1.1.1.1".to_string()]);

        let cli = Cli::try_parse_from(["dnsreport", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_completions_output() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut out);
        assert!(String::from_utf8(out).unwrap().contains("dnsreport"));
    }
}
