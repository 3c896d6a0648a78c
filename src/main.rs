//! dnsreport - DNS latency report generator
//!
//! Binary entry point for the dnsreport CLI application.

#![warn(clippy::all, warnings)]
#![warn(clippy::pedantic, clippy::nursery)]

use dnsreport::cli::{Cli, Commands, OutputFormat};
use dnsreport::config::{ConfigLoader, Settings};
use dnsreport::dns::IcmpPinger;
use dnsreport::error::Result;
use dnsreport::output::launcher_for_current_platform;
use dnsreport::pipeline::Pipeline;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up logging based on verbosity level.
///
/// Logs go to stderr so stdout only carries results.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `quiet` - Enable error-level only logging
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .init();
}

/// Resolve settings from the config file and command line.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let file = ConfigLoader::load(cli.run.config.as_deref())?;
    Settings::resolve(file, cli.run.overrides())
}

/// Probe, print and write the report.
async fn run_report(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;

    if cli.format == OutputFormat::Text {
        println!(
            "Probing {} DNS servers (timeout {:.1}s)...\n",
            settings.servers.len(),
            settings.timeout.as_secs_f64()
        );
    }

    let pinger = IcmpPinger::new();
    if !pinger.is_available() {
        tracing::warn!("No ICMP socket could be opened; every server will show as unreachable");
    }

    let launcher = launcher_for_current_platform();
    let mut stdout = std::io::stdout().lock();
    Pipeline::new(&settings, pinger, &launcher)
        .run(&mut stdout, cli.format)
        .await?;
    Ok(())
}

/// List the servers a run would probe.
fn run_list(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let servers = &settings.servers.servers;

    println!("DNS servers ({} total):\n", servers.len());
    println!("{:<4} {:<20} {:<20}", "#", "Name", "IP");
    println!("{}", "-".repeat(50));

    for (idx, s) in servers.iter().enumerate() {
        println!("{:<4} {:<20} {:<20}", idx + 1, s.name, s.ip);
    }

    Ok(())
}

/// Main entry point for the dnsreport CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporting: {e}");
    }

    let cli = dnsreport::cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    tracing::debug!("dnsreport starting...");

    let result = match &cli.command {
        Some(Commands::List) => run_list(&cli),
        Some(Commands::Completions { shell }) => {
            dnsreport::cli::write_completions(*shell, &mut std::io::stdout());
            Ok(())
        }
        None => run_report(&cli).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
