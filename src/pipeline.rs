//! The end-to-end run: probe, list, chart, report, write, open.

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::dns::{Pinger, Prober, ResultSet};
use crate::error::Result;
use crate::output::{write_report, write_results, Launcher};
use crate::report::{render_chart, ReportRenderer};
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub results: ResultSet,
    pub output_path: PathBuf,
    /// Whether the report was handed to a viewer successfully
    pub opened: bool,
}

/// One report run.
///
/// # Example
///
/// ```ignore
/// let launcher = launcher_for_current_platform();
/// let outcome = Pipeline::new(&settings, IcmpPinger::new(), &launcher)
///     .run(&mut std::io::stdout(), OutputFormat::Text)
///     .await?;
/// ```
pub struct Pipeline<'a, P, L> {
    settings: &'a Settings,
    prober: Prober<P>,
    launcher: &'a L,
}

impl<'a, P: Pinger, L: Launcher> Pipeline<'a, P, L> {
    pub fn new(settings: &'a Settings, pinger: P, launcher: &'a L) -> Self {
        let prober = Prober::new(pinger)
            .with_timeout(settings.timeout)
            .with_interval(settings.interval)
            .with_concurrency(settings.concurrency);
        Self {
            settings,
            prober,
            launcher,
        }
    }

    /// Run every stage.
    ///
    /// Unreachable targets and launch failures do not fail the run. Only the
    /// text format gets status lines on `out`; the other formats keep `out`
    /// machine-readable and report progress through the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be rendered, the report cannot
    /// be written, or `out` cannot be written to.
    pub async fn run(&self, out: &mut impl Write, format: OutputFormat) -> Result<RunOutcome> {
        let results = self.prober.probe(&self.settings.servers.servers).await;
        let summary = results.summary();
        tracing::info!(
            "Probing done: {}/{} reachable",
            summary.reachable,
            summary.total
        );

        write_results(out, &results, format)?;

        let chart = render_chart(&results)?;
        let document = ReportRenderer::new()
            .with_timestamp(Utc::now())
            .render(&results, &chart)?;

        let path = &self.settings.output_path;
        write_report(&document, path)?;
        if format == OutputFormat::Text {
            writeln!(out, "Report written to {}", path.display())?;
        } else {
            tracing::info!("Report written to {}", path.display());
        }

        let opened = self.settings.open_after && self.open(out, format).await?;

        Ok(RunOutcome {
            results,
            output_path: path.clone(),
            opened,
        })
    }

    async fn open(&self, out: &mut impl Write, format: OutputFormat) -> Result<bool> {
        let path = &self.settings.output_path;
        match self.launcher.launch(path).await {
            Ok(()) => {
                tracing::info!("Opened {} with {}", path.display(), self.launcher.name());
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Could not open report: {e}");
                if format == OutputFormat::Text {
                    writeln!(out, "Could not open the report automatically: {e}")?;
                }
                Ok(false)
            }
        }
    }
}
