//! Opening the report in the user's default viewer.
//!
//! The platform is picked once at startup with [`launcher_for_current_platform`];
//! the rest of the program only sees the [`Launcher`] trait. Openers run on
//! `tokio::process`, so a slow `xdg-open` does not stall the runtime.

use crate::error::{Error, Result};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Something that can hand a file to a viewer.
pub trait Launcher {
    /// Open `path`. Failures are never fatal for a run.
    ///
    /// # Errors
    ///
    /// Returns `Error::Launch` or `Error::UnsupportedPlatform`.
    fn launch(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;

    /// Short name for log messages.
    fn name(&self) -> &str;
}

/// Launches a desktop opener command such as `xdg-open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemLauncher {
    program: String,
    args: Vec<String>,
}

impl SystemLauncher {
    /// Opener running `program args... <path>`.
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
        }
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, path: &Path) -> impl Future<Output = Result<()>> + Send {
        tracing::debug!("Opening {} with {}", path.display(), self.program);
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let program = self.program.clone();

        async move {
            let status = cmd
                .status()
                .await
                .map_err(|e| Error::launch(format!("failed to run {program}: {e}")))?;

            if status.success() {
                Ok(())
            } else {
                Err(Error::launch(format!("{program} exited with status {status}")))
            }
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Placeholder for platforms without a known opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLauncher {
    os: String,
}

impl Launcher for UnsupportedLauncher {
    fn launch(&self, _path: &Path) -> impl Future<Output = Result<()>> + Send {
        let err = Error::UnsupportedPlatform(self.os.clone());
        async move { Err(err) }
    }

    fn name(&self) -> &str {
        "unsupported"
    }
}

/// The opener chosen for an operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformLauncher {
    System(SystemLauncher),
    Unsupported(UnsupportedLauncher),
}

impl Launcher for PlatformLauncher {
    fn launch(&self, path: &Path) -> impl Future<Output = Result<()>> + Send {
        async move {
            match self {
                Self::System(launcher) => launcher.launch(path).await,
                Self::Unsupported(launcher) => launcher.launch(path).await,
            }
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::System(launcher) => launcher.name(),
            Self::Unsupported(launcher) => launcher.name(),
        }
    }
}

/// Pick the opener for an operating system name as reported by
/// `std::env::consts::OS`.
#[must_use]
pub fn launcher_for_os(os: &str) -> PlatformLauncher {
    match os {
        "macos" => PlatformLauncher::System(SystemLauncher::new("open", &[])),
        "windows" => PlatformLauncher::System(SystemLauncher::new("cmd", &["/C", "start", ""])),
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
            PlatformLauncher::System(SystemLauncher::new("xdg-open", &[]))
        }
        other => PlatformLauncher::Unsupported(UnsupportedLauncher {
            os: other.to_string(),
        }),
    }
}

/// The opener for the platform this binary runs on.
#[must_use]
pub fn launcher_for_current_platform() -> PlatformLauncher {
    launcher_for_os(std::env::consts::OS)
}
