//! Output module.
//!
//! Everything that leaves the process: the terminal listing, the report
//! file, and handing that file to a viewer.

pub mod launcher;
pub mod terminal;
pub mod writer;

pub use launcher::{
    launcher_for_current_platform, launcher_for_os, Launcher, PlatformLauncher, SystemLauncher,
};
pub use terminal::write_results;
pub use writer::write_report;
