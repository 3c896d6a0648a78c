//! Report file writing.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write the document to `path`.
///
/// The document goes to a temporary file next to `path` first and is then
/// renamed into place, so an interrupted run never leaves half a report.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns `Error::Write` naming `path` if any step fails.
pub fn write_report(document: &str, path: &Path) -> Result<()> {
    let wrap = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let tmp_path = temp_path(path);
    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(document.as_bytes())?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(wrap(e));
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(wrap(e));
    }

    tracing::debug!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("report.html");
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
