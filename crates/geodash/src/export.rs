//! CSV export of the visible rows.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};
use crate::project::Project;
use crate::table::{format_coordinate, COLUMNS};

/// Prefix of exported file names.
pub const EXPORT_FILE_PREFIX: &str = "vasundharaa-geo-projects";

/// File name for an export made on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.csv", date.format("%Y-%m-%d"))
}

/// File name for an export made today (UTC).
#[must_use]
pub fn default_export_file_name() -> String {
    export_file_name(chrono::Utc::now().date_naive())
}

/// Write `rows` as CSV with the table header.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_csv<W: Write>(writer: W, rows: &[&Project]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMNS.iter().map(|c| c.header))?;
    for project in rows {
        csv.write_record([
            project.id.to_string(),
            project.project_name.clone(),
            format_coordinate(project.latitude),
            format_coordinate(project.longitude),
            project.status.to_string(),
            project.display_date(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Export `rows` to `target`.
///
/// A directory target gets the dated default file name inside it. A target
/// ending in a path separator names a directory and is created if missing.
/// Returns the path written.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn export_to(target: impl AsRef<Path>, rows: &[&Project]) -> Result<PathBuf> {
    let target = target.as_ref();
    let path = if target.is_dir() || names_directory(target) {
        std::fs::create_dir_all(target).map_err(|source| Error::DirectoryCreate {
            path: target.to_path_buf(),
            source,
        })?;
        target.join(default_export_file_name())
    } else {
        target.to_path_buf()
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(&path)?;
    write_csv(file, rows)?;
    info!(path = %path.display(), rows = rows.len(), "exported projects");
    Ok(path)
}

fn names_directory(path: &Path) -> bool {
    let text = path.as_os_str().to_string_lossy();
    text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR)
}
