//! Static JSON dump used for local development.
//!
//! The dump uses the json-server layout, `{"projects": [...]}`, so the same
//! file can back a stock mock server. Reading also accepts a bare array, which
//! is what the live endpoint returns.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::project::Project;

/// Default dump file name.
pub const DUMP_FILE_NAME: &str = "db.json";

#[derive(Serialize)]
struct DumpRef<'a> {
    projects: &'a [Project],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpFile {
    Collection { projects: Vec<Project> },
    Bare(Vec<Project>),
}

/// Serialize projects into the dump layout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_dump_string(projects: &[Project]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&DumpRef { projects })?)
}

/// Parse projects from either the dump layout or a bare array.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON in either layout.
pub fn from_dump_str(raw: &str) -> Result<Vec<Project>> {
    let parsed: DumpFile = serde_json::from_str(raw)?;
    Ok(match parsed {
        DumpFile::Collection { projects } | DumpFile::Bare(projects) => projects,
    })
}

/// Write projects to a dump file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_dump(path: impl AsRef<Path>, projects: &[Project]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let body = to_dump_string(projects)?;
    fs::write(path, body).map_err(|source| Error::DumpWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} projects to {}", projects.len(), path.display());
    Ok(())
}

/// Read projects from a dump file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_dump(path: impl AsRef<Path>) -> Result<Vec<Project>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| Error::DumpRead {
        path: path.to_path_buf(),
        source,
    })?;
    let projects = from_dump_str(&raw)?;
    debug!("Read {} projects from {}", projects.len(), path.display());
    Ok(projects)
}
