//! Where the dashboard loads its projects from.
//!
//! A [`ProjectSource`] performs exactly one load per call: no retries, no
//! cancellation. Failures bubble up unchanged so the caller can show them in
//! the error panel.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::dump::read_dump;
use crate::error::{Error, Result};
use crate::generator::{GeneratorSettings, ProjectGenerator};
use crate::project::Project;

/// A provider of project records.
#[async_trait::async_trait]
pub trait ProjectSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Load the full project list.
    ///
    /// # Errors
    ///
    /// Returns an error if the projects cannot be loaded.
    async fn fetch(&self) -> Result<Vec<Project>>;
}

/// Loads projects from the HTTP endpoint with a single GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a source for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ProjectSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> Result<Vec<Project>> {
        debug!(url = %self.url, "fetching projects");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch_failed(Some(status.as_u16())));
        }
        let projects: Vec<Project> = response.json().await?;
        info!(count = projects.len(), url = %self.url, "fetched projects");
        Ok(projects)
    }
}

/// Loads projects from a JSON dump on disk.
#[derive(Debug, Clone)]
pub struct DumpSource {
    path: PathBuf,
}

impl DumpSource {
    /// Create a source for the given dump file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ProjectSource for DumpSource {
    fn name(&self) -> &'static str {
        "dump"
    }

    async fn fetch(&self) -> Result<Vec<Project>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_dump(path))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

/// Generates projects in-process, without any server.
#[derive(Debug, Clone)]
pub struct GeneratorSource {
    settings: GeneratorSettings,
    count: usize,
    seed: Option<u64>,
}

impl GeneratorSource {
    /// Create a source that generates `count` records per fetch.
    #[must_use]
    pub fn new(settings: GeneratorSettings, count: usize, seed: Option<u64>) -> Self {
        Self {
            settings,
            count,
            seed,
        }
    }
}

#[async_trait::async_trait]
impl ProjectSource for GeneratorSource {
    fn name(&self) -> &'static str {
        "generator"
    }

    async fn fetch(&self) -> Result<Vec<Project>> {
        let settings = self.settings.clone();
        let mut generator = match self.seed {
            Some(seed) => ProjectGenerator::with_seed(settings, seed),
            None => ProjectGenerator::new(settings),
        };
        Ok(generator.generate(self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::write_dump;

    #[tokio::test]
    async fn test_generator_source_count() {
        let source = GeneratorSource::new(GeneratorSettings::default(), 120, Some(9));
        let projects = source.fetch().await.unwrap();
        assert_eq!(projects.len(), 120);
        assert_eq!(source.name(), "generator");
    }

    #[tokio::test]
    async fn test_seeded_generator_source_repeats() {
        let source = GeneratorSource::new(GeneratorSettings::default(), 20, Some(9));
        let first = source.fetch().await.unwrap();
        let second = source.fetch().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_dump_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let projects = GeneratorSource::new(GeneratorSettings::default(), 15, Some(1))
            .fetch()
            .await
            .unwrap();
        write_dump(&path, &projects).unwrap();

        let loaded = DumpSource::new(&path).fetch().await.unwrap();
        assert_eq!(loaded, projects);
    }

    #[tokio::test]
    async fn test_dump_source_missing_file() {
        let err = DumpSource::new("/nonexistent/db.json")
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DumpRead { .. }));
    }

    #[tokio::test]
    async fn test_http_source_unreachable() {
        // Port 9 (discard) is closed on test machines; the request fails fast.
        let source = HttpSource::new("http://127.0.0.1:9/api/projects", Duration::from_secs(2))
            .unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/api/projects");
        assert!(source.fetch().await.is_err());
    }
}
