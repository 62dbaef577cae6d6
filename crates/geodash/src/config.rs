//! Configuration management for geodash.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::BoundingBox;
use crate::generator::{
    default_window_start, GeneratorProfile, GeneratorSettings, DEFAULT_PROJECT_COUNT,
};
use crate::server::{ServerState, PROJECTS_PATH};
use crate::source::{GeneratorSource, HttpSource};
use crate::table::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "geodash";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "GEODASH_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GEODASH_`, sections split by `__`)
/// 2. TOML config file at `~/.config/geodash/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mock data generation.
    pub generator: GeneratorConfig,
    /// HTTP endpoint.
    pub server: ServerConfig,
    /// Client loading from the endpoint.
    pub client: ClientConfig,
    /// Dashboard behaviour.
    pub dashboard: DashboardConfig,
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of records per request.
    pub count: usize,
    /// Fixed RNG seed; unset means a fresh seed per request.
    pub seed: Option<u64>,
    /// Naming vocabulary.
    pub profile: GeneratorProfile,
    /// Coordinate box.
    pub bounds: BoundingBox,
    /// Earliest last-updated timestamp.
    pub window_start: DateTime<Utc>,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Serve this dump instead of generating records.
    pub dump_path: Option<PathBuf>,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Project endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Filter debounce in milliseconds.
    pub debounce_ms: u64,
    /// Initial table page size.
    pub page_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PROJECT_COUNT,
            seed: None,
            profile: GeneratorProfile::Full,
            bounds: BoundingBox::INDIA,
            window_start: default_window_start(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            dump_path: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("http://127.0.0.1:3000{PROJECTS_PATH}"),
            timeout_secs: 30,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl GeneratorConfig {
    /// Generator settings for this configuration.
    #[must_use]
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            bounds: self.bounds,
            window_start: self.window_start,
            window_end: None,
            profile: self.profile,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let bounds = self.generator.bounds;
        if !bounds.is_valid() {
            return Err(Error::config_validation(format!(
                "generator.bounds must have south < north and west < east (got [[{}, {}], [{}, {}]])",
                bounds.south, bounds.west, bounds.north, bounds.east
            )));
        }

        if self.generator.count == 0 {
            return Err(Error::config_validation(
                "generator.count must be greater than 0",
            ));
        }

        if self.generator.window_start > Utc::now() {
            return Err(Error::config_validation(
                "generator.window_start must not be in the future",
            ));
        }

        if self.dashboard.debounce_ms == 0 {
            return Err(Error::config_validation(
                "dashboard.debounce_ms must be greater than 0",
            ));
        }

        if !PAGE_SIZE_OPTIONS.contains(&self.dashboard.page_size) {
            return Err(Error::config_validation(format!(
                "dashboard.page_size must be one of {PAGE_SIZE_OPTIONS:?} (got {})",
                self.dashboard.page_size
            )));
        }

        if self.client.timeout_secs == 0 {
            return Err(Error::config_validation(
                "client.timeout_secs must be greater than 0",
            ));
        }

        if reqwest::Url::parse(&self.client.endpoint).is_err() {
            return Err(Error::config_validation(format!(
                "client.endpoint is not a valid URL: {}",
                self.client.endpoint
            )));
        }

        Ok(())
    }

    /// Get the filter debounce as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.dashboard.debounce_ms)
    }

    /// Get the client request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Build the server state described by this configuration.
    #[must_use]
    pub fn server_state(&self) -> ServerState {
        ServerState::new(self.generator.settings(), self.generator.count)
            .with_seed(self.generator.seed)
            .with_dump(self.server.dump_path.clone())
    }

    /// Build an HTTP source for the configured client endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn endpoint_source(&self) -> Result<HttpSource> {
        HttpSource::new(self.client.endpoint.clone(), self.request_timeout())
    }

    /// Build an in-process source from the generator section.
    #[must_use]
    pub fn generator_source(&self) -> GeneratorSource {
        GeneratorSource::new(
            self.generator.settings(),
            self.generator.count,
            self.generator.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ProjectSource;
    use figment::Jail;

    #[test]
    fn test_endpoint_source_uses_client_endpoint() {
        let source = Config::default().endpoint_source().unwrap();
        assert_eq!(source.name(), "http");
        assert_eq!(source.url(), "http://127.0.0.1:3000/api/projects");
    }

    #[test]
    fn test_generator_source_from_config() {
        let source = Config::default().generator_source();
        assert_eq!(source.name(), "generator");
    }

    #[test]
    fn test_endpoint_source_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("GEODASH_CLIENT__ENDPOINT", "http://10.0.0.5:8080/api/projects");
            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            let source = config.endpoint_source().map_err(|e| e.to_string())?;
            assert_eq!(source.url(), "http://10.0.0.5:8080/api/projects");
            Ok(())
        });
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.generator.count, 5000);
        assert!(config.generator.seed.is_none());
        assert_eq!(config.generator.bounds, BoundingBox::INDIA);
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.client.endpoint, "http://127.0.0.1:3000/api/projects");
        assert_eq!(config.dashboard.debounce_ms, 300);
        assert_eq!(config.dashboard.page_size, 25);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_bounds() {
        let mut config = Config::default();
        config.generator.bounds = BoundingBox::new(37.0, 68.0, 6.0, 98.0);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("generator.bounds"));
    }

    #[test]
    fn test_validate_zero_count() {
        let mut config = Config::default();
        config.generator.count = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("generator.count"));
    }

    #[test]
    fn test_validate_future_window() {
        let mut config = Config::default();
        config.generator.window_start = Utc::now() + chrono::Duration::days(30);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("window_start"));
    }

    #[test]
    fn test_validate_zero_debounce() {
        let mut config = Config::default();
        config.dashboard.debounce_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("debounce_ms"));
    }

    #[test]
    fn test_validate_page_size() {
        let mut config = Config::default();
        config.dashboard.page_size = 40;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page_size"));

        config.dashboard.page_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = Config::default();
        config.client.endpoint = "not a url".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("client.endpoint"));
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_generator_settings() {
        let mut config = Config::default();
        config.generator.profile = GeneratorProfile::Compact;
        let settings = config.generator.settings();
        assert_eq!(settings.profile, GeneratorProfile::Compact);
        assert_eq!(settings.bounds, BoundingBox::INDIA);
        assert!(settings.window_end.is_none());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("geodash"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "geodash.toml",
                r#"
                [generator]
                count = 250
                seed = 42
                profile = "compact"

                [dashboard]
                page_size = 50
                "#,
            )?;
            jail.set_env("GEODASH_SERVER__BIND_ADDR", "0.0.0.0:8080");
            jail.set_env("GEODASH_DASHBOARD__DEBOUNCE_MS", "150");

            let config = Config::load_from(Some(PathBuf::from("geodash.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.generator.count, 250);
            assert_eq!(config.generator.seed, Some(42));
            assert_eq!(config.generator.profile, GeneratorProfile::Compact);
            assert_eq!(config.dashboard.page_size, 50);
            assert_eq!(config.dashboard.debounce_ms, 150);
            assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        Jail::expect_with(|jail| {
            jail.create_file("geodash.toml", "[dashboard]\npage_size = 7\n")?;
            let result = Config::load_from(Some(PathBuf::from("geodash.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_server_state_from_config() {
        let mut config = Config::default();
        config.generator.count = 3;
        let state = config.server_state();
        assert!(format!("{state:?}").contains("count: 3"));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("bind_addr"));
        assert!(json.contains("debounce_ms"));
    }

    #[test]
    fn test_dashboard_config_deserialize() {
        let json = r#"{"page_size": 100}"#;
        let dashboard: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.page_size, 100);
        assert_eq!(dashboard.debounce_ms, 300);
    }
}
