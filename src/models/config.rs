//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::source::{SourceConfig, default_sources};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetching behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// External KML converter
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Advisory centres
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Look up a source by identifier.
    pub fn source(&self, id: &str) -> Result<&SourceConfig> {
        self.sources
            .iter()
            .find(|source| source.id == id)
            .ok_or_else(|| AppError::unknown_source(id))
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        if self.converter.timeout_secs == 0 {
            return Err(AppError::validation("converter.timeout_secs must be > 0"));
        }
        if self.converter.program.as_os_str().is_empty() {
            return Err(AppError::validation("converter.program is empty"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate source id '{}'",
                    source.id
                )));
            }
            if source.fetch_limit == 0 {
                return Err(AppError::validation(format!(
                    "sources.{}.fetch_limit must be > 0",
                    source.id
                )));
            }
            source
                .base_url()
                .map_err(|e| AppError::validation(e.to_string()))?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            paths: PathsConfig::default(),
            converter: ConverterConfig::default(),
            sources: default_sources(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between advisory page requests in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Maximum concurrent advisory page requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: 0,
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory receiving advisory files and converted output
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
        }
    }
}

/// External converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Converter executable, called with the advisory file as its last argument
    #[serde(default = "defaults::converter_program")]
    pub program: PathBuf,

    /// Arguments placed before the advisory file
    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds before a conversion is abandoned
    #[serde(default = "defaults::converter_timeout")]
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: defaults::converter_program(),
            args: Vec::new(),
            timeout_secs: defaults::converter_timeout(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; fetch-vaa/0.9)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn output_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vaac")
    }
    pub fn converter_program() -> PathBuf {
        PathBuf::from("/usr/bin/metno-vaa-kml")
    }
    pub fn converter_timeout() -> u64 {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.fetcher.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_sources() {
        let mut config = Config::default();
        let duplicate = config.sources[0].clone();
        config.sources.push(duplicate);
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn validate_rejects_zero_fetch_limit() {
        let mut config = Config::default();
        config.sources[1].fetch_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn source_lookup() {
        let config = Config::default();
        assert_eq!(config.source("london").unwrap().fetch_limit, 10);
        assert_eq!(config.source("test").unwrap().fetch_limit, 1);
        assert!(matches!(
            config.source("buenos-aires"),
            Err(AppError::UnknownSource { .. })
        ));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetcher]
            timeout_secs = 5

            [paths]
            output_dir = "/tmp/vaac"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.fetcher.max_concurrent, 4);
        assert_eq!(config.paths.output_dir, PathBuf::from("/tmp/vaac"));
        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.converter.timeout_secs, 20);
        assert!(config.converter.args.is_empty());
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/fetch-vaa.toml");
        assert_eq!(config.sources.len(), default_sources().len());
    }
}
