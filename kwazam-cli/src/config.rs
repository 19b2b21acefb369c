//! `kwazam.toml` loading.

use std::path::{Path, PathBuf};

use kwazam_core::GameOptions;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "kwazam.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Engine options applied to every loaded game.
    pub game: GameOptions,
    /// `tracing` filter used when neither `--log` nor `RUST_LOG` is set.
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            game: GameOptions::default(),
            log_filter: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given (it must exist), otherwise [`DEFAULT_CONFIG`] if
    /// present, otherwise defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::load(Path::new(DEFAULT_CONFIG)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Validation("log_filter must not be empty".into()));
        }
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| ConfigError::Validation(format!("log_filter: {}", e)))?;
        Ok(())
    }
}
