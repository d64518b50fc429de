use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

mod loader;
mod paths;

use super::engine::EngineOptions;
use loader::ConfigLoader;
pub use paths::ConfigPaths;

/// Settings of the terminal front-end and the engine it drives.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub exit_grace: Duration,
    pub attached_marker: String,
    pub history_file: PathBuf,
    pub history_size: usize,
    pub color: bool,
}

impl Config {
    pub fn new(paths: &ConfigPaths) -> Self {
        let engine = EngineOptions::default();
        Config {
            exit_grace: engine.exit_grace,
            attached_marker: engine.attached_marker,
            history_file: paths.history_path.clone(),
            history_size: 1000,
            color: true,
        }
    }

    /// Defaults overlaid with the config file.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::ConfigFileNotFound(path.display().to_string()));
            }
        }

        let paths = ConfigPaths::new()?;
        let mut config = Config::new(&paths);
        let loader = ConfigLoader::new();
        match explicit {
            Some(path) => loader.load_file(path, &mut config)?,
            None if paths.config_path.exists() => {
                loader.load_file(&paths.config_path, &mut config)?
            }
            None => tracing::debug!(path = %paths.config_path.display(), "no config file"),
        }
        Ok(config)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            exit_grace: self.exit_grace,
            attached_marker: self.attached_marker.clone(),
            ..EngineOptions::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    HomeDirNotFound,
    ConfigFileNotFound(String),
    InvalidValue { line: usize, key: String, value: String },
    Malformed { line: usize, text: String },
    IoError(std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HomeDirNotFound => write!(f, "Home directory not found"),
            ConfigError::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::InvalidValue { line, key, value } => {
                write!(f, "line {}: invalid value '{}' for {}", line, value, key)
            }
            ConfigError::Malformed { line, text } => {
                write!(f, "line {}: expected 'key = value', got '{}'", line, text)
            }
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
