use std::{fs, path::Path, time::Duration};

use super::{Config, ConfigError};

/// Reads `key = value` lines. `#` starts a comment line.
pub struct ConfigLoader;

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_file(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path)?;
        self.load_str(&content, config)
    }

    pub fn load_str(&self, content: &str, config: &mut Config) -> Result<(), ConfigError> {
        for (index, line) in content.lines().enumerate() {
            self.process_line(index + 1, line, config)?;
        }
        Ok(())
    }

    fn process_line(
        &self,
        number: usize,
        line: &str,
        config: &mut Config,
    ) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Malformed {
            line: number,
            text: line.to_string(),
        })?;
        let key = key.trim();
        let mut value = value.trim();

        // Remove quotes if present
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }

        let invalid = || ConfigError::InvalidValue {
            line: number,
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "exit_grace_ms" => {
                let ms: u64 = value.parse().map_err(|_| invalid())?;
                config.exit_grace = Duration::from_millis(ms);
            }
            "attached_marker" => config.attached_marker = value.to_string(),
            "history_file" => {
                if value.is_empty() {
                    return Err(invalid());
                }
                config.history_file = value.into();
            }
            "history_size" => config.history_size = value.parse().map_err(|_| invalid())?,
            "color" => config.color = parse_bool(value).ok_or_else(invalid)?,
            _ => tracing::warn!(line = number, key, "unknown config key ignored"),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigPaths;
    use std::path::PathBuf;

    fn setup_test_config() -> Config {
        Config::new(&ConfigPaths {
            config_path: PathBuf::from("/tmp/tether-config"),
            history_path: PathBuf::from("/tmp/tether-history"),
        })
    }

    #[test]
    fn test_load_all_keys() {
        let content = r#"
            # tether settings
            exit_grace_ms = 250
            attached_marker = "[run]"
            history_file = /var/tmp/hist
            history_size = 42
            color = off
        "#;
        let mut config = setup_test_config();
        ConfigLoader::new()
            .load_str(content, &mut config)
            .expect("load failed");

        assert_eq!(config.exit_grace, Duration::from_millis(250));
        assert_eq!(config.attached_marker, "[run]");
        assert_eq!(config.history_file, PathBuf::from("/var/tmp/hist"));
        assert_eq!(config.history_size, 42);
        assert!(!config.color);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut config = setup_test_config();
        let before = config.clone();
        ConfigLoader::new()
            .load_str("prompt_colour = purple\n", &mut config)
            .expect("load failed");
        assert_eq!(config, before);
    }

    #[test]
    fn test_invalid_values_report_line() {
        let mut config = setup_test_config();
        let result = ConfigLoader::new().load_str("\ncolor = maybe\n", &mut config);
        match result {
            Err(ConfigError::InvalidValue { line, key, value }) => {
                assert_eq!(line, 2);
                assert_eq!(key, "color");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let result = ConfigLoader::new().load_str("exit_grace_ms = -3", &mut config);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_line_without_equals_is_malformed() {
        let mut config = setup_test_config();
        let result = ConfigLoader::new().load_str("color", &mut config);
        assert!(matches!(result, Err(ConfigError::Malformed { line: 1, .. })));
    }
}
