use super::ConfigError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub history_path: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

        Ok(ConfigPaths {
            config_path: config_dir.join("tether").join("config"),
            history_path: home.join(".tether_history"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_paths() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let paths = ConfigPaths::new().expect("paths");

        assert_eq!(paths.history_path, home.join(".tether_history"));
        assert!(paths.config_path.ends_with("tether/config"));
    }
}
