use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "REDEEM_TUI_API_URL";

/// Lower bound for the event poll interval, zero would spin
const MIN_TICK_RATE_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the scoring backend, `/samples` and `/predict` are appended
    pub api_base_url: String,
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Upper bound for response bodies
    pub max_response_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            tick_rate_ms: 100,
            max_response_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".redeem-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the saved config, falling back to defaults, then apply env overrides
    pub fn load() -> Config {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_at(&path),
            None => Config::default(),
        };
        config.apply_env_override(env::var(API_URL_ENV).ok());
        config
    }

    /// Read `path`, writing the defaults there only when no file exists yet
    ///
    /// A file that exists but does not parse is left untouched.
    fn load_at(path: &Path) -> Config {
        if !path.exists() {
            let config = Config::default();
            if let Err(e) = config.save_to(path) {
                tracing::warn!("could not write default config: {}", e);
            }
            return config;
        }
        Self::load_from(path).unwrap_or_default()
    }

    fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_env_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    /// Event poll interval, never below the minimum
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(MIN_TICK_RATE_MS))
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "http://scoring.local/api".to_string(),
            tick_rate_ms: 250,
            max_response_bytes: 1024,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), Some(config));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url": "http://other/api"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "http://other/api");
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_malformed_or_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), None);

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load_from(&path), None);
    }

    #[test]
    fn test_defaults_written_only_when_file_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert_eq!(Config::load_at(&path), Config::default());
        assert_eq!(Config::load_from(&path), Some(Config::default()));
    }

    #[test]
    fn test_malformed_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let user = r#"{ "api_base_url": "http://prod/api", }"#;
        fs::write(&path, user).unwrap();

        assert_eq!(Config::load_at(&path), Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), user);
    }

    #[test]
    fn test_tick_rate_is_clamped() {
        let mut config = Config::default();
        assert_eq!(config.tick_rate(), Duration::from_millis(100));

        config.tick_rate_ms = 0;
        assert_eq!(config.tick_rate(), Duration::from_millis(MIN_TICK_RATE_MS));
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_override(Some("  ".to_string()));
        assert_eq!(config.api_base_url, Config::default().api_base_url);

        config.apply_env_override(Some("http://10.0.0.5:9000/api".to_string()));
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000/api");
    }
}
