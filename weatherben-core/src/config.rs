use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{history::STORAGE_KEY, provider::openweather::DEFAULT_BASE_URL};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHERBEN_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// api_base_url = "https://api.openweathermap.org/data/2.5"
/// history_file = "/home/me/.local/share/weatherben/storedHistory.json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub history_file: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where search history is persisted.
    pub fn history_file_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.history_file {
            return Ok(path.clone());
        }

        Ok(project_dirs()?.data_dir().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Read the override from [`API_KEY_ENV`], ignoring blank values.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV).ok().filter(|v| !v.trim().is_empty())
    }

    /// API key to use: `env_value` wins over the stored key.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        env_value.or_else(|| self.api_key.clone()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weatherben configure` or set {API_KEY_ENV}."
            )
        })
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weatherben", "weatherben")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_errors_when_no_key() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("weatherben configure"));
    }

    #[test]
    fn stored_key_is_used() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.resolve_api_key(None).unwrap(), "FILE_KEY");
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.resolve_api_key(Some("ENV_KEY".into())).unwrap(), "ENV_KEY");
    }

    #[test]
    fn base_url_defaults_to_openweather() {
        assert_eq!(Config::default().api_base_url(), DEFAULT_BASE_URL);

        let cfg = Config {
            api_base_url: Some("http://127.0.0.1:8080".into()),
            ..Default::default()
        };
        assert_eq!(cfg.api_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn history_path_override_wins() {
        let cfg = Config {
            history_file: Some(PathBuf::from("/tmp/h.json")),
            ..Default::default()
        };
        assert_eq!(cfg.history_file_path().unwrap(), PathBuf::from("/tmp/h.json"));
    }

    #[test]
    fn parses_toml() {
        let cfg = Config::from_toml(
            r#"
            api_key = "abc"
            history_file = "/var/lib/wb/storedHistory.json"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.api_base_url, None);
        assert_eq!(
            cfg.history_file,
            Some(PathBuf::from("/var/lib/wb/storedHistory.json"))
        );
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }
}
