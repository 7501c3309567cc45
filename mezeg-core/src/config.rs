use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Environment variable consulted before the config file.
pub const API_KEY_ENV: &str = "MEZEG_WEATHER_API_KEY";

/// Built-in key for local development. WeatherAPI.com rejects it, so real
/// lookups need a key from the environment or from `mezeg configure`.
pub const DEV_FALLBACK_KEY: &str = "demo";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com API key.
    pub api_key: Option<String>,
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

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
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

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Resolve the WeatherAPI key: environment first, then the config file,
    /// then the built-in development key. A missing key is diagnosed but
    /// never fatal; lookups made with the fallback fail at the provider.
    pub fn resolve_api_key(&self) -> String {
        let env_key = std::env::var(API_KEY_ENV).ok();
        self.resolve_api_key_from(env_key.as_deref())
    }

    fn resolve_api_key_from(&self, env_key: Option<&str>) -> String {
        if let Some(key) = env_key.map(str::trim).filter(|k| !k.is_empty()) {
            return key.to_string();
        }

        if let Some(key) =
            self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
        {
            return key.to_string();
        }

        tracing::warn!(
            "no WeatherAPI key configured; using the built-in development key. \
             Set {API_KEY_ENV} or run `mezeg configure`."
        );
        DEV_FALLBACK_KEY.to_string()
    }
}

/// Platform directories for this application; config and history both hang
/// off the same project identifier.
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("il", "mezeg", "mezeg")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_dev_key() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_api_key_from(None), DEV_FALLBACK_KEY);
    }

    #[test]
    fn config_file_key_wins_over_fallback() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());
        assert_eq!(cfg.resolve_api_key_from(None), "FILE_KEY");
    }

    #[test]
    fn environment_wins_over_config_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());
        assert_eq!(cfg.resolve_api_key_from(Some("ENV_KEY")), "ENV_KEY");
    }

    #[test]
    fn blank_values_do_not_count_as_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert_eq!(cfg.resolve_api_key_from(Some("  ")), DEV_FALLBACK_KEY);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("SOME_KEY".into());

        let serialized = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("parse");
        assert_eq!(parsed.api_key.as_deref(), Some("SOME_KEY"));
    }
}
