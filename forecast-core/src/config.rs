use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::model::Coordinate;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_LANG: &str = "fr";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fixed position stored in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationConfig> for Coordinate {
    fn from(cfg: LocationConfig) -> Self {
        Coordinate::new(cfg.latitude, cfg.longitude)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// lang = "fr"
/// timeout_secs = 10
/// location_consent = true
///
/// [location]
/// latitude = 48.85
/// longitude = 2.35
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Language for condition descriptions and day headings.
    pub lang: String,

    pub timeout_secs: u64,

    /// Remembered answer to "may we look up your location?".
    pub location_consent: bool,

    pub location: Option<LocationConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            lang: DEFAULT_LANG.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            location_consent: false,
            location: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "local-forecast", "forecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    /// `env_value` wins over the stored key; blank values count as absent.
    pub fn api_key_with_override(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn require_api_key(&self) -> Result<String> {
        self.require_api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    pub fn require_api_key_with_override(&self, env_value: Option<String>) -> Result<String> {
        self.api_key_with_override(env_value).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `forecast configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn fixed_location(&self) -> Option<Coordinate> {
        self.location.map(Coordinate::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_french_with_ten_second_timeout() {
        let cfg = Config::default();
        assert_eq!(cfg.lang, "fr");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(!cfg.location_consent);
        assert!(cfg.fixed_location().is_none());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("OPEN_KEY".into()),
            lang: "en".into(),
            timeout_secs: 3,
            location_consent: true,
            location: Some(LocationConfig { latitude: 48.85, longitude: 2.35 }),
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.fixed_location(), Some(Coordinate::new(48.85, 2.35)));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"K\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("K"));
        assert_eq!(cfg.lang, DEFAULT_LANG);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "lang = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cfg = Config { timeout_secs: 0, ..Config::default() };
        assert_eq!(cfg.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config { api_key: Some("  ".into()), ..Config::default() };
        let err = cfg.require_api_key_with_override(None).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));

        assert!(cfg.require_api_key_with_override(Some(String::new())).is_err());
    }

    #[test]
    fn environment_key_overrides_stored_key() {
        let cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };

        assert_eq!(cfg.api_key_with_override(Some("ENV_KEY".into())).as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.api_key_with_override(Some(" ".into())).as_deref(), Some("FILE_KEY"));
        assert_eq!(cfg.api_key_with_override(None).as_deref(), Some("FILE_KEY"));
    }
}
