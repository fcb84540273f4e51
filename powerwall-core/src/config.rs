use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{DEFAULT_EMAIL, DEFAULT_HOST, DEFAULT_PASSWORD, model::Credentials};

/// Connection settings stored on disk. Every field is optional.
///
/// Example TOML:
/// ```toml
/// host = "192.168.91.1"
/// password = "FTXMT"
/// email = "nfarina@gmail.com"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    pub host: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Fully resolved values for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub host: String,
    pub credentials: Credentials,
}

impl Config {
    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "powerwall", "powerwall-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Fields set in `self` win over those in `base`.
    pub fn or(self, base: Config) -> Config {
        Config {
            host: self.host.or(base.host),
            password: self.password.or(base.password),
            email: self.email.or(base.email),
        }
    }

    /// Fill whatever is still unset with the built-in defaults.
    pub fn into_settings(self) -> SessionSettings {
        SessionSettings {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            credentials: Credentials::new(
                self.password.unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
                self.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn defaults_match_the_reference_session() {
        let settings = Config::default().into_settings();

        assert_eq!(settings.host, "192.168.91.1");
        assert_eq!(settings.credentials, Credentials::new("FTXMT", "nfarina@gmail.com"));
    }

    #[test]
    fn save_then_load_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config { host: Some("10.0.0.5".into()), ..Config::default() };

        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "host = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn overrides_win_over_file_and_defaults() {
        let file = Config {
            host: Some("10.0.0.5".into()),
            password: Some("ABCDE".into()),
            email: None,
        };
        let overrides = Config { password: Some("VWXYZ".into()), ..Config::default() };

        let settings = overrides.or(file).into_settings();

        assert_eq!(settings.host, "10.0.0.5");
        assert_eq!(settings.credentials.password, "VWXYZ");
        assert_eq!(settings.credentials.email, "nfarina@gmail.com");
    }
}
