//! Configuration management for BBS.
//!
//! Loads configuration from ${BBS_HOME}/config.toml with sensible defaults.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::seed::Dataset;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for BBS configuration.
    //!
    //! BBS_HOME resolution order:
    //! 1. BBS_HOME environment variable (if set)
    //! 2. ~/.config/bbs (default)

    use std::path::PathBuf;

    /// Returns the BBS home directory.
    pub fn bbs_home() -> PathBuf {
        if let Ok(home) = std::env::var("BBS_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".bbs"),
            |h| h.join(".config").join("bbs"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        bbs_home().join("config.toml")
    }
}

/// Simulated request latencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub login_ms: u64,
    pub register_ms: u64,
    pub create_thread_ms: u64,
    pub search_ms: u64,
    /// Reply, edit and delete.
    pub post_action_ms: u64,
    /// Upper bound for a single request (0 disables).
    pub timeout_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            login_ms: 1000,
            register_ms: 1500,
            create_thread_ms: 2000,
            search_ms: 300,
            post_action_ms: 0,
            timeout_ms: 10_000,
        }
    }
}

impl LatencyConfig {
    /// All delays zero, no timeout.
    pub fn instant() -> Self {
        Self {
            login_ms: 0,
            register_ms: 0,
            create_thread_ms: 0,
            search_ms: 0,
            post_action_ms: 0,
            timeout_ms: 0,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub home_thread_limit: usize,
    pub popular_thread_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            home_thread_limit: 5,
            popular_thread_limit: 5,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset file; the embedded seed is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    pub log_level: String,

    /// Log file (stderr when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,

    pub latency: LatencyConfig,

    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
            latency: LatencyConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "warn";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Loads the configured dataset, or the embedded seed.
    pub fn load_dataset(&self) -> Result<Dataset> {
        match self.data_path.as_deref() {
            Some(path) => Dataset::load_from(Path::new(path)),
            None => Dataset::seed(),
        }
    }

    /// Writes the commented template to `path`, creating parent
    /// directories. Never replaces an existing file.
    pub fn init(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                anyhow::bail!("Config file already exists at {}", path.display());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", path.display()));
            }
        };
        file.write_all(default_config_template().as_bytes())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Renders `Config::default()` into the commented template.
    ///
    /// Template values are overwritten; keys only the defaults know about are
    /// appended to their table.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item, Table};

        fn fill(target: &mut Table, defaults: &Table) {
            for (key, item) in defaults {
                match (item, target.get_mut(key)) {
                    (Item::Table(section), Some(Item::Table(existing))) => fill(existing, section),
                    (Item::Value(_) | Item::Table(_), _) => target[key] = item.clone(),
                    _ => {}
                }
            }
        }

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        fill(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.latency.login_ms, 1000);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "log_level = \"debug\"\n[latency]\nsearch_ms = 5\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.latency.search_ms, 5);
        assert_eq!(config.latency.register_ms, 1500);
        assert_eq!(config.display.home_thread_limit, 5);
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "latency = 3").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# data_path ="));
        assert!(contents.contains("login_ms = 1000"));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "log_level = \"debug\"\n").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "log_level = \"debug\"\n"
        );
    }

    #[test]
    fn test_template_matches_rust_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_generate_keeps_comments() {
        let generated = Config::generate().unwrap();
        assert!(generated.contains("# Simulated request latency"));
        let parsed: Config = toml::from_str(&generated).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_timeout_zero_disables() {
        assert_eq!(LatencyConfig::instant().timeout(), None);
        assert_eq!(
            LatencyConfig::default().timeout(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_load_dataset_from_configured_path() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("data.json");
        fs::write(&data_path, r#"{"users": [], "categories": [], "threads": [], "posts": []}"#)
            .unwrap();

        let config = Config {
            data_path: Some(data_path.to_string_lossy().to_string()),
            ..Config::default()
        };
        let dataset = config.load_dataset().unwrap();
        assert!(dataset.threads.is_empty());

        assert_eq!(Config::default().load_dataset().unwrap().threads.len(), 5);
    }
}
