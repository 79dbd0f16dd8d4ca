//! Configuration for the keypipe forwarder
//!
//! Supports TOML serialization for persistent config storage. CLI flags
//! override file values; a missing file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Forwarder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gadget device path the session writes to
    #[serde(default = "default_device")]
    pub device: PathBuf,
    /// Pause between typed characters in milliseconds
    #[serde(default = "default_type_delay_ms")]
    pub type_delay_ms: u64,
}

fn default_device() -> PathBuf {
    PathBuf::from("/dev/hidg0")
}

fn default_type_delay_ms() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: default_device(),
            type_delay_ms: default_type_delay_ms(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keypipe")
            .join("keypipe.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &PathBuf) -> anyhow::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("/dev/hidg0"));
        assert!(toml_str.contains("type_delay_ms = 20"));
    }

    #[test]
    fn test_roundtrip() {
        let config = Config {
            device: PathBuf::from("/dev/hidg1"),
            type_delay_ms: 5,
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.device, config.device);
        assert_eq!(parsed.type_delay_ms, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("device = \"/dev/hidg1\"").unwrap();
        assert_eq!(config.device, PathBuf::from("/dev/hidg1"));
        assert_eq!(config.type_delay_ms, 20);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("keypipe-config-{}", std::process::id()));
        let path = dir.join("keypipe.toml");

        let config = Config {
            device: PathBuf::from("/dev/hidg2"),
            type_delay_ms: 0,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.device, PathBuf::from("/dev/hidg2"));
        assert_eq!(loaded.type_delay_ms, 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = PathBuf::from("/nonexistent-keypipe-dir/keypipe.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.device, PathBuf::from("/dev/hidg0"));
    }
}
