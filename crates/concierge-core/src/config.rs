use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConciergeError, Result};

/// Top-level configuration for the Concierge application.
///
/// Loaded from `~/.concierge/config.toml` by default. Each section
/// corresponds to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciergeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl ConciergeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConciergeConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConciergeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.concierge/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Webhook server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the webhook listener.
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8450,
        }
    }
}

/// Messaging-gateway client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the messaging gateway REST API.
    pub base_url: String,
    /// Bearer token used for outbound gateway calls.
    pub api_token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9090".to_string(),
            api_token: String::new(),
            timeout_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConciergeConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 8450);
        assert_eq!(config.gateway.timeout_secs, 15);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ConciergeConfig::default();
        config.general.log_level = "debug".to_string();
        config.server.port = 9000;
        config.gateway.base_url = "https://gateway.example.com".to_string();
        config.save(&path).unwrap();

        let loaded = ConciergeConfig::load(&path).unwrap();
        assert_eq!(loaded.general.log_level, "debug");
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.gateway.base_url, "https://gateway.example.com");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = ConciergeConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConciergeConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.server.port, 8450);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[server]\nport = 8500\n").unwrap();

        let config = ConciergeConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8500);
        // Untouched sections fall back to defaults.
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.gateway.timeout_secs, 15);
    }

    #[test]
    fn test_malformed_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not [ valid toml").unwrap();
        assert!(ConciergeConfig::load(&path).is_err());
    }
}
