//! # Gateway Configuration
//!
//! Where the ERP backend lives and how sessions behave.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     BISTRO_BACKEND_URL=https://erp.example.com                          │
//! │     BISTRO_PASSWORD=...                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/bistro-pos/gateway.toml (Linux)                           │
//! │     ~/Library/Application Support/com.bistro.pos/gateway.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     http://localhost:8069, 7 days of history                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # gateway.toml
//! [backend]
//! url = "https://erp.example.com"
//! database = "restaurant"
//! username = "admin"
//! # password is never written to disk; use BISTRO_PASSWORD
//!
//! [session]
//! history_days = 7
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Credentials;

// =============================================================================
// Backend Settings
// =============================================================================

/// Connection settings for the ERP backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL (http:// or https://).
    #[serde(default = "default_url")]
    pub url: String,

    /// Backend database name.
    #[serde(default)]
    pub database: String,

    /// Login name.
    #[serde(default)]
    pub username: String,

    /// Only ever read from the environment.
    #[serde(skip)]
    pub password: Option<String>,

    /// Port used when the URL has none (plain http).
    #[serde(default = "default_port")]
    pub default_port: u16,
}

fn default_url() -> String {
    "http://localhost:8069".to_string()
}

fn default_port() -> u16 {
    8069
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_url(),
            database: String::new(),
            username: String::new(),
            password: None,
            default_port: default_port(),
        }
    }
}

impl BackendSettings {
    /// Whether the backend is reached over TLS.
    pub fn is_secure(&self) -> bool {
        self.url.starts_with("https://")
    }

    /// Port to connect to: explicit port in the URL, 443 for https,
    /// otherwise `default_port`.
    pub fn effective_port(&self) -> u16 {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let authority = rest.split('/').next().unwrap_or(rest);

        if let Some((_, port)) = authority.rsplit_once(':') {
            if let Ok(port) = port.parse() {
                return port;
            }
        }

        if self.is_secure() {
            443
        } else {
            self.default_port
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// POS session behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// How far back order history reaches (days, counted from midnight).
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

fn default_history_days() -> u32 {
    7
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            history_days: default_history_days(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendSettings,

    /// Session settings.
    #[serde(default)]
    pub session: SessionSettings,
}

impl GatewayConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (gateway.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> GatewayResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading gateway config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load gateway config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file (the password is never written).
    pub fn save(&self, config_path: Option<PathBuf>) -> GatewayResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| GatewayError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GatewayError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| GatewayError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Gateway config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GatewayResult<()> {
        let url = &self.backend.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(GatewayError::InvalidConfig(format!(
                "Backend URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.session.history_days == 0 {
            return Err(GatewayError::InvalidConfig(
                "history_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Credentials for login, if username and password are both known.
    pub fn credentials(&self) -> Option<Credentials> {
        let password = self.backend.password.clone()?;
        if self.backend.username.is_empty() {
            return None;
        }
        Some(Credentials {
            database: self.backend.database.clone(),
            username: self.backend.username.clone(),
            password,
        })
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BISTRO_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Ok(database) = std::env::var("BISTRO_DATABASE") {
            self.backend.database = database;
        }

        if let Ok(username) = std::env::var("BISTRO_USERNAME") {
            self.backend.username = username;
        }

        if let Ok(password) = std::env::var("BISTRO_PASSWORD") {
            self.backend.password = Some(password);
        }

        if let Ok(days) = std::env::var("BISTRO_HISTORY_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => self.session.history_days = d,
                Err(_) => warn!(days = %days, "Ignoring invalid BISTRO_HISTORY_DAYS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bistro", "pos")
            .map(|dirs| dirs.config_dir().join("gateway.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.backend.url, "http://localhost:8069");
        assert_eq!(config.session.history_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GatewayConfig::default();

        config.backend.url = "ftp://erp".to_string();
        assert!(config.validate().is_err());

        config.backend.url = "https://erp.example.com".to_string();
        assert!(config.validate().is_ok());

        config.session.history_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_port() {
        let mut backend = BackendSettings::default();
        assert_eq!(backend.effective_port(), 8069);

        backend.url = "https://erp.example.com/web".to_string();
        assert_eq!(backend.effective_port(), 443);

        backend.url = "http://10.0.0.5:9000".to_string();
        assert_eq!(backend.effective_port(), 9000);
    }

    #[test]
    fn test_toml_round_trip_skips_password() {
        let mut config = GatewayConfig::default();
        config.backend.username = "admin".to_string();
        config.backend.password = Some("secret".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[backend]"));
        assert!(toml_str.contains("[session]"));
        assert!(!toml_str.contains("secret"));

        let parsed: GatewayConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.username, "admin");
        assert_eq!(parsed.backend.password, None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: GatewayConfig = toml::from_str("[backend]\ndatabase = \"bistro\"\n").unwrap();
        assert_eq!(parsed.backend.database, "bistro");
        assert_eq!(parsed.backend.url, "http://localhost:8069");
        assert_eq!(parsed.session.history_days, 7);
    }

    #[test]
    fn test_credentials_need_username_and_password() {
        let mut config = GatewayConfig::default();
        assert!(config.credentials().is_none());

        config.backend.password = Some("admin".to_string());
        assert!(config.credentials().is_none());

        config.backend.username = "admin".to_string();
        let creds = config.credentials().unwrap();
        assert_eq!(creds.username, "admin");
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("bistro-gateway-{}.toml", std::process::id()));
        let mut config = GatewayConfig::default();
        config.backend.database = "restaurant".to_string();
        config.session.history_days = 3;

        config.save(Some(path.clone())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: GatewayConfig = toml::from_str(&contents).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.backend.database, "restaurant");
        assert_eq!(loaded.session.history_days, 3);
    }
}
