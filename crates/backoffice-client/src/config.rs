//! # Console Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BACKOFFICE_API_URL=https://backoffice.example.am/api               │
//! │     BACKOFFICE_REGISTER_ID=7                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/backoffice-console/console.toml (Linux)                  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost API, no register, last_settled_wins                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 30
//!
//! [register]
//! default_id = 7
//!
//! [store]
//! settlement = "latest_request_wins"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use backoffice_core::store::SettlementPolicy;
use backoffice_core::CashRegisterId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ConfigError;

// =============================================================================
// Sections
// =============================================================================

/// `[api]`: where the back office lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout, enforced by the HTTP boundary.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[register]`: the register selected at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSettings {
    #[serde(default)]
    pub default_id: Option<i64>,
}

/// `[store]`: how slices settle overlapping requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub settlement: SettlementPolicy,
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub register: RegisterSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (console.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading console config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load console config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Writes the configuration, creating the parent directory if needed.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Console config saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        self.default_register()?;
        Ok(())
    }

    /// The configured startup register, validated.
    pub fn default_register(&self) -> Result<Option<CashRegisterId>, ConfigError> {
        self.register
            .default_id
            .map(CashRegisterId::new)
            .transpose()
            .map_err(|e| ConfigError::InvalidConfig(format!("register.default_id: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `BACKOFFICE_*` overrides looked up through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BACKOFFICE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup("BACKOFFICE_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(timeout = %timeout, "Ignoring invalid BACKOFFICE_TIMEOUT_SECS"),
            }
        }

        if let Some(id) = lookup("BACKOFFICE_REGISTER_ID") {
            match id.parse() {
                Ok(id) => {
                    debug!(register = id, "Overriding register from environment");
                    self.register.default_id = Some(id);
                }
                Err(_) => warn!(register = %id, "Ignoring invalid BACKOFFICE_REGISTER_ID"),
            }
        }

        if let Some(policy) = lookup("BACKOFFICE_SETTLEMENT") {
            match policy.parse() {
                Ok(parsed) => self.store.settlement = parsed,
                Err(e) => warn!("{}", e),
            }
        }
    }

    /// `console.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "backoffice", "backoffice-console")
            .map(|dirs| dirs.config_dir().join("console.toml"))
    }
}
