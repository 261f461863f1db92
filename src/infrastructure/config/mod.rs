//! Layered service configuration: defaults, then `workorder_risk.toml`, then
//! `WORKORDER_RISK_*` environment variables (nested keys split on `__`).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::nlp::NlpConfig;
use crate::infrastructure::predictors::ModelConfig;

pub const CONFIG_PATH_ENV: &str = "WORKORDER_RISK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "workorder_risk.toml";
pub const ENV_PREFIX: &str = "WORKORDER_RISK_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Map failures to 4xx/5xx instead of always answering 200
    pub strict_status_codes: bool,
    #[validate(range(min = 1024))]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            strict_status_codes: false,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub model: ModelConfig,
    pub nlp: NlpConfig,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            nlp: NlpConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `.env`, the config file and the environment
    pub fn load() -> Result<Self> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_figment(Self::figment(&path))
    }

    pub fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
