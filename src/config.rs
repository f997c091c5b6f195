use crate::common::constants::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::common::error::{Result, TenderError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_PATH: &str = "config.toml";

pub const ENV_SERVICE_URL: &str = "TENDER_SERVICE_URL";
pub const ENV_TIMEOUT_SECONDS: &str = "TENDER_TIMEOUT_SECONDS";
pub const ENV_LOG_DIR: &str = "TENDER_LOG_DIR";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// No timeout unless configured; a hung call is left to the caller
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "tender_scout.log".to_string(),
            default_filter: "tender_scout=info,warn".to_string(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory when present, then
    /// applies `.env` and process environment overrides.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = if Path::new(CONFIG_PATH).exists() {
            Self::load_from(CONFIG_PATH)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            TenderError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVICE_URL) {
            self.service.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| TenderError::Env {
                key: ENV_TIMEOUT_SECONDS.to_string(),
                message: format!("expected a whole number of seconds, got '{}'", raw),
            })?;
            self.service.timeout_seconds = Some(secs);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.directory = dir;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.service.base_url.trim();
        if url.is_empty() {
            return Err(TenderError::Config("service.base_url must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TenderError::Config(format!(
                "service.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        if self.service.timeout_seconds == Some(0) {
            return Err(TenderError::Config("service.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}
