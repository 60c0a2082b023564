use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{home_relative, FolioError, Result};

/// Centralized configuration for the folio client.
///
/// Endpoints are injected here rather than compiled in: the generation
/// endpoint is expected to be a server-side proxy that holds the actual
/// API credential. Nothing in this codebase ever sees a raw key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioConfig {
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub assist: AssistConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Text-generation proxy URL (POST, Gemini candidate/parts wire shape).
    pub generation_url: String,
    /// Contact form handler URL (form POST).
    pub contact_url: String,
}

/// Tuning for the generation client's retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl FolioConfig {
    /// Load config from ~/.folio/config.toml
    ///
    /// Fails hard with actionable error if config doesn't exist and no
    /// environment overrides are present.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            toml::from_str::<Self>(&content)
                .map_err(|err| FolioError::config(format!("invalid TOML: {err}")))?
        } else if let Ok(config) = Self::from_env() {
            config
        } else {
            return Err(FolioError::config(format!(
                "config not found at {config_path:?} and FOLIO_GENERATION_URL / FOLIO_CONTACT_URL are unset"
            )));
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Get config file path: ~/.folio/config.toml
    pub fn config_path() -> PathBuf {
        home_relative(".folio/config.toml")
    }

    /// Build a config purely from environment variables.
    pub fn from_env() -> Result<Self> {
        let generation_url = env::var("FOLIO_GENERATION_URL")
            .map_err(|_| FolioError::config("FOLIO_GENERATION_URL not set"))?;
        let contact_url = env::var("FOLIO_CONTACT_URL")
            .map_err(|_| FolioError::config("FOLIO_CONTACT_URL not set"))?;
        Ok(Self {
            endpoints: EndpointsConfig {
                generation_url,
                contact_url,
            },
            assist: AssistConfig::default(),
        })
    }

    /// Environment variables win over the file for endpoint URLs.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("FOLIO_GENERATION_URL") {
            self.endpoints.generation_url = url;
        }
        if let Ok(url) = env::var("FOLIO_CONTACT_URL") {
            self.endpoints.contact_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoints.generation_url.trim().is_empty() {
            return Err(FolioError::config("endpoints.generation_url is empty"));
        }
        if self.endpoints.contact_url.trim().is_empty() {
            return Err(FolioError::config("endpoints.contact_url is empty"));
        }
        if self.assist.max_retries == 0 {
            return Err(FolioError::config("assist.max_retries must be at least 1"));
        }
        Ok(())
    }
}
