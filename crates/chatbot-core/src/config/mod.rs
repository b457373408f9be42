use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::{debug, warn};

use crate::constants::{endpoints, env, model, paths, probe, prompts};
use crate::error::ChatError;
use crate::llm::BackendKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub endpoint: EndpointSettings,
    pub model: ModelSettings,
    pub probe: ProbeSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointSettings {
    pub base_url: String,
    /// Which serving implementation to expect behind `base_url`.
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    pub name: String,
    pub api_key: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeSettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub max_elapsed_secs: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    pub system_instruction: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_MODEL_ENDPOINT.to_string(),
            backend: BackendKind::LlamaCppPython.tag().to_string(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: model::DEFAULT_MODEL.to_string(),
            api_key: model::PLACEHOLDER_API_KEY.to_string(),
            temperature: None,
            max_tokens: None,
            request_timeout_secs: model::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            max_attempts: probe::MAX_ATTEMPTS,
            initial_delay_ms: probe::INITIAL_DELAY_MS,
            max_delay_ms: probe::MAX_DELAY_MS,
            multiplier: probe::MULTIPLIER,
            max_elapsed_secs: probe::MAX_ELAPSED_SECS,
            request_timeout_ms: probe::REQUEST_TIMEOUT_MS,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            system_instruction: prompts::SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl EndpointSettings {
    pub fn url(&self) -> Result<Url, ChatError> {
        Url::parse(self.base_url.trim())
            .map_err(|e| ChatError::Config(format!("Invalid endpoint '{}': {e}", self.base_url)))
    }

    pub fn backend_kind(&self) -> Result<BackendKind, ChatError> {
        self.backend.parse()
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Defaults, then the user config file if present, then the environment.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let mut settings = if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    pub fn load_from(path: &Path) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(env::MODEL_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint.base_url = endpoint;
        }
    }
}
