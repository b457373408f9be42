use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::config::ModelSettings;
use crate::error::ChatError;
use crate::llm::{LlmClient, OpenAIClient};

/// Identifies a recognized model-serving implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    LlamaCppPython,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LlamaCppPython => "Llamacpp_Python",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::LlamaCppPython => "llamacpp_python",
        }
    }

    pub fn all() -> &'static [BackendKind] {
        &[Self::LlamaCppPython]
    }

    /// Build the model client this backend speaks.
    pub fn connect(
        &self,
        endpoint: &Url,
        settings: &ModelSettings,
    ) -> Result<Box<dyn LlmClient>, ChatError> {
        match self {
            Self::LlamaCppPython => {
                let client = OpenAIClient::new(endpoint)
                    .with_model(&settings.name)
                    .with_api_key(&settings.api_key)
                    .with_temperature(settings.temperature)
                    .with_max_tokens(settings.max_tokens)
                    .with_timeout(Duration::from_secs(settings.request_timeout_secs))?;
                Ok(Box::new(client))
            }
        }
    }
}

impl FromStr for BackendKind {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        match normalized.as_str() {
            "llamacpp_python" | "llama_cpp_python" => Ok(Self::LlamaCppPython),
            _ => Err(ChatError::UnknownBackend(s.to_string())),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A backend confirmed live by the probe. Immutable once created.
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    pub kind: BackendKind,
    pub base_endpoint: Url,
    pub discovered_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub attempts: u32,
}

impl BackendDescriptor {
    /// Text shown to the user once the backend answers.
    pub fn status_text(&self) -> String {
        format!(
            "{} Model Service Available\n{} seconds",
            self.kind.name(),
            self.elapsed.as_secs()
        )
    }
}
