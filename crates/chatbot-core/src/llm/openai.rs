use std::time::Duration;

use crate::constants::{endpoints, model};
use crate::error::ChatError;
use crate::llm::traits::*;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for any server speaking the OpenAI chat-completions protocol.
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIClient {
    pub fn new(base_url: &Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: model::PLACEHOLDER_API_KEY.to_string(),
            model: model::DEFAULT_MODEL.to_string(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ChatError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    pub fn completions_url(&self) -> String {
        format!("{}{}", self.base_url, endpoints::CHAT_COMPLETIONS_PATH)
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[async_trait::async_trait]
impl LlmClient for OpenAIClient {
    async fn chat(&self, messages: &[Turn]) -> Result<LlmResponse, ChatError> {
        let url = self.completions_url();

        let request_body = OpenAIRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(%url, messages = messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ChatError::completion(format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ChatError::completion(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ChatError::completion(format!(
                "Model service error ({}): {}",
                status, response_text
            )));
        }

        let api_response: OpenAIResponse = serde_json::from_str(&response_text)
            .map_err(|e| ChatError::completion(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::completion("No response from model service"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| ChatError::completion("Model service returned no content"))?;

        Ok(LlmResponse {
            content,
            usage: api_response.usage.map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}
