use tracing::{debug, warn};

use crate::context::{ConversationHistory, PromptAssembler};
use crate::error::{ChatError, Result};
use crate::llm::{LlmClient, Usage};

/// Running token totals reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub requests: u64,
}

impl TokenUsage {
    fn record(&mut self, usage: &Usage) {
        self.input_tokens = self.input_tokens.saturating_add(u64::from(usage.input_tokens));
        self.output_tokens = self.output_tokens.saturating_add(u64::from(usage.output_tokens));
        self.requests += 1;
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Runs one request/response exchange at a time against the model.
///
/// History is only touched after the model has answered, so a failed or
/// abandoned turn never leaves half an exchange behind.
pub struct TurnExecutor {
    client: Box<dyn LlmClient>,
    assembler: PromptAssembler,
    history: ConversationHistory,
    usage: TokenUsage,
}

impl TurnExecutor {
    pub fn new(client: Box<dyn LlmClient>, assembler: PromptAssembler) -> Self {
        Self {
            client,
            assembler,
            history: ConversationHistory::new(),
            usage: TokenUsage::default(),
        }
    }

    pub fn with_history(mut self, history: ConversationHistory) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    pub async fn execute(&mut self, user_input: &str) -> Result<String> {
        if user_input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let request = self.assembler.assemble(self.history.snapshot(), user_input);
        let messages = request.messages();
        debug!(
            session = %self.history.session_id(),
            messages = messages.len(),
            history_tokens = self.history.estimate_tokens(),
            "Executing turn"
        );

        let response = match self.client.chat(&messages).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session = %self.history.session_id(), error = %e, "Turn failed");
                return Err(match e {
                    ChatError::CompletionFailure(_) => e,
                    other => ChatError::completion(other.to_string()),
                });
            }
        };

        if let Some(ref usage) = response.usage {
            self.usage.record(usage);
        }

        self.history
            .append_exchange(request.user_input, response.content.clone());
        Ok(response.content)
    }
}
