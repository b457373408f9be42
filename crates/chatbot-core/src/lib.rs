pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod llm;
pub mod session;

// Re-export key types
pub use config::Settings;
pub use context::{ConversationHistory, PromptAssembler, PromptRequest, SessionId};
pub use error::{ChatError, Result};
pub use llm::{
    BackendDescriptor, BackendKind, BackendProbe, LlmClient, LlmResponse, OpenAIClient,
    ProbePolicy, Role, Turn, Usage,
};
pub use session::{ChatSession, SessionState, TokenUsage, TurnExecutor};
