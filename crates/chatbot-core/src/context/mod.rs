mod history;
mod prompt;

pub use history::{ConversationHistory, SessionId};
pub use prompt::{PromptAssembler, PromptRequest};
