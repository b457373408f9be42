use std::time::Duration;

use thiserror::Error;

use crate::session::SessionState;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Model service not available after {attempts} attempts ({elapsed:?})")]
    ProbeTimeout { attempts: u32, elapsed: Duration },

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Completion failed: {0}")]
    CompletionFailure(String),

    #[error("Session not ready (state: {0})")]
    NotReady(SessionState),

    #[error("Session halted after an unrecoverable error")]
    Halted,

    #[error("Message is empty")]
    EmptyInput,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ChatError {
    pub fn completion(message: impl Into<String>) -> Self {
        Self::CompletionFailure(message.into())
    }

    /// Fatal errors stop the session for good; everything else can be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownBackend(_) | Self::Config(_) | Self::Halted
        )
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
