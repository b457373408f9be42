//! Session lifecycle: probe the backend, then run turns against it.
//!
//! [`ChatSession`] is the entry point for a UI layer. It owns a
//! [`TurnExecutor`], which in turn owns the conversation history.

mod controller;
mod executor;
mod state;

pub use controller::ChatSession;
pub use executor::{TokenUsage, TurnExecutor};
pub use state::SessionState;
