use crate::llm::{Role, Turn};
use uuid::Uuid;

/// Key for a conversation. One per session object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only log of the turns exchanged in one session.
///
/// Only the owning crate can append; everyone else gets a shared slice.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    session_id: SessionId,
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(session_id: SessionId) -> Self {
        Self {
            session_id,
            turns: Vec::new(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Record a completed user/assistant exchange.
    pub(crate) fn append_exchange(
        &mut self,
        user: impl Into<String>,
        assistant: impl Into<String>,
    ) {
        self.turns.reserve(2);
        self.append(Turn::user(user));
        self.append(Turn::assistant(assistant));
    }

    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn exchanges(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::User).count()
    }

    pub fn estimate_tokens(&self) -> usize {
        self.turns.iter().map(|t| t.content.len() / 4).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.last().is_none());
    }

    #[test]
    fn snapshot_preserves_append_order() {
        let mut history = ConversationHistory::new();
        history.append_exchange("hello", "hi");
        history.append_exchange("again", "ok");

        let snapshot = history.snapshot();
        assert_eq!(
            snapshot,
            &[
                Turn::user("hello"),
                Turn::assistant("hi"),
                Turn::user("again"),
                Turn::assistant("ok"),
            ]
        );
        assert_eq!(history.exchanges(), 2);
        assert_eq!(history.last(), Some(&Turn::assistant("ok")));
    }

    #[test]
    fn snapshot_reflects_later_appends() {
        let mut history = ConversationHistory::new();
        history.append(Turn::user("one"));
        assert_eq!(history.snapshot().len(), 1);
        history.append(Turn::assistant("two"));
        assert_eq!(history.snapshot().len(), 2);
    }

    #[test]
    fn session_id_is_kept() {
        let id = SessionId::new();
        let history = ConversationHistory::with_session_id(id);
        assert_eq!(history.session_id(), id);
        assert_ne!(SessionId::new(), id);
    }

    #[test]
    fn token_estimate_uses_four_chars_per_token() {
        let mut history = ConversationHistory::new();
        history.append_exchange("abcdefgh", "abcd");
        assert_eq!(history.estimate_tokens(), 3);
    }
}
