/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state; waiting for the backend to answer.
    Probing,
    Ready,
    AwaitingReply,
    /// The last operation failed. A fatal error halts the session; otherwise
    /// the next turn is accepted as if the session were ready.
    Error { fatal: bool },
}

impl SessionState {
    pub fn accepts_turns(&self) -> bool {
        matches!(
            self,
            Self::Ready | Self::AwaitingReply | Self::Error { fatal: false }
        )
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Error { fatal: true })
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probing => write!(f, "probing"),
            Self::Ready => write!(f, "ready"),
            Self::AwaitingReply => write!(f, "awaiting reply"),
            Self::Error { fatal: true } => write!(f, "halted"),
            Self::Error { fatal: false } => write!(f, "error"),
        }
    }
}
