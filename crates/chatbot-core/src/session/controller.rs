use std::sync::{Mutex as StdMutex, PoisonError};

use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::context::{ConversationHistory, PromptAssembler, SessionId};
use crate::error::{ChatError, Result};
use crate::llm::{BackendDescriptor, BackendProbe, ProbePolicy, Turn};

use super::executor::{TokenUsage, TurnExecutor};
use super::state::SessionState;

/// One conversation against one backend.
///
/// Call [`start`](Self::start) once before submitting turns. Turns are
/// serialized: concurrent [`submit_turn`](Self::submit_turn) calls queue on
/// the executor lock and run in arrival order. A turn submitted while the
/// session is still probing is rejected with [`ChatError::NotReady`].
pub struct ChatSession {
    id: SessionId,
    settings: Settings,
    state: watch::Sender<SessionState>,
    backend: StdMutex<Option<BackendDescriptor>>,
    executor: Mutex<Option<TurnExecutor>>,
}

impl ChatSession {
    pub fn new(settings: Settings) -> Self {
        let (state, _) = watch::channel(SessionState::Probing);
        Self {
            id: SessionId::new(),
            settings,
            state,
            backend: StdMutex::new(None),
            executor: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. to enable chat input once ready.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn backend(&self) -> Option<BackendDescriptor> {
        self.backend
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_backend(&self, descriptor: BackendDescriptor) {
        *self.backend.lock().unwrap_or_else(PoisonError::into_inner) = Some(descriptor);
    }

    /// Probe the backend and get ready for turns. Returns the status text to
    /// show the user.
    ///
    /// Calling this again after success returns the same status. After a
    /// probe timeout it probes again; after a fatal error it fails with
    /// [`ChatError::Halted`].
    pub async fn start(&self) -> Result<String> {
        let mut executor = self.executor.lock().await;

        if self.state().is_halted() {
            return Err(ChatError::Halted);
        }
        if executor.is_some() {
            if let Some(backend) = self.backend() {
                return Ok(backend.status_text());
            }
        }

        self.set_state(SessionState::Probing);

        match self.connect().await {
            Ok((descriptor, turn_executor)) => {
                let status = descriptor.status_text();
                info!(session = %self.id, backend = %descriptor.kind, "Session ready");
                self.record_backend(descriptor);
                *executor = Some(turn_executor);
                self.set_state(SessionState::Ready);
                Ok(status)
            }
            Err(e) => {
                let fatal = e.is_fatal();
                if fatal {
                    error!(session = %self.id, error = %e, "Session halted");
                } else {
                    warn!(session = %self.id, error = %e, "Session start failed");
                }
                self.set_state(SessionState::Error { fatal });
                Err(e)
            }
        }
    }

    async fn connect(&self) -> Result<(BackendDescriptor, TurnExecutor)> {
        let kind = self.settings.endpoint.backend_kind()?;
        let endpoint = self.settings.endpoint.url()?;

        let probe = BackendProbe::new(ProbePolicy::from(&self.settings.probe))?;
        let descriptor = probe.probe(&endpoint, kind).await?;

        let client = descriptor
            .kind
            .connect(&descriptor.base_endpoint, &self.settings.model)?;
        let assembler = PromptAssembler::new()
            .with_system_instruction(&self.settings.session.system_instruction);
        let executor = TurnExecutor::new(client, assembler)
            .with_history(ConversationHistory::with_session_id(self.id));

        Ok((descriptor, executor))
    }

    /// Send one user message and wait for the reply.
    pub async fn submit_turn(&self, user_input: &str) -> Result<String> {
        let state = self.state();
        if state.is_halted() {
            return Err(ChatError::Halted);
        }
        if !state.accepts_turns() {
            return Err(ChatError::NotReady(state));
        }

        let mut guard = self.executor.lock().await;

        // A restart may have begun while this turn waited on the lock.
        let state = self.state();
        if state.is_halted() {
            return Err(ChatError::Halted);
        }
        if !matches!(state, SessionState::Ready | SessionState::Error { fatal: false }) {
            return Err(ChatError::NotReady(state));
        }
        let executor = guard.as_mut().ok_or(ChatError::NotReady(state))?;

        self.set_state(SessionState::AwaitingReply);
        match executor.execute(user_input).await {
            Ok(reply) => {
                self.set_state(SessionState::Ready);
                Ok(reply)
            }
            Err(ChatError::EmptyInput) => {
                self.set_state(SessionState::Ready);
                Err(ChatError::EmptyInput)
            }
            Err(e) => {
                self.set_state(SessionState::Error { fatal: false });
                Err(e)
            }
        }
    }

    /// Copy of the conversation so far.
    pub async fn history(&self) -> Vec<Turn> {
        self.executor
            .lock()
            .await
            .as_ref()
            .map(|e| e.history().snapshot().to_vec())
            .unwrap_or_default()
    }

    pub async fn usage(&self) -> TokenUsage {
        self.executor
            .lock()
            .await
            .as_ref()
            .map(|e| e.usage())
            .unwrap_or_default()
    }

    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;
    use reqwest::Url;

    use super::*;
    use crate::llm::BackendKind;

    fn descriptor() -> BackendDescriptor {
        BackendDescriptor {
            kind: BackendKind::LlamaCppPython,
            base_endpoint: Url::parse("http://localhost:8001").unwrap(),
            discovered_at: Utc::now(),
            elapsed: Duration::from_secs(1),
            attempts: 1,
        }
    }

    #[test]
    fn backend_survives_poisoned_lock() {
        let session = Arc::new(ChatSession::new(Settings::default()));

        let poisoner = session.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.backend.lock().unwrap();
            panic!("poison the backend lock");
        })
        .join();
        assert!(session.backend.is_poisoned());

        session.record_backend(descriptor());

        let backend = session.backend().expect("descriptor recorded");
        assert_eq!(backend.kind, BackendKind::LlamaCppPython);
    }

    #[tokio::test]
    async fn queued_turn_is_rejected_once_a_restart_begins() {
        let session = ChatSession::new(Settings::default());
        session.set_state(SessionState::Error { fatal: false });

        // Hold the executor lock the way a running start() does.
        let guard = session.executor.lock().await;
        let turn = session.submit_turn("hello");
        tokio::pin!(turn);
        assert!(still_pending(turn.as_mut()).await);

        session.set_state(SessionState::Probing);
        drop(guard);

        assert!(matches!(
            turn.await,
            Err(ChatError::NotReady(SessionState::Probing))
        ));
    }

    async fn still_pending<F: std::future::Future + Unpin>(fut: F) -> bool {
        tokio::time::timeout(Duration::from_millis(20), fut).await.is_err()
    }
}
