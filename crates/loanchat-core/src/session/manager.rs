//! ConversationSession struct and lifecycle (start, reset).

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use loanchat_common::SessionToken;
use loanchat_config::{LoanchatConfig, RepeatApproval};

use crate::dispatch::{ActionDispatcher, UiEffect};
use crate::identity::SessionIdentity;
use crate::retrieve::DocumentRetriever;
use crate::upload::UploadValidator;
use crate::ConversationBackend;

use super::types::{Renderer, TurnOutcome};

pub(super) const CONNECT_FAILURE_MESSAGE: &str =
    "Sorry, I'm having trouble connecting. Please try again in a moment.";

/// Mutable per-conversation state. Never locked across a network call.
pub(super) struct SessionState {
    pub(super) identity: Option<SessionIdentity>,
    pub(super) dispatcher: ActionDispatcher,
    /// Document revealed by the latest approval, awaiting confirmation.
    pub(super) pending_document: Option<String>,
}

impl SessionState {
    pub(super) fn token(&self) -> Option<&SessionToken> {
        self.identity.as_ref().map(SessionIdentity::token)
    }
}

/// One conversation with the loan engine.
pub struct ConversationSession {
    pub(super) backend: Arc<dyn ConversationBackend>,
    pub(super) renderer: Arc<dyn Renderer>,
    pub(super) validator: UploadValidator,
    pub(super) retriever: DocumentRetriever,
    pub(super) state: Mutex<SessionState>,
    /// Whether a message or upload turn is in flight.
    pub(super) busy: AtomicBool,
}

impl ConversationSession {
    pub fn new(backend: Arc<dyn ConversationBackend>, renderer: Arc<dyn Renderer>) -> Self {
        let retriever = DocumentRetriever::new(backend.api_base());
        Self {
            backend,
            renderer,
            validator: UploadValidator::default(),
            retriever,
            state: Mutex::new(SessionState {
                identity: None,
                dispatcher: ActionDispatcher::default(),
                pending_document: None,
            }),
            busy: AtomicBool::new(false),
        }
    }

    pub fn from_config(
        backend: Arc<dyn ConversationBackend>,
        renderer: Arc<dyn Renderer>,
        config: &LoanchatConfig,
    ) -> Self {
        Self::new(backend, renderer)
            .with_validator(UploadValidator::from_config(&config.upload))
            .with_repeat_approval(config.approval.repeat)
    }

    pub fn with_validator(mut self, validator: UploadValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_repeat_approval(mut self, repeat: RepeatApproval) -> Self {
        self.state.get_mut().dispatcher = ActionDispatcher::new(repeat);
        self
    }

    /// Current session token, if the session has been started.
    pub async fn token(&self) -> Option<SessionToken> {
        self.state.lock().await.token().cloned()
    }

    /// Document path waiting for the user to confirm the download.
    pub async fn pending_document(&self) -> Option<String> {
        self.state.lock().await.pending_document.clone()
    }

    /// Open the conversation and render the engine's greeting.
    ///
    /// Creates the session identity on first use.
    pub async fn start(&self) -> TurnOutcome {
        let token = {
            let mut state = self.state.lock().await;
            state
                .identity
                .get_or_insert_with(SessionIdentity::create)
                .token()
                .clone()
        };
        info!(%token, "starting conversation");

        let result = self.backend.start(&token).await;

        let state = self.state.lock().await;
        if state.token() != Some(&token) {
            return TurnOutcome::Discarded;
        }
        match result {
            Ok(turn) => {
                self.renderer.bot_message(&turn.response_text);
                TurnOutcome::Applied(Vec::new())
            }
            Err(e) => {
                warn!("failed to start conversation: {e}");
                self.renderer.bot_message(CONNECT_FAILURE_MESSAGE);
                TurnOutcome::Failed(e)
            }
        }
    }

    /// Throw the conversation away and start a fresh one under a new token.
    ///
    /// The engine-side reset is best effort; a failure is logged and the
    /// new conversation is started regardless.
    pub async fn reset(&self) -> TurnOutcome {
        let old = self.token().await;
        if let Some(old) = &old {
            if let Err(e) = self.backend.reset(old).await {
                warn!(token = %old, "engine reset failed, continuing: {e}");
            }
        }

        {
            let mut state = self.state.lock().await;
            match state.identity.as_mut() {
                Some(identity) => {
                    identity.reset();
                }
                None => state.identity = Some(SessionIdentity::create()),
            }
            state.dispatcher.reset();
            state.pending_document = None;
        }

        self.renderer.clear_transcript();
        self.renderer.set_typing(false);
        self.renderer.apply(&UiEffect::HideUploadControl);
        self.renderer.apply(&UiEffect::HideDownloadPrompt);

        self.start().await
    }
}
