//! Conversation core for the loan-application assistant.
//!
//! Provides:
//! - An HTTP client for the conversation engine (start, text turns, uploads)
//! - Turn normalization across both document-signal payload shapes
//! - The action dispatcher that turns server directives into UI effects
//! - Two-tier sanction letter retrieval (direct navigation, then fetch-and-save)
//! - A session coordinator tying the above to a renderer

pub mod client;
pub mod dispatch;
pub mod identity;
pub mod retrieve;
pub mod session;
pub mod turn;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use loanchat_common::{ClientError, SessionToken};

pub use client::{ClientConfig, ConversationClient, Customer, HealthStatus, LetterStatus};
pub use dispatch::{ActionDispatcher, UiEffect};
pub use identity::SessionIdentity;
pub use retrieve::{Delivery, DocumentHost, DocumentRetriever, DownloadTarget, RetrievalOutcome};
pub use session::{ConversationSession, Renderer, TurnOutcome, UploadStatus};
pub use turn::{ActionCode, StageCode, TurnResult};
pub use upload::{mime_for_path, UploadCandidate, UploadValidator, ValidationResult};

/// The conversation engine as seen by the session coordinator.
///
/// Every call is one network round trip.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Initialize server-side conversation state for `token`.
    async fn start(&self, token: &SessionToken) -> Result<TurnResult, ClientError>;

    /// Send one text turn. `text` is already trimmed and non-empty.
    async fn send_message(&self, token: &SessionToken, text: &str)
        -> Result<TurnResult, ClientError>;

    /// Upload a validated document as a multipart turn.
    async fn send_file(
        &self,
        candidate: &UploadCandidate,
        bytes: Vec<u8>,
    ) -> Result<TurnResult, ClientError>;

    /// Drop server-side conversation state.
    async fn reset(&self, token: &SessionToken) -> Result<(), ClientError>;

    /// Fetch a document body; non-success statuses are errors.
    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, ClientError>;

    /// API base that endpoint paths are appended to.
    fn api_base(&self) -> &str;
}
