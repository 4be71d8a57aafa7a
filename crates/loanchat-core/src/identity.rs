//! Session identity held by the coordinator.

use loanchat_common::SessionToken;
use tracing::debug;

/// The token correlating all turns of one conversation.
///
/// A reset always mints a fresh token; old tokens are never reused.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    token: SessionToken,
}

impl SessionIdentity {
    pub fn create() -> Self {
        let token = SessionToken::generate();
        debug!(%token, "session identity created");
        Self { token }
    }

    /// Discard the current token and mint a new one.
    pub fn reset(&mut self) -> &SessionToken {
        let old = std::mem::replace(&mut self.token, SessionToken::generate());
        debug!(old = %old, new = %self.token, "session identity reset");
        &self.token
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}
