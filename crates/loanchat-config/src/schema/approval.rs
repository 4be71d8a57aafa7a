//! Approval handling.

use serde::{Deserialize, Serialize};

/// What to do when the server approves the loan more than once in a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatApproval {
    /// Reveal the download prompt again on every approval turn.
    #[default]
    Retrigger,
    /// Only the first approval of a session reveals the download prompt.
    Suppress,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    pub repeat: RepeatApproval,
}
