//! Turn-by-turn action dispatch.
//!
//! The dispatcher is a reactive classifier over the latest [`TurnResult`]:
//! it does not enforce stage ordering, and a stage regression from the server
//! is taken at face value. Its only memory is whether a download prompt has
//! already been revealed, which matters under [`RepeatApproval::Suppress`].

use loanchat_config::RepeatApproval;
use tracing::{debug, warn};

use crate::turn::{ActionCode, StageCode, TurnResult};

/// Shown when the server approves the loan but no usable document came with it.
pub const DEGRADED_APPROVAL_MESSAGE: &str = "Your loan has been approved, but the sanction \
letter could not be generated. Please contact support to receive your letter.";

/// A UI side effect, applied by the renderer in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    ShowUploadControl,
    HideUploadControl,
    /// Offer the generated document for download.
    RevealDownloadPrompt { pdf_path: String },
    HideDownloadPrompt,
    /// Approved, but the document signal was incomplete.
    ReportDegradedApproval { message: String },
}

#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    repeat: RepeatApproval,
    revealed: bool,
}

impl ActionDispatcher {
    pub fn new(repeat: RepeatApproval) -> Self {
        Self {
            repeat,
            revealed: false,
        }
    }

    /// Decide the effects for one turn.
    pub fn dispatch(&mut self, turn: &TurnResult) -> Vec<UiEffect> {
        let mut effects = Vec::with_capacity(3);

        if turn.is_action(&ActionCode::RequestDocument) {
            effects.push(UiEffect::ShowUploadControl);
        } else {
            effects.push(UiEffect::HideUploadControl);
        }

        if !is_approved(turn) {
            return effects;
        }

        if self.revealed && self.repeat == RepeatApproval::Suppress {
            debug!("repeat approval suppressed");
            return effects;
        }

        match (turn.pdf_available, turn.pdf_path.as_deref()) {
            (true, Some(path)) => {
                debug!(pdf_path = %path, "loan approved, document ready");
                self.revealed = true;
                effects.push(UiEffect::RevealDownloadPrompt {
                    pdf_path: path.to_string(),
                });
            }
            (available, path) => {
                warn!(
                    pdf_available = available,
                    pdf_path = ?path,
                    "loan approved without a usable document"
                );
                // Any letter offered earlier is withdrawn with this approval.
                self.revealed = false;
                effects.push(UiEffect::HideDownloadPrompt);
                effects.push(UiEffect::ReportDegradedApproval {
                    message: DEGRADED_APPROVAL_MESSAGE.to_string(),
                });
            }
        }

        effects
    }

    /// Forget earlier approvals. Called when the conversation is reset.
    pub fn reset(&mut self) {
        self.revealed = false;
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(RepeatApproval::default())
    }
}

/// Approval comes either as an explicit action or as reaching the terminal
/// stage with a document ready.
pub fn is_approved(turn: &TurnResult) -> bool {
    turn.is_action(&ActionCode::LoanApproved)
        || (turn.stage == StageCode::Completed && turn.pdf_available)
}
