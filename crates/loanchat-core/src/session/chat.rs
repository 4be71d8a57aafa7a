//! Turn methods for ConversationSession (messages, uploads, downloads).

use std::future::Future;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use loanchat_common::{ClientError, RetrieveError, SessionToken};

use crate::dispatch::UiEffect;
use crate::retrieve::{Delivery, DocumentHost, RetrievalOutcome};
use crate::turn::TurnResult;
use crate::upload::{mime_for_path, UploadCandidate};

use super::manager::ConversationSession;
use super::types::{BusyGuard, TurnOutcome, UploadStatus};

pub(super) const TURN_FAILURE_MESSAGE: &str = "Oops! Something went wrong. Please try again.";
pub(super) const DOCUMENT_UNAVAILABLE_MESSAGE: &str = "The sanction letter is not available for download.";

impl ConversationSession {
    /// Send one text turn and apply whatever the engine decides.
    ///
    /// Blank input is a no-op: nothing is sent and nothing is rendered.
    pub async fn send_message(&self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return TurnOutcome::Busy;
        };
        let Some(token) = self.token().await else {
            return TurnOutcome::NotStarted;
        };

        self.renderer.user_message(text);
        self.renderer.set_typing(true);
        debug!(%token, "sending message");

        let result = self.backend.send_message(&token, text).await;
        self.finish_turn(&token, result, false).await
    }

    /// Validate and upload an in-memory document, then apply the engine's
    /// response exactly like a text turn.
    pub async fn send_file(&self, name: &str, mime_type: &str, bytes: Vec<u8>) -> TurnOutcome {
        let size_bytes = bytes.len() as u64;
        self.upload(name, mime_type, size_bytes, async move { Ok::<_, io::Error>(bytes) })
            .await
    }

    /// Upload a file from disk. The type and size are checked from the file
    /// name and metadata; the contents are read only once the file is accepted.
    pub async fn send_path(&self, path: &Path) -> TurnOutcome {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let size_bytes = match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return self.unreadable(path, "not a regular file"),
            Err(e) => return self.unreadable(path, &e.to_string()),
        };

        self.upload(&name, mime_for_path(path), size_bytes, tokio::fs::read(path))
            .await
    }

    /// The user accepted the download prompt: fetch the pending document.
    ///
    /// The pending document stays remembered, so a failed attempt can be retried.
    pub async fn confirm_download(
        &self,
        host: &dyn DocumentHost,
    ) -> Result<RetrievalOutcome, RetrieveError> {
        let pending = self.pending_document().await;
        self.renderer.apply(&UiEffect::HideDownloadPrompt);

        let target = match self.retriever.build_target(pending.as_deref()) {
            Ok(target) => target,
            Err(e) => {
                warn!("download confirmed without a document: {e}");
                self.renderer.notice(DOCUMENT_UNAVAILABLE_MESSAGE);
                return Err(e);
            }
        };

        let outcome = self
            .retriever
            .retrieve(&target, host, self.backend.as_ref())
            .await;

        match &outcome {
            RetrievalOutcome::Delivered(Delivery::Navigated) => {
                self.renderer.notice("Sanction letter opened in your browser.");
            }
            RetrievalOutcome::Delivered(Delivery::Saved(path)) => {
                self.renderer
                    .notice(&format!("Sanction letter saved to {}", path.display()));
            }
            RetrievalOutcome::Failed(reason) => {
                self.renderer
                    .notice(&format!("Failed to download the sanction letter: {reason}"));
            }
        }
        Ok(outcome)
    }

    async fn upload<F>(&self, name: &str, mime_type: &str, size_bytes: u64, contents: F) -> TurnOutcome
    where
        F: Future<Output = io::Result<Vec<u8>>> + Send,
    {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return TurnOutcome::Busy;
        };
        let Some(token) = self.token().await else {
            return TurnOutcome::NotStarted;
        };

        let candidate = UploadCandidate {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
            session_token: token.clone(),
        };

        let verdict = self.validator.validate(&candidate);
        if let Some(reason) = verdict.user_message() {
            info!(name, mime_type, size = size_bytes, "upload rejected locally");
            self.renderer.notice(&reason);
            return TurnOutcome::Rejected(verdict);
        }

        let bytes = match contents.await {
            Ok(bytes) => bytes,
            Err(e) => return self.unreadable(Path::new(name), &e.to_string()),
        };

        self.renderer.upload_status(UploadStatus::Uploading);
        self.renderer.set_typing(true);

        let result = self.backend.send_file(&candidate, bytes).await;
        self.finish_turn(&token, result, true).await
    }

    fn unreadable(&self, path: &Path, reason: &str) -> TurnOutcome {
        warn!(path = %path.display(), "cannot read upload: {reason}");
        self.renderer
            .notice(&format!("Could not read {}: {reason}", path.display()));
        TurnOutcome::Unreadable(reason.to_string())
    }

    /// Render a finished call and dispatch its effects, unless the session
    /// was reset while the call was in flight.
    async fn finish_turn(
        &self,
        token: &SessionToken,
        result: Result<TurnResult, ClientError>,
        upload: bool,
    ) -> TurnOutcome {
        let mut state = self.state.lock().await;
        if state.token() != Some(token) {
            debug!(%token, "discarding result for a reset session");
            return TurnOutcome::Discarded;
        }

        self.renderer.set_typing(false);

        let turn = match result {
            Ok(turn) => turn,
            Err(e) => {
                warn!(%token, "turn failed: {e}");
                if upload {
                    self.renderer.upload_status(UploadStatus::Failed);
                }
                self.renderer.bot_message(TURN_FAILURE_MESSAGE);
                return TurnOutcome::Failed(e);
            }
        };

        if upload {
            self.renderer.upload_status(UploadStatus::Uploaded);
        }
        debug!(
            action = ?turn.action,
            stage = turn.stage.as_str(),
            pdf_available = turn.pdf_available,
            "turn received"
        );
        self.renderer.bot_message(&turn.response_text);

        let effects = state.dispatcher.dispatch(&turn);
        for effect in &effects {
            match effect {
                UiEffect::RevealDownloadPrompt { pdf_path } => {
                    state.pending_document = Some(pdf_path.clone());
                }
                UiEffect::HideDownloadPrompt => state.pending_document = None,
                _ => {}
            }
            self.renderer.apply(effect);
        }
        TurnOutcome::Applied(effects)
    }
}
