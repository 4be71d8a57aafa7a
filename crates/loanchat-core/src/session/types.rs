//! Session types, the renderer seam, and the in-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};

use loanchat_common::ClientError;

use crate::dispatch::UiEffect;
use crate::upload::ValidationResult;

/// Presentation layer as seen by the session.
///
/// Implementations must treat every call as idempotent display state:
/// visibility effects may repeat on consecutive turns.
pub trait Renderer: Send + Sync {
    fn user_message(&self, text: &str);
    fn bot_message(&self, text: &str);
    /// Client-side notice that did not come from the engine.
    fn notice(&self, text: &str);
    fn set_typing(&self, visible: bool);
    fn upload_status(&self, status: UploadStatus);
    fn apply(&self, effect: &UiEffect);
    fn clear_transcript(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Uploaded,
    Failed,
}

/// What happened to one session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing was sent or rendered.
    Ignored,
    /// Another turn is still in flight.
    Busy,
    /// `start` has not been called yet.
    NotStarted,
    /// The upload failed local validation and never reached the network.
    Rejected(ValidationResult),
    /// The file to upload could not be read; nothing was sent.
    Unreadable(String),
    /// The engine call failed; a generic failure message was rendered.
    Failed(ClientError),
    /// The session was reset while the call was in flight.
    Discarded,
    /// The turn was rendered and these effects were applied, in order.
    Applied(Vec<UiEffect>),
}

/// Clears the `busy` flag on drop, so an early return or a dropped future
/// always releases it.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Returns `None` if a turn is already in flight.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
