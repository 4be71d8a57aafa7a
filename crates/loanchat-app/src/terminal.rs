//! Plain-text transcript renderer for the interactive loop.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use loanchat_core::{Renderer, UiEffect, UploadStatus};

/// Writes the transcript line by line. Visibility effects are tracked so a
/// repeated "show" or "hide" prints nothing.
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
    upload_visible: AtomicBool,
    download_visible: AtomicBool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            upload_visible: AtomicBool::new(false),
            download_visible: AtomicBool::new(false),
        }
    }

    pub fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn user_message(&self, text: &str) {
        self.line(&format!("you> {text}"));
    }

    fn bot_message(&self, text: &str) {
        self.line(&format!("bot> {text}"));
    }

    fn notice(&self, text: &str) {
        self.line(&format!("  * {text}"));
    }

    fn set_typing(&self, visible: bool) {
        if visible {
            self.line("bot> ...");
        }
    }

    fn upload_status(&self, status: UploadStatus) {
        let text = match status {
            UploadStatus::Uploading => "  * Uploading...",
            UploadStatus::Uploaded => "  * \u{2713} Uploaded",
            UploadStatus::Failed => "  * \u{2717} Upload failed",
        };
        self.line(text);
    }

    fn apply(&self, effect: &UiEffect) {
        match effect {
            UiEffect::ShowUploadControl => {
                if !self.upload_visible.swap(true, Ordering::Relaxed) {
                    self.line("  * The assistant needs a document. Attach it with /upload <path>.");
                }
            }
            UiEffect::HideUploadControl => {
                self.upload_visible.store(false, Ordering::Relaxed);
            }
            UiEffect::RevealDownloadPrompt { .. } => {
                if !self.download_visible.swap(true, Ordering::Relaxed) {
                    self.line("  * Your sanction letter is ready. Type /download to get it.");
                }
            }
            UiEffect::HideDownloadPrompt => {
                self.download_visible.store(false, Ordering::Relaxed);
            }
            UiEffect::ReportDegradedApproval { message } => {
                self.line(&format!("  ! {message}"));
            }
        }
    }

    fn clear_transcript(&self) {
        self.line("");
        self.line("--- new conversation ---");
    }
}
