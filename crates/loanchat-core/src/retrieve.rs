//! Sanction letter retrieval.
//!
//! Opening the download URL in a new browsing context can be silently
//! refused by the host (a popup blocker, or a front end with no notion of
//! windows). The host reports whether a context was opened; when it was not,
//! the document is fetched in-process and handed to the host to save.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use loanchat_common::{ClientError, RetrieveError};

use crate::ConversationBackend;

/// Resolved download for one server document reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub opaque_server_path: String,
    pub derived_filename: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The host opened the URL in a new context.
    Navigated,
    /// The document was fetched and saved by the host at this path.
    Saved(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    Delivered(Delivery),
    Failed(String),
}

/// Capabilities of the environment the client runs in.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Try to open `url` in a new browsing context. Returns `false` when the
    /// host refused or has no such concept.
    async fn open_in_new_context(&self, url: &str) -> bool;

    /// Persist a fetched document under `filename`, returning where it went.
    async fn save_file(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct DocumentRetriever {
    api_base: String,
}

impl DocumentRetriever {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    pub fn build_target(&self, pdf_path: Option<&str>) -> Result<DownloadTarget, RetrieveError> {
        let path = pdf_path.map(str::trim).unwrap_or_default();
        if path.is_empty() {
            return Err(RetrieveError::InvalidDocumentReference(path.to_string()));
        }

        let filename = derive_filename(path);
        if filename.is_empty() {
            return Err(RetrieveError::InvalidDocumentReference(path.to_string()));
        }

        let download_url = format!(
            "{}/download/{}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(filename)
        );

        Ok(DownloadTarget {
            opaque_server_path: path.to_string(),
            derived_filename: filename.to_string(),
            download_url,
        })
    }

    /// Navigate first; fetch and save exactly once if navigation is refused.
    pub async fn retrieve(
        &self,
        target: &DownloadTarget,
        host: &dyn DocumentHost,
        backend: &dyn ConversationBackend,
    ) -> RetrievalOutcome {
        debug!(url = %target.download_url, "retrieving document");

        if host.open_in_new_context(&target.download_url).await {
            info!(filename = %target.derived_filename, "document opened in new context");
            return RetrievalOutcome::Delivered(Delivery::Navigated);
        }

        debug!("new context refused, fetching document directly");
        let bytes = match backend.fetch_document(&target.download_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("document fetch failed: {e}");
                return RetrievalOutcome::Failed(failure_reason(&e));
            }
        };

        match host.save_file(&target.derived_filename, &bytes).await {
            Ok(path) => {
                info!(path = %path.display(), size = bytes.len(), "document saved");
                RetrievalOutcome::Delivered(Delivery::Saved(path))
            }
            Err(e) => {
                warn!("saving document failed: {e}");
                RetrievalOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Last segment after splitting on `/` or `\`; the whole string if neither occurs.
pub fn derive_filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn failure_reason(err: &ClientError) -> String {
    if let Some(code) = err.status() {
        return format!("HTTP {code}");
    }
    match err {
        ClientError::Transport { cause, .. } | ClientError::MalformedResponse(cause) => cause.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, FakeHost};

    fn retriever() -> DocumentRetriever {
        DocumentRetriever::new("http://localhost:5002/api")
    }

    #[test]
    fn filename_from_unix_path() {
        assert_eq!(derive_filename("/tmp/out/letter_42.pdf"), "letter_42.pdf");
    }

    #[test]
    fn filename_without_separator_is_unchanged() {
        assert_eq!(derive_filename("letter_42.pdf"), "letter_42.pdf");
    }

    #[test]
    fn filename_from_windows_path() {
        assert_eq!(
            derive_filename(r"C:\letters\generated\letter_42.pdf"),
            "letter_42.pdf"
        );
    }

    #[test]
    fn filename_from_mixed_separators() {
        assert_eq!(derive_filename(r"generated_letters\2024/letter.pdf"), "letter.pdf");
    }

    #[test]
    fn build_target_derives_url() {
        let target = retriever()
            .build_target(Some("generated_letters/letter_42.pdf"))
            .unwrap();
        assert_eq!(target.opaque_server_path, "generated_letters/letter_42.pdf");
        assert_eq!(target.derived_filename, "letter_42.pdf");
        assert_eq!(
            target.download_url,
            "http://localhost:5002/api/download/letter_42.pdf"
        );
    }

    #[test]
    fn build_target_encodes_filename() {
        let target = DocumentRetriever::new("https://loans.example.com/api/")
            .build_target(Some("Sanction Letter #1.pdf"))
            .unwrap();
        assert_eq!(
            target.download_url,
            "https://loans.example.com/api/download/Sanction%20Letter%20%231.pdf"
        );
    }

    #[test]
    fn build_target_rejects_missing_reference() {
        assert!(matches!(
            retriever().build_target(None),
            Err(RetrieveError::InvalidDocumentReference(_))
        ));
        assert!(matches!(
            retriever().build_target(Some("   ")),
            Err(RetrieveError::InvalidDocumentReference(_))
        ));
        assert!(matches!(
            retriever().build_target(Some("generated_letters/")),
            Err(RetrieveError::InvalidDocumentReference(_))
        ));
    }

    #[tokio::test]
    async fn navigation_success_skips_fetch() {
        let backend = FakeBackend::new();
        let host = FakeHost::allowing_navigation();
        let target = retriever().build_target(Some("letter.pdf")).unwrap();

        let outcome = retriever().retrieve(&target, &host, &backend).await;

        assert_eq!(outcome, RetrievalOutcome::Delivered(Delivery::Navigated));
        assert_eq!(backend.fetch_count(), 0);
        assert_eq!(
            host.opened(),
            vec!["http://localhost:5002/api/download/letter.pdf".to_string()]
        );
    }

    #[tokio::test]
    async fn blocked_navigation_falls_back_to_fetch_and_save() {
        let backend = FakeBackend::new().with_document(b"%PDF-1.4".to_vec());
        let host = FakeHost::blocking_navigation();
        let target = retriever().build_target(Some("/srv/letters/letter.pdf")).unwrap();

        let outcome = retriever().retrieve(&target, &host, &backend).await;

        assert_eq!(
            outcome,
            RetrievalOutcome::Delivered(Delivery::Saved(PathBuf::from("/saved/letter.pdf")))
        );
        assert_eq!(backend.fetch_count(), 1);
        assert_eq!(host.saved(), vec![("letter.pdf".to_string(), b"%PDF-1.4".to_vec())]);
    }

    #[tokio::test]
    async fn blocked_navigation_and_missing_document_fails_with_status() {
        let backend = FakeBackend::new().with_fetch_error(ClientError::http(404, "NOT FOUND"));
        let host = FakeHost::blocking_navigation();
        let target = retriever().build_target(Some("letter.pdf")).unwrap();

        let outcome = retriever().retrieve(&target, &host, &backend).await;

        assert_eq!(outcome, RetrievalOutcome::Failed("HTTP 404".into()));
        assert_eq!(backend.fetch_count(), 1);
        assert!(host.saved().is_empty());
    }

    #[tokio::test]
    async fn connection_failure_reports_cause() {
        let backend =
            FakeBackend::new().with_fetch_error(ClientError::transport("connection refused"));
        let host = FakeHost::blocking_navigation();
        let target = retriever().build_target(Some("letter.pdf")).unwrap();

        let outcome = retriever().retrieve(&target, &host, &backend).await;
        assert_eq!(outcome, RetrievalOutcome::Failed("connection refused".into()));
    }

    #[tokio::test]
    async fn save_failure_is_reported() {
        let backend = FakeBackend::new().with_document(b"%PDF".to_vec());
        let host = FakeHost::blocking_navigation().failing_saves();
        let target = retriever().build_target(Some("letter.pdf")).unwrap();

        let outcome = retriever().retrieve(&target, &host, &backend).await;
        assert!(matches!(outcome, RetrievalOutcome::Failed(reason) if reason.contains("disk full")));
    }
}
