//! Local checks run on a document before it is uploaded.

use std::collections::BTreeSet;
use std::path::Path;

use loanchat_common::SessionToken;
use loanchat_config::schema::UploadConfig;

/// A file the user wants to upload. Built per attempt and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub session_token: SessionToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    RejectedType { allowed: BTreeSet<String> },
    RejectedSize { max_bytes: u64, actual_bytes: u64 },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Text shown to the user when the file is refused.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Accepted => None,
            Self::RejectedType { allowed } => Some(format!(
                "Unsupported file type. Please upload one of: {}.",
                allowed.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
            )),
            Self::RejectedSize {
                max_bytes,
                actual_bytes,
            } => Some(format!(
                "File size must be less than {} (this file is {}).",
                human_size(*max_bytes),
                human_size(*actual_bytes)
            )),
        }
    }
}

/// MIME type and size policy for uploads.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    allowed: BTreeSet<String>,
    max_bytes: u64,
}

impl UploadValidator {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>, max_bytes: u64) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            max_bytes,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.allowed_mime_types.iter().cloned(), config.max_size_bytes)
    }

    /// Type is checked before size; the first failure is reported.
    pub fn validate(&self, candidate: &UploadCandidate) -> ValidationResult {
        if !self.allowed.contains(&candidate.mime_type.to_ascii_lowercase()) {
            return ValidationResult::RejectedType {
                allowed: self.allowed.clone(),
            };
        }
        if candidate.size_bytes > self.max_bytes {
            return ValidationResult::RejectedSize {
                max_bytes: self.max_bytes,
                actual_bytes: candidate.size_bytes,
            };
        }
        ValidationResult::Accepted
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

/// Best-effort MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn candidate(name: &str, size_bytes: u64) -> UploadCandidate {
        UploadCandidate {
            name: name.to_string(),
            mime_type: mime_for_path(Path::new(name)).to_string(),
            size_bytes,
            session_token: SessionToken::generate(),
        }
    }

    #[test]
    fn small_pdf_is_accepted() {
        let result = UploadValidator::default().validate(&candidate("salary.pdf", MIB));
        assert_eq!(result, ValidationResult::Accepted);
        assert!(result.user_message().is_none());
    }

    #[test]
    fn large_pdf_is_rejected_for_size() {
        let result = UploadValidator::default().validate(&candidate("salary.pdf", 6 * MIB));
        assert_eq!(
            result,
            ValidationResult::RejectedSize {
                max_bytes: 5 * MIB,
                actual_bytes: 6 * MIB
            }
        );
    }

    #[test]
    fn docx_is_rejected_for_type() {
        let result = UploadValidator::default().validate(&candidate("salary.docx", MIB));
        match result {
            ValidationResult::RejectedType { allowed } => {
                assert!(allowed.contains("application/pdf"));
                assert_eq!(allowed.len(), 4);
            }
            other => panic!("expected RejectedType, got {other:?}"),
        }
    }

    #[test]
    fn type_is_checked_before_size() {
        let result = UploadValidator::default().validate(&candidate("huge.docx", 50 * MIB));
        assert!(matches!(result, ValidationResult::RejectedType { .. }));
    }

    #[test]
    fn exactly_max_size_is_accepted() {
        let result = UploadValidator::default().validate(&candidate("slip.png", 5 * MIB));
        assert!(result.is_accepted());
    }

    #[test]
    fn mime_match_ignores_case() {
        let mut c = candidate("slip.jpg", MIB);
        c.mime_type = "IMAGE/JPEG".into();
        assert!(UploadValidator::default().validate(&c).is_accepted());
    }

    #[test]
    fn custom_policy_from_config() {
        let config = UploadConfig {
            allowed_mime_types: vec!["application/pdf".into()],
            max_size_bytes: 1024,
        };
        let validator = UploadValidator::from_config(&config);
        assert!(!validator.validate(&candidate("slip.png", 10)).is_accepted());
        assert!(!validator.validate(&candidate("slip.pdf", 2048)).is_accepted());
        assert!(validator.validate(&candidate("slip.pdf", 512)).is_accepted());
    }

    #[test]
    fn size_rejection_message_mentions_limit() {
        let msg = ValidationResult::RejectedSize {
            max_bytes: 5 * MIB,
            actual_bytes: 6 * MIB,
        }
        .user_message()
        .unwrap();
        assert!(msg.contains("5.0 MB"));
        assert!(msg.contains("6.0 MB"));
    }

    #[test]
    fn mime_guess_by_extension() {
        assert_eq!(mime_for_path(Path::new("a/b/slip.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("no_extension")), "application/octet-stream");
    }
}
