//! Document upload policy.

use serde::{Deserialize, Serialize};

/// Largest accepted upload by default: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub allowed_mime_types: Vec<String>,
    /// Valid range: 1 byte to 100 MiB.
    pub max_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_mime_types: vec![
                "application/pdf".into(),
                "image/jpeg".into(),
                "image/jpg".into(),
                "image/png".into(),
            ],
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
