//! Sanction letter download settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Try the system browser before fetching the document ourselves.
    pub open_in_browser: bool,
    /// Where fetched documents are saved. Defaults to the user's download dir.
    pub output_dir: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            open_in_browser: true,
            output_dir: None,
        }
    }
}
