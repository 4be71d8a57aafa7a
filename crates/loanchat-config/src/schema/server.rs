//! Conversation engine connection settings.

use serde::{Deserialize, Serialize};

/// Where the conversation engine lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// API base, e.g. `http://localhost:5002/api`. Endpoints are appended.
    pub base_url: String,
    /// TCP connect timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002/api".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}
