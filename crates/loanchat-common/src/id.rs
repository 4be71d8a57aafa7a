use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static TOKEN_SEQ: AtomicU64 = AtomicU64::new(0);

pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Opaque token correlating every turn of one conversation.
///
/// Combines wall-clock milliseconds, a process-wide sequence number, and a
/// random suffix, so two tokens minted in the same millisecond still differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = TOKEN_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("session_{millis}_{seq}{}", new_correlation_id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
