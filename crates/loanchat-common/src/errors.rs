use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure of a single round trip to the conversation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Connection refused, timeout, or a non-success HTTP status.
    #[error("transport error{}: {cause}", http_suffix(.status))]
    Transport { status: Option<u16>, cause: String },

    /// The body could not be parsed as the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

fn http_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl ClientError {
    /// A transport failure that never produced an HTTP status.
    pub fn transport(cause: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            cause: cause.into(),
        }
    }

    /// A response that came back with a non-success status.
    pub fn http(status: u16, cause: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            cause: cause.into(),
        }
    }

    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::MalformedResponse(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetrieveError {
    #[error("invalid document reference: {0:?}")]
    InvalidDocumentReference(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoanchatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Retrieve(#[from] RetrieveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
