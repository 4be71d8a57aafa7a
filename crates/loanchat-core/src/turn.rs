//! Normalized outcome of one server call.
//!
//! The engine answers every conversation endpoint with
//! `{response, action?, stage?, data?}`. The document signal
//! (`pdf_available`, `pdf_path`) may sit at the top level or under `data`,
//! depending on which endpoint answered, so both places are read and merged
//! into a single [`TurnResult`].

use serde::Deserialize;

use loanchat_common::ClientError;

/// Server-declared intent for the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCode {
    RequestDocument,
    LoanApproved,
    /// Any action the client has no special handling for.
    Other(String),
}

impl ActionCode {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "request_document" => Self::RequestDocument,
            "loan_approved" => Self::LoanApproved,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::RequestDocument => "request_document",
            Self::LoanApproved => "loan_approved",
            Self::Other(raw) => raw,
        }
    }
}

/// Coarse position in the loan workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StageCode {
    #[default]
    Active,
    RequestDocument,
    Completed,
    Other(String),
}

impl StageCode {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "request_document" => Self::RequestDocument,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::RequestDocument => "request_document",
            Self::Completed => "completed",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub response_text: String,
    pub action: Option<ActionCode>,
    pub stage: StageCode,
    pub pdf_available: bool,
    pub pdf_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentSignal {
    #[serde(default)]
    pdf_available: Option<bool>,
    #[serde(default)]
    pdf_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePayload {
    response: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    stage: Option<String>,
    #[serde(default)]
    data: Option<DocumentSignal>,
    #[serde(flatten)]
    top: DocumentSignal,
}

impl TurnResult {
    /// Parse a raw response body.
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        let payload: WirePayload = serde_json::from_str(body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        Ok(Self::from_payload(payload))
    }

    fn from_payload(payload: WirePayload) -> Self {
        let nested = payload.data.unwrap_or_default();
        let top = payload.top;

        let pdf_available =
            top.pdf_available.unwrap_or(false) || nested.pdf_available.unwrap_or(false);
        let pdf_path = non_blank(top.pdf_path).or_else(|| non_blank(nested.pdf_path));

        Self {
            response_text: payload.response,
            action: payload.action.as_deref().map(ActionCode::from_wire),
            stage: payload
                .stage
                .as_deref()
                .map(StageCode::from_wire)
                .unwrap_or_default(),
            pdf_available,
            pdf_path,
        }
    }

    pub fn is_action(&self, action: &ActionCode) -> bool {
        self.action.as_ref() == Some(action)
    }
}

fn non_blank(path: Option<String>) -> Option<String> {
    path.filter(|p| !p.trim().is_empty())
}
