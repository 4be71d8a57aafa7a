//! Conversation client struct, request plumbing, and response parsing.

use serde::de::DeserializeOwned;
use tracing::debug;

use loanchat_common::ClientError;

use crate::turn::TurnResult;

use super::config::ClientConfig;

/// Longest slice of an error body kept in a transport error.
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP client for the conversation engine.
pub struct ConversationClient {
    pub(crate) config: ClientConfig,
    pub(crate) http: reqwest::Client,
}

impl ConversationClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Absolute URL for an endpoint path such as `/chat/start`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// POST a JSON body to a conversation endpoint and normalize the turn.
    pub(crate) async fn post_turn(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<TurnResult, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "conversation request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let body = read_success_body(response).await?;
        TurnResult::from_json(&body)
    }

    /// GET an auxiliary JSON endpoint.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "engine query");

        let response = self.http.get(&url).send().await.map_err(map_send_error)?;
        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

pub(crate) fn map_send_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::transport("request timed out")
    } else if err.is_connect() {
        ClientError::transport(format!("connection failed: {err}"))
    } else {
        ClientError::transport(err.to_string())
    }
}

/// Require a 2xx status and return the body text.
pub(crate) async fn read_success_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::http(status.as_u16(), error_cause(status, &text)));
    }
    response
        .text()
        .await
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

/// Prefer the engine's `{"error": "..."}` message over the raw body.
pub(crate) fn error_cause(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json["error"].as_str() {
            return msg.to_string();
        }
    }
    let trimmed: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed
    }
}
