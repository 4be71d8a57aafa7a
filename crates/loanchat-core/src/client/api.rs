//! ConversationBackend implementation for ConversationClient.

use async_trait::async_trait;
use tracing::debug;

use loanchat_common::{ClientError, SessionToken};

use crate::turn::TurnResult;
use crate::upload::UploadCandidate;
use crate::ConversationBackend;

use super::http::{map_send_error, read_success_body, ConversationClient};

#[async_trait]
impl ConversationBackend for ConversationClient {
    async fn start(&self, token: &SessionToken) -> Result<TurnResult, ClientError> {
        self.post_turn("/chat/start", &serde_json::json!({ "session_id": token }))
            .await
    }

    async fn send_message(
        &self,
        token: &SessionToken,
        text: &str,
    ) -> Result<TurnResult, ClientError> {
        self.post_turn(
            "/chat/message",
            &serde_json::json!({ "session_id": token, "message": text }),
        )
        .await
    }

    async fn send_file(
        &self,
        candidate: &UploadCandidate,
        bytes: Vec<u8>,
    ) -> Result<TurnResult, ClientError> {
        debug!(
            name = %candidate.name,
            mime = %candidate.mime_type,
            size = candidate.size_bytes,
            "document upload"
        );

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(candidate.name.clone())
            .mime_str(&candidate.mime_type)
            .map_err(|e| ClientError::transport(format!("invalid MIME type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("session_id", candidate.session_token.to_string());

        let response = self
            .http
            .post(self.endpoint("/chat/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let body = read_success_body(response).await?;
        TurnResult::from_json(&body)
    }

    async fn reset(&self, token: &SessionToken) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("/chat/reset"))
            .json(&serde_json::json!({ "session_id": token }))
            .send()
            .await
            .map_err(map_send_error)?;
        read_success_body(response).await.map(|_| ())
    }

    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.http.get(url).send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("download failed"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(format!("failed to read document: {e}")))?;
        debug!(size = bytes.len(), "document fetched");
        Ok(bytes.to_vec())
    }

    fn api_base(&self) -> &str {
        &self.config.base_url
    }
}
