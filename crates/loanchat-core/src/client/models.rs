//! Auxiliary engine endpoints: test customers, health, generated letters.

use serde::{Deserialize, Serialize};

use loanchat_common::ClientError;

use super::http::ConversationClient;

/// Demo customer offered by the engine's test-data picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub city: String,
    pub phone: String,
    pub pre_approved_limit: u64,
}

#[derive(Debug, Deserialize)]
struct CustomerList {
    customers: Vec<Customer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LetterFile {
    pub name: String,
    pub size: u64,
    pub path: String,
}

/// Contents of the engine's generated-letter directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LetterStatus {
    pub exists: bool,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub files: Vec<LetterFile>,
}

impl ConversationClient {
    /// Customers whose phone numbers can be used to drive a demo conversation.
    pub async fn customers(&self) -> Result<Vec<Customer>, ClientError> {
        let list: CustomerList = self.get_json("/customers").await?;
        Ok(list.customers)
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json("/health").await
    }

    /// Generated sanction letters currently held by the engine.
    pub async fn letter_status(&self) -> Result<LetterStatus, ClientError> {
        self.get_json("/debug/pdf-status").await
    }
}
