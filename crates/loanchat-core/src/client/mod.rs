//! HTTP client for the conversation engine.
//!
//! Implements [`ConversationBackend`](crate::ConversationBackend) over the
//! engine's JSON and multipart endpoints, plus the auxiliary endpoints used
//! by front ends (test customers, health, generated letter listing).

mod api;
mod config;
mod http;
mod models;

pub use config::ClientConfig;
pub use http::ConversationClient;
pub use models::{Customer, HealthStatus, LetterFile, LetterStatus};
