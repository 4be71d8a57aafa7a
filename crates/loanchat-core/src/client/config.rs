//! Conversation client configuration.

use std::time::Duration;

use loanchat_config::schema::ServerConfig;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn from_server_config(server: &ServerConfig) -> Self {
        Self::new(server.base_url.clone())
            .with_connect_timeout(Duration::from_secs(server.connect_timeout_secs.into()))
            .with_request_timeout(Duration::from_secs(server.request_timeout_secs.into()))
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_server_config(&ServerConfig::default())
    }
}
