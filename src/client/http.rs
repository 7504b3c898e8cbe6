//! HTTP implementation of the chat service

use super::{ChatError, ChatService};
use crate::conversation::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Path appended to the configured base URL
pub const CHAT_PATH: &str = "/api/chat";

/// Posts turns to `<base>/api/chat`
pub struct HttpChatService {
    client: Client,
    url: String,
}

impl HttpChatService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}{CHAT_PATH}", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ChatError::connect(format!("Connection failed: {e}"))
                } else {
                    ChatError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::timeout(format!("Timed out reading response: {e}"))
            } else {
                ChatError::malformed(format!("Failed to read response: {e}"))
            }
        })?;

        if !status.is_success() {
            return Err(ChatError::status(
                status.as_u16(),
                format!("HTTP {status}: {body}"),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| ChatError::malformed(format!("Failed to parse response: {e} - body: {body}")))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
