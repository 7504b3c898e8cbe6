//! Remote assistant client
//!
//! The assistant is reachable through a single request/response contract.
//! Everything behind it (prompting, model calls, calendar integration) is
//! opaque to this crate.

mod error;
mod http;
#[cfg(test)]
pub mod testing;

pub use error::ChatError;
#[allow(unused_imports)] // Public API re-exports
pub use error::ChatErrorKind;
pub use http::HttpChatService;

use crate::conversation::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for reaching the assistant
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one turn and wait for the reply
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;

    /// Where requests go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatService + ?Sized> ChatService for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        (**self).send(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for chat services
pub struct LoggingService {
    inner: Arc<dyn ChatService>,
    endpoint: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn ChatService>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl ChatService for LoggingService {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    stage = %request.stage,
                    next_stage = response.stage.as_deref().unwrap_or("-"),
                    response_chars = response.response.chars().count(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    stage = %request.stage,
                    kind = ?e.kind,
                    error = %e.message,
                    "Chat request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
