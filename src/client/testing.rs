//! Mock chat service for testing
//!
//! Lets the session and HTTP layers be tested without a live assistant.

use super::{ChatError, ChatService};
use crate::conversation::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Mock service that returns queued replies in order
pub struct MockChatService {
    replies: Mutex<VecDeque<Result<ChatResponse, ChatError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
    /// Held before each reply, to keep a turn in flight
    delay: Duration,
}

impl MockChatService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Wait `delay` before answering each request
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a successful reply
    pub fn queue_response(&self, response: ChatResponse) {
        self.replies.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, error: ChatError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::connect("No mock reply queued")))
    }

    fn endpoint(&self) -> &str {
        "mock://assistant"
    }
}
