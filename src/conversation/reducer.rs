//! Pure request building and response merging
//!
//! Neither function performs I/O. `apply_response` is total: every response
//! produces a state, and anything it does not recognize leaves the
//! corresponding field as it was.

use super::{ChatRequest, ChatResponse, ConversationState, Stage};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while preparing a turn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("Message is empty")]
    EmptyMessage,
}

/// Package a user message with the current stage and goal.
///
/// The calendar payload is deliberately not part of the request.
pub fn build_request(
    user_text: &str,
    state: &ConversationState,
) -> Result<ChatRequest, ConversationError> {
    let message = user_text.trim();
    if message.is_empty() {
        return Err(ConversationError::EmptyMessage);
    }

    Ok(ChatRequest {
        message: message.to_string(),
        stage: state.stage,
        extracted_goal: state.extracted_goal.clone(),
    })
}

/// Merge a collaborator response into the state.
pub fn apply_response(state: &ConversationState, response: &ChatResponse) -> ConversationState {
    let stage = response
        .stage
        .as_deref()
        .and_then(|raw| raw.parse::<Stage>().ok())
        .unwrap_or(state.stage);

    let extracted_goal = merge_payload(&state.extracted_goal, &response.extracted_goal);
    let calendar_data = merge_payload(&state.calendar_data, &response.calendar_data);

    ConversationState {
        stage,
        extracted_goal,
        calendar_data,
    }
}

/// Sparse update of one opaque payload field.
fn merge_payload(current: &Option<Value>, incoming: &Option<Value>) -> Option<Value> {
    match incoming {
        Some(value) if is_present(value) => Some(value.clone()),
        _ => current.clone(),
    }
}

/// Truthiness of a payload value: `null`, `false`, zero and `""` are absent.
/// Empty arrays and objects count as present.
pub(super) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
