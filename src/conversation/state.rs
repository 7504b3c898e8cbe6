//! Conversation state and the collaborator wire types

use super::Stage;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// State carried across turns for one session
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub stage: Stage,
    /// Opaque goal payload, echoed back on every request once set
    pub extracted_goal: Option<Value>,
    /// Opaque calendar proposal, kept for the session but never sent
    pub calendar_data: Option<Value>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub stage: Stage,
    /// Serialized as `null` when no goal has been extracted yet
    pub extracted_goal: Option<Value>,
}

/// Reply from the collaborator
///
/// Every field except `response` is optional and sparse: an absent field
/// means "unchanged", never "reset". `stage` stays a raw string so an
/// unexpected value cannot fail deserialization of the whole body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(
        default,
        deserialize_with = "lenient_stage",
        skip_serializing_if = "Option::is_none"
    )]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_goal: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_data: Option<Value>,
}

impl ChatResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    #[must_use]
    pub fn with_goal(mut self, goal: Value) -> Self {
        self.extracted_goal = Some(goal);
        self
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: Value) -> Self {
        self.calendar_data = Some(calendar);
        self
    }
}

/// Accept any JSON for `stage`; non-strings keep their JSON text so the
/// reducer rejects them like any other unknown value.
fn lenient_stage<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
