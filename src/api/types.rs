//! API request and response types

use crate::conversation::Stage;
use crate::session::{RenderedTurn, TurnReport};
use serde::{Deserialize, Serialize};

/// Request to run a turn
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub message: String,
}

/// One turn as HTML fragments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnHtml {
    pub turn_id: String,
    pub sequence: u64,
    pub user_html: String,
    pub assistant_html: String,
    pub failed: bool,
}

impl From<&RenderedTurn> for TurnHtml {
    fn from(turn: &RenderedTurn) -> Self {
        Self {
            turn_id: turn.id.to_string(),
            sequence: turn.sequence,
            user_html: turn.user.to_html(),
            assistant_html: turn.assistant.to_html(),
            failed: turn.failed,
        }
    }
}

/// Response for a completed turn
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    #[serde(flatten)]
    pub turn: TurnHtml,
    pub stage: Stage,
    pub placeholder: String,
}

impl From<TurnReport> for TurnResponse {
    fn from(report: TurnReport) -> Self {
        Self {
            turn: TurnHtml::from(&report.turn),
            stage: report.stage,
            placeholder: report.placeholder.to_string(),
        }
    }
}

/// Snapshot of the session for page loads
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub stage: Stage,
    pub placeholder: String,
    pub input_enabled: bool,
    pub locale: String,
    /// Shown by the page when it cannot reach this server at all
    pub failure_message: String,
    pub turns: Vec<TurnHtml>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
