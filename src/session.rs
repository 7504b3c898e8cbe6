//! Chat session
//!
//! Owns the single live [`ConversationState`] and runs one turn at a time:
//! close the input gate, send, reopen the gate, merge the reply, render.

use crate::client::{ChatError, ChatService};
use crate::conversation::{
    apply_response, build_request, placeholder_for, ChatResponse, ConversationError,
    ConversationState, Locale, Stage,
};
use crate::render::{render_assistant_turn_with, render_user_turn, DisplayNode, RenderOptions};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error("A turn is already in progress")]
    Busy,
}

// ============================================================================
// Input gate
// ============================================================================

/// Mirrors whether the input controls are enabled
#[derive(Debug, Clone)]
pub struct InputGate {
    enabled: Arc<AtomicBool>,
}

impl Default for InputGate {
    fn default() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl InputGate {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disable input; `None` if it is already disabled.
    pub fn close(&self) -> Option<InputLock> {
        self.enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InputLock {
                enabled: self.enabled.clone(),
            })
    }
}

/// Re-enables input when dropped, on every exit path
#[derive(Debug)]
pub struct InputLock {
    enabled: Arc<AtomicBool>,
}

impl Drop for InputLock {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::Release);
    }
}

// ============================================================================
// Turns
// ============================================================================

/// How a turn ended
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    Replied(ChatResponse),
    Failed(ChatError),
}

/// One completed exchange
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: Uuid,
    /// 1-based position within the session
    pub sequence: u64,
    /// Trimmed text that was sent
    pub message: String,
    /// State at send time
    pub snapshot: ConversationState,
    pub outcome: TurnOutcome,
    pub completed_at: DateTime<Utc>,
}

impl Turn {
    pub fn failed(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Failed(_))
    }
}

/// Both sides of a turn, ready for display
#[derive(Debug, Clone)]
pub struct RenderedTurn {
    pub id: Uuid,
    pub sequence: u64,
    pub user: DisplayNode,
    pub assistant: DisplayNode,
    pub failed: bool,
}

/// Result of a submission: the rendered turn and the hints that follow it
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub turn: RenderedTurn,
    pub stage: Stage,
    pub placeholder: &'static str,
}

// ============================================================================
// Session
// ============================================================================

pub struct ChatSession {
    service: Arc<dyn ChatService>,
    locale: Locale,
    render_options: RenderOptions,
    state: ConversationState,
    gate: InputGate,
    turns: Vec<Turn>,
}

impl ChatSession {
    pub fn new(service: Arc<dyn ChatService>, locale: Locale) -> Self {
        Self {
            service,
            locale,
            render_options: RenderOptions::default(),
            state: ConversationState::new(),
            gate: InputGate::default(),
            turns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn placeholder(&self) -> &'static str {
        placeholder_for(self.state.stage, self.locale)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Handle on the gate, for observers outside the session lock
    pub fn input_gate(&self) -> InputGate {
        self.gate.clone()
    }

    pub fn input_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Run one turn.
    ///
    /// Blank input is rejected before anything is sent. A transport failure
    /// is not an error here: it becomes a turn whose assistant side is the
    /// locale's fixed failure text, with the conversation state untouched.
    pub async fn submit(&mut self, raw: &str) -> Result<TurnReport, SessionError> {
        let request = build_request(raw, &self.state)?;
        let lock = self.gate.close().ok_or(SessionError::Busy)?;

        let snapshot = self.state.clone();
        let sequence = self.turns.len() as u64 + 1;
        tracing::debug!(sequence, stage = %snapshot.stage, "Sending turn");

        let result = self.service.send(&request).await;
        drop(lock);

        let outcome = match result {
            Ok(response) => {
                if let Some(raw_stage) = response.stage.as_deref() {
                    if raw_stage.parse::<Stage>().is_err() {
                        tracing::debug!(stage = raw_stage, "Ignoring unrecognized stage");
                    }
                }
                self.state = apply_response(&self.state, &response);
                if self.state.stage != snapshot.stage {
                    tracing::info!(
                        sequence,
                        from = %snapshot.stage,
                        to = %self.state.stage,
                        "Conversation stage changed"
                    );
                }
                TurnOutcome::Replied(response)
            }
            Err(e) => {
                tracing::warn!(sequence, kind = ?e.kind, error = %e, "Turn failed, state unchanged");
                TurnOutcome::Failed(e)
            }
        };

        let turn = Turn {
            id: Uuid::new_v4(),
            sequence,
            message: request.message,
            snapshot,
            outcome,
            completed_at: Utc::now(),
        };
        let rendered = self.render_turn(&turn);
        self.turns.push(turn);

        Ok(TurnReport {
            turn: rendered,
            stage: self.state.stage,
            placeholder: self.placeholder(),
        })
    }

    /// Render both sides of a recorded turn.
    pub fn render_turn(&self, turn: &Turn) -> RenderedTurn {
        let assistant_text = match &turn.outcome {
            TurnOutcome::Replied(response) => response.response.as_str(),
            TurnOutcome::Failed(_) => self.locale.failure_message(),
        };
        RenderedTurn {
            id: turn.id,
            sequence: turn.sequence,
            user: render_user_turn(&turn.message),
            assistant: render_assistant_turn_with(assistant_text, &self.render_options),
            failed: turn.failed(),
        }
    }
}
