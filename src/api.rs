//! HTTP API for the chat page
//!
//! Serves the embedded page and runs turns on behalf of the browser. The
//! browser only ever receives HTML serialized from display trees.

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::conversation::{Locale, Stage};
use crate::session::{ChatSession, InputGate};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The one live session; held for the whole of a turn
    pub session: Arc<Mutex<ChatSession>>,
    /// What page loads see; never waits on an in-flight turn
    pub snapshot: Arc<RwLock<SessionSnapshot>>,
    /// Readable without the session lock
    pub gate: InputGate,
    pub locale: Locale,
}

impl AppState {
    pub fn new(session: ChatSession) -> Self {
        let snapshot = SessionSnapshot::of(&session);
        Self {
            gate: session.input_gate(),
            locale: session.locale(),
            snapshot: Arc::new(RwLock::new(snapshot)),
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Transcript as already-rendered HTML, plus the hints after the last turn
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub placeholder: String,
    pub turns: Vec<TurnHtml>,
}

impl SessionSnapshot {
    fn of(session: &ChatSession) -> Self {
        Self {
            stage: session.state().stage,
            placeholder: session.placeholder().to_string(),
            turns: session
                .turns()
                .iter()
                .map(|turn| TurnHtml::from(&session.render_turn(turn)))
                .collect(),
        }
    }

    /// Append a completed turn. Its HTML is stored as-is and never re-rendered.
    pub fn record(&mut self, response: &TurnResponse) {
        self.stage = response.stage;
        self.placeholder.clone_from(&response.placeholder);
        self.turns.push(response.turn.clone());
    }
}
