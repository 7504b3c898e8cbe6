//! Conversation stage tracking
//!
//! The client mirrors whatever stage the remote assistant declares. All
//! transition logic lives on the assistant side; this module is a pure
//! reducer over explicit state values.

mod locale;
mod reducer;
mod stage;
mod state;

#[cfg(test)]
mod proptests;

#[allow(unused_imports)] // Public API re-exports
pub use locale::placeholder_for_wire;
pub use locale::{placeholder_for, Locale, UnsupportedLocale};
pub use reducer::{apply_response, build_request, ConversationError};
pub use stage::Stage;
pub use state::{ChatRequest, ChatResponse, ConversationState};
