//! Conversation stages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Phase of the guided conversation, as declared by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Waiting for the user to state a goal
    #[default]
    Initial,
    /// A goal has been extracted and proposed back to the user
    GoalExtracted,
    /// Working out a concrete plan for the goal
    Planning,
    /// Building a schedule once a target period is known
    Scheduling,
    /// Asking whether the schedule should go into a calendar
    ConfirmSchedule,
}

impl Stage {
    /// All stages in conversational order
    pub const ALL: [Stage; 5] = [
        Stage::Initial,
        Stage::GoalExtracted,
        Stage::Planning,
        Stage::Scheduling,
        Stage::ConfirmSchedule,
    ];

    /// Wire spelling of the stage
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initial => "INITIAL",
            Stage::GoalExtracted => "GOAL_EXTRACTED",
            Stage::Planning => "PLANNING",
            Stage::Scheduling => "SCHEDULING",
            Stage::ConfirmSchedule => "CONFIRM_SCHEDULE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage value the client does not recognize
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown conversation stage: {0:?}")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    /// Exact, case-sensitive match on the wire spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spelling_roundtrips_through_from_str() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
        }
    }

    #[test]
    fn test_serde_matches_wire_spelling() {
        for stage in Stage::ALL {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, serde_json::Value::String(stage.as_str().to_string()));
        }
    }

    #[test]
    fn test_unknown_and_miscased_values_rejected() {
        assert!("DONE".parse::<Stage>().is_err());
        assert!("planning".parse::<Stage>().is_err());
        assert!("".parse::<Stage>().is_err());
        assert_eq!(
            "DONE".parse::<Stage>(),
            Err(UnknownStage("DONE".to_string()))
        );
    }

    #[test]
    fn test_default_is_initial() {
        assert_eq!(Stage::default(), Stage::Initial);
    }
}
