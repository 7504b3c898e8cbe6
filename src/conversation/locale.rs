//! Locale-specific prompt text

use super::Stage;
use std::str::FromStr;
use thiserror::Error;

/// Language of user-facing hints and the fixed failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ja,
    En,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale: {0:?} (expected \"ja\" or \"en\")")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" => Ok(Locale::Ja),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            _ => Err(UnsupportedLocale(s.to_string())),
        }
    }
}

impl Locale {
    /// HTML `lang` attribute value
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }

    /// Shown in place of the assistant's reply when a turn fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Locale::Ja => "エラーが発生しました。もう一度お試しください。",
            Locale::En => "Something went wrong. Please try again.",
        }
    }

    fn placeholder(self, stage: Stage) -> &'static str {
        match (self, stage) {
            (Locale::Ja, Stage::Initial) => "あなたの目標を教えてください",
            (Locale::Ja, Stage::GoalExtracted) => {
                "AIの提案を受けて、現在の状況や深めたい内容を教えてください"
            }
            (Locale::Ja, Stage::Planning) => "目標達成までの期間を教えてください",
            (Locale::Ja, Stage::Scheduling) => "スケジュールについて確認したい点を教えてください",
            (Locale::Ja, Stage::ConfirmSchedule) => "カレンダーへの登録についてお答えください",
            (Locale::En, Stage::Initial) => "Tell me about your goal",
            (Locale::En, Stage::GoalExtracted) => {
                "Tell me where you stand today, or what you'd like to explore further"
            }
            (Locale::En, Stage::Planning) => "How long do you want to take to reach this goal?",
            (Locale::En, Stage::Scheduling) => "Anything you'd like to check about the schedule?",
            (Locale::En, Stage::ConfirmSchedule) => {
                "Should this schedule be added to your calendar?"
            }
        }
    }
}

/// Input placeholder for a stage.
pub fn placeholder_for(stage: Stage, locale: Locale) -> &'static str {
    locale.placeholder(stage)
}

/// Input placeholder for a raw stage value; unknown values get the
/// `INITIAL` prompt.
pub fn placeholder_for_wire(raw: &str, locale: Locale) -> &'static str {
    let stage = raw.parse::<Stage>().unwrap_or(Stage::Initial);
    locale.placeholder(stage)
}
