//! Property-based tests for the renderer
//!
//! Rendering must be total, and its HTML must never carry live markup that
//! came from the input text.

use super::*;
use proptest::prelude::*;

fn arb_markdownish() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("**".to_string()),
        Just("_".to_string()),
        Just("`".to_string()),
        Just("```".to_string()),
        Just("\n".to_string()),
        Just("> ".to_string()),
        Just("- ".to_string()),
        Just("| a | b |\n|---|---|\n".to_string()),
        Just("[x](javascript:alert(1))".to_string()),
        Just("<script>".to_string()),
        Just("<a href=\"http://x.example\">".to_string()),
        "[a-zA-Z0-9 ]{0,12}",
    ];
    proptest::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_assistant_rendering_is_total(text in any::<String>()) {
        let node = render_assistant_turn(&text);
        prop_assert!(node.format().is_some());
        let _ = node.to_html();
    }

    #[test]
    fn prop_no_live_markup_from_input(text in arb_markdownish()) {
        let html = render_assistant_turn(&text).to_html();
        prop_assert!(!html.contains("<script"));
        prop_assert!(!html.contains("href=\"javascript:"));
        prop_assert!(!html.contains("<a href=\"http://x.example\">"));
    }

    #[test]
    fn prop_every_link_is_hardened(text in arb_markdownish()) {
        let node = render_assistant_turn(&text);
        for link in node.links() {
            prop_assert_eq!(link.target, Some(TARGET_NEW_CONTEXT));
            prop_assert_eq!(link.rel, Some(REL_NO_OPENER));
        }
    }

    #[test]
    fn prop_user_text_round_trips_as_text(text in any::<String>()) {
        let node = render_user_turn(&text);
        prop_assert_eq!(node.text_content(), text);
        prop_assert!(!node.to_html().contains("<script"));
    }
}
