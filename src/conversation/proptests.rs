//! Property-based tests for the conversation reducer
//!
//! These tests verify the sparse-merge invariants hold across arbitrary
//! sequences of collaborator responses.

use super::*;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_stage() -> impl Strategy<Value = Stage> {
    proptest::sample::select(Stage::ALL.to_vec())
}

/// Payloads that count as present
fn arb_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z ]{1,30}".prop_map(Value::String),
        (1i64..1000).prop_map(|n| json!(n)),
        Just(json!(true)),
        "[a-z]{1,10}".prop_map(|text| json!({ "text": text })),
        proptest::collection::vec("[a-z]{1,5}", 0..4).prop_map(|items| json!(items)),
    ]
}

/// Payloads that count as absent
fn arb_falsy_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!(false)),
        Just(json!(0)),
        Just(json!(0.0)),
        Just(json!("")),
    ]
}

fn arb_raw_stage() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_stage().prop_map(|stage| stage.as_str().to_string()),
        "[A-Za-z_]{0,20}",
    ]
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    (
        arb_stage(),
        proptest::option::of(arb_payload()),
        proptest::option::of(arb_payload()),
    )
        .prop_map(|(stage, extracted_goal, calendar_data)| ConversationState {
            stage,
            extracted_goal,
            calendar_data,
        })
}

fn arb_response() -> impl Strategy<Value = ChatResponse> {
    (
        ".{0,40}",
        proptest::option::of(arb_raw_stage()),
        proptest::option::of(prop_oneof![arb_payload(), arb_falsy_payload()]),
        proptest::option::of(prop_oneof![arb_payload(), arb_falsy_payload()]),
    )
        .prop_map(|(response, stage, extracted_goal, calendar_data)| ChatResponse {
            response,
            stage,
            extracted_goal,
            calendar_data,
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_empty_response_is_identity(state in arb_state(), text in ".{0,40}") {
        let next = apply_response(&state, &ChatResponse::text(text));
        prop_assert_eq!(next, state);
    }

    #[test]
    fn prop_goal_survives_responses_that_omit_it(
        goal in arb_payload(),
        responses in proptest::collection::vec(arb_response(), 0..10),
    ) {
        let mut state = apply_response(
            &ConversationState::new(),
            &ChatResponse::text("").with_goal(goal.clone()),
        );
        for mut response in responses {
            response.extracted_goal = None;
            state = apply_response(&state, &response);
        }
        prop_assert_eq!(state.extracted_goal, Some(goal));
    }

    #[test]
    fn prop_falsy_payloads_leave_state_unchanged(
        state in arb_state(),
        goal in arb_falsy_payload(),
        calendar in arb_falsy_payload(),
    ) {
        let response = ChatResponse::text("").with_goal(goal).with_calendar(calendar);
        prop_assert_eq!(apply_response(&state, &response), state);
    }

    #[test]
    fn prop_payload_fields_follow_last_present_value(
        responses in proptest::collection::vec(arb_response(), 0..10),
    ) {
        let mut state = ConversationState::new();
        let mut goal = None;
        let mut calendar = None;
        for response in &responses {
            if let Some(value) = response.extracted_goal.as_ref().filter(|v| reducer::is_present(v)) {
                goal = Some(value.clone());
            }
            if let Some(value) = response.calendar_data.as_ref().filter(|v| reducer::is_present(v)) {
                calendar = Some(value.clone());
            }
            state = apply_response(&state, response);
        }
        prop_assert_eq!(state.extracted_goal, goal);
        prop_assert_eq!(state.calendar_data, calendar);
    }

    #[test]
    fn prop_stage_mirrors_last_recognized_value(
        responses in proptest::collection::vec(arb_response(), 0..10),
    ) {
        let mut state = ConversationState::new();
        let mut expected = Stage::Initial;
        for response in &responses {
            if let Some(stage) = response.stage.as_deref().and_then(|s| s.parse().ok()) {
                expected = stage;
            }
            state = apply_response(&state, response);
        }
        prop_assert_eq!(state.stage, expected);
    }

    #[test]
    fn prop_build_request_never_carries_calendar(
        state in arb_state(),
        text in "[a-z]{1,10}",
    ) {
        let request = build_request(&text, &state).unwrap();
        prop_assert_eq!(request.stage, state.stage);
        prop_assert_eq!(&request.extracted_goal, &state.extracted_goal);
        let wire = serde_json::to_value(&request).unwrap();
        prop_assert!(wire.get("calendarData").is_none());
    }

    #[test]
    fn prop_placeholder_is_total(raw in ".{0,30}") {
        for locale in [Locale::Ja, Locale::En] {
            prop_assert!(!placeholder_for_wire(&raw, locale).is_empty());
        }
    }
}
