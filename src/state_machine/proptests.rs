//! Property-based tests for the state machine
//!
//! Random conversations are driven through `transition` + effect
//! application, checking invariants after every turn.

use super::state::*;
use super::transition::*;
use super::*;
use crate::catalog::fixtures::sample_catalog;
use crate::catalog::JsonCatalog;
use crate::session::{DiscountState, SessionState};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> TurnContext {
    TurnContext::new("tester", "ORD55555", "Mar 03, 2026")
}

fn run_turn(
    catalog: &JsonCatalog,
    state: &DialogueState,
    session: &mut SessionState,
    text: &str,
) -> TransitionResult {
    let result = transition(state, session, catalog, &test_context(), &UserInput::new(text));
    apply_all(result.effects.clone(), session).expect("effects validated by transition");
    result
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_command() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("hi".to_string()),
        Just("help".to_string()),
        Just("cart".to_string()),
        Just("clear cart".to_string()),
        Just("orders".to_string()),
        Just("cancel".to_string()),
        Just("search".to_string()),
        Just("checkout".to_string()),
        Just("buy".to_string()),
        Just("back".to_string()),
        Just("apply SAVE10".to_string()),
        Just("apply freeship".to_string()),
        Just("apply nope".to_string()),
        (-2i64..5).prop_map(|n| format!("remove {n}")),
        (-2i64..5, -2i64..5).prop_map(|(n, q)| format!("update {n} {q}")),
        (-2i64..4).prop_map(|n| format!("cancel order {n}")),
    ]
}

fn arb_step_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("laptops".to_string()),
        Just("laptop accessories".to_string()),
        Just("mens shirts".to_string()),
        Just("pro".to_string()),
        Just("apple".to_string()),
        (0u32..5).prop_map(|n| n.to_string()),
        "[a-z ]{0,12}",
    ]
}

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![arb_command(), arb_step_text()]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Start),
        Just(Step::SelectCategory),
        Just(Step::SelectProduct),
        Just(Step::ConfirmPurchase),
        Just(Step::Quantity),
        Just(Step::SearchProduct),
        Just(Step::CheckoutName),
        Just(Step::CheckoutAddress),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Every turn yields a reply and leaves the session within its invariants
    #[test]
    fn prop_conversation_preserves_invariants(inputs in proptest::collection::vec(arb_input(), 0..40)) {
        let catalog = sample_catalog();
        let mut state = DialogueState::default();
        let mut session = SessionState::default();

        for text in inputs {
            let orders_before = session.orders().len();
            let result = run_turn(&catalog, &state, &mut session, &text);
            state = result.new_state;

            prop_assert!(!result.reply.is_empty());
            prop_assert!(session.cart().iter().all(|item| item.quantity >= 1));
            prop_assert!([0.0, 0.10].contains(&session.discount.rate));
            prop_assert!(session.orders().len() <= orders_before + 1);
            if state.step.is_checkout() {
                prop_assert!(state.checkout_temp.is_some(), "checkout step without snapshot");
            }
            if session.orders().len() > orders_before {
                prop_assert_eq!(state.step, Step::Start);
                prop_assert!(session.cart().is_empty());
                prop_assert_eq!(session.discount, DiscountState::default());
            }
        }
    }

    // Free shipping, once granted, only goes away with a placed order
    #[test]
    fn prop_free_shipping_is_sticky(inputs in proptest::collection::vec(arb_input(), 0..40)) {
        let catalog = sample_catalog();
        let mut state = DialogueState::default();
        let mut session = SessionState::default();
        run_turn(&catalog, &state, &mut session, "apply freeship");

        for text in inputs {
            let orders_before = session.orders().len();
            let result = run_turn(&catalog, &state, &mut session, &text);
            state = result.new_state;
            if session.orders().len() > orders_before {
                break;
            }
            prop_assert!(session.discount.free_shipping);
        }
    }

    // Global commands behave the same at every step
    #[test]
    fn prop_help_never_changes_step(step in arb_step()) {
        let catalog = sample_catalog();
        let state = DialogueState::at(step);
        let session = SessionState::default();
        let result = transition(&state, &session, &catalog, &test_context(), &UserInput::new("help"));
        prop_assert_eq!(result.new_state.step, step);
        prop_assert!(result.effects.is_empty());
    }

    // Greeting always lands on category selection with a clean context
    #[test]
    fn prop_greeting_resets_dialogue(step in arb_step(), word in prop_oneof![Just("hi"), Just("HELLO"), Just(" hey "), Just("Start")]) {
        let catalog = sample_catalog();
        let state = DialogueState::at(step);
        let session = SessionState::default();
        let result = transition(&state, &session, &catalog, &test_context(), &UserInput::new(word));
        prop_assert_eq!(result.new_state, DialogueState::at(Step::SelectCategory));
    }

    // cancel only leaves checkout steps
    #[test]
    fn prop_cancel_outside_checkout_is_noop(step in arb_step()) {
        let catalog = sample_catalog();
        let state = DialogueState::at(step);
        let session = SessionState::default();
        let result = transition(&state, &session, &catalog, &test_context(), &UserInput::new("cancel"));
        if step.is_checkout() {
            prop_assert_eq!(result.new_state.step, Step::Start);
        } else {
            prop_assert_eq!(result.reply, "Nothing to cancel.");
            prop_assert_eq!(result.new_state.step, step);
        }
    }

    // Only the address step can place an order
    #[test]
    fn prop_orders_only_from_address_step(step in arb_step(), text in arb_step_text()) {
        let catalog = sample_catalog();
        let mut state = DialogueState::at(step);
        let mut session = SessionState::default();
        // Something in the cart so checkout-side handlers have work to do
        let setup = run_turn(&catalog, &DialogueState::at(Step::SelectCategory), &mut session, "laptops");
        let setup = run_turn(&catalog, &setup.new_state, &mut session, "1");
        let setup = run_turn(&catalog, &setup.new_state, &mut session, "buy");
        run_turn(&catalog, &setup.new_state, &mut session, "1");
        state.catalog = catalog.products.clone();

        let result = run_turn(&catalog, &state, &mut session, &text);
        let placed = result.effects.iter().any(|e| matches!(e, Effect::PlaceOrder(_)));
        if placed {
            prop_assert_eq!(step, Step::CheckoutAddress);
        }
    }
}
