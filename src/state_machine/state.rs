//! Dialogue state types

use crate::catalog::Product;
use crate::pricing::Totals;
use serde::{Deserialize, Serialize};

/// Position in the multi-turn dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Nothing in progress
    #[default]
    Start,
    /// Categories listed, waiting for a category name
    SelectCategory,
    /// Product list shown, waiting for a 1-based number
    SelectProduct,
    /// Product card shown, waiting for `buy` or `back`
    ConfirmPurchase,
    /// Waiting for how many of the selected product to add
    Quantity,
    /// Waiting for a search keyword
    SearchProduct,
    /// Checkout summary shown, waiting for the customer name
    CheckoutName,
    /// Waiting for the shipping address
    CheckoutAddress,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::SelectCategory => "select_category",
            Step::SelectProduct => "select_product",
            Step::ConfirmPurchase => "confirm_purchase",
            Step::Quantity => "quantity",
            Step::SearchProduct => "search_product",
            Step::CheckoutName => "checkout_name",
            Step::CheckoutAddress => "checkout_address",
        }
    }

    /// True for the steps that `cancel` can abort
    pub fn is_checkout(self) -> bool {
        matches!(self, Step::CheckoutName | Step::CheckoutAddress)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient dialogue state, carried by the client between turns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogueState {
    #[serde(default)]
    pub step: Step,
    /// Product shown on the detail card
    #[serde(default)]
    pub selected_product: Option<Product>,
    /// Products currently addressable by number (category listing or search hits)
    #[serde(default)]
    pub catalog: Vec<Product>,
    /// Pricing frozen by `checkout`, reused when the order is placed
    #[serde(default)]
    pub checkout_temp: Option<Totals>,
}

impl DialogueState {
    pub fn at(step: Step) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    pub fn with_step(&self, step: Step) -> Self {
        Self {
            step,
            ..self.clone()
        }
    }
}

/// Per-turn inputs that are not derived from the shopper's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    /// Name used in greetings and the order confirmation sign-off
    pub shopper_name: String,
    /// Id given to an order if this turn completes checkout
    pub order_id: String,
    /// Date stamped on an order placed this turn
    pub order_date: String,
}

impl TurnContext {
    pub fn new(
        shopper_name: impl Into<String>,
        order_id: impl Into<String>,
        order_date: impl Into<String>,
    ) -> Self {
        Self {
            shopper_name: shopper_name.into(),
            order_id: order_id.into(),
            order_date: order_date.into(),
        }
    }
}
