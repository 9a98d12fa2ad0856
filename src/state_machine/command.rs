//! Global commands
//!
//! These are recognized at every step and always win over step handlers.
//! [`GlobalCommand::parse`] checks them in priority order, so `cancel order 2`
//! is never mistaken for a bare `cancel`.

/// Words that restart browsing from the category list
pub const GREETINGS: [&str; 4] = ["hi", "hello", "hey", "start"];

/// Numeric argument that may be absent or malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberArg {
    Missing,
    Invalid,
    Number(i64),
}

impl NumberArg {
    fn from_token(token: Option<&str>) -> Self {
        match token {
            None => NumberArg::Missing,
            Some(t) => t.parse().map_or(NumberArg::Invalid, NumberArg::Number),
        }
    }

    pub fn number(self) -> Option<i64> {
        match self {
            NumberArg::Number(n) => Some(n),
            NumberArg::Missing | NumberArg::Invalid => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalCommand {
    Greet,
    Help,
    ShowCart,
    ClearCart,
    ListOrders,
    CancelOrder(NumberArg),
    Remove(NumberArg),
    Update { item: NumberArg, quantity: NumberArg },
    Apply(String),
    Cancel,
    Search,
    Checkout,
}

impl GlobalCommand {
    /// Recognize a global command in normalized input.
    pub fn parse(text: &str) -> Option<Self> {
        if GREETINGS.contains(&text) {
            return Some(GlobalCommand::Greet);
        }

        match text {
            "help" => return Some(GlobalCommand::Help),
            "cart" => return Some(GlobalCommand::ShowCart),
            "clear cart" => return Some(GlobalCommand::ClearCart),
            "orders" => return Some(GlobalCommand::ListOrders),
            _ => {}
        }

        let mut words = text.split_whitespace();
        if text.starts_with("cancel order") {
            return Some(GlobalCommand::CancelOrder(NumberArg::from_token(
                words.nth(2),
            )));
        }
        if text.starts_with("remove ") {
            return Some(GlobalCommand::Remove(NumberArg::from_token(words.nth(1))));
        }
        if text.starts_with("update ") || text.starts_with("change ") {
            let item = NumberArg::from_token(words.nth(1));
            let quantity = NumberArg::from_token(words.next());
            return Some(GlobalCommand::Update { item, quantity });
        }
        if text.starts_with("apply ") {
            let code = words.skip(1).collect::<Vec<_>>().join(" ");
            return Some(GlobalCommand::Apply(code));
        }

        match text {
            "cancel" => Some(GlobalCommand::Cancel),
            "search" => Some(GlobalCommand::Search),
            "checkout" => Some(GlobalCommand::Checkout),
            _ => None,
        }
    }
}
