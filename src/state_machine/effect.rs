//! Effects produced by state transitions

use crate::session::{CartItem, DiscountCode, Order, SessionState, StoreResult};

/// Session mutation requested by a transition, applied by the runtime
/// in the order emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a line to the cart
    AddToCart(CartItem),

    /// Drop the cart line at a 1-based number
    RemoveCartItem { number: i64 },

    /// Overwrite the quantity of the cart line at a 1-based number
    UpdateQuantity { number: i64, quantity: u32 },

    ClearCart,

    ApplyDiscount(DiscountCode),

    SetCustomerName(String),

    SetCustomerAddress(String),

    /// Record the order and reset cart, discount and customer details
    PlaceOrder(Order),

    /// Drop the past order at a 1-based number
    CancelOrder { number: i64 },
}

impl Effect {
    /// Apply this effect to `session`.
    ///
    /// Transitions only emit effects whose preconditions they already
    /// checked against the same session, so the error path is only reachable
    /// if the session changed in between.
    pub fn apply(self, session: &mut SessionState) -> StoreResult<()> {
        match self {
            Effect::AddToCart(item) => session.add_item(item),
            Effect::RemoveCartItem { number } => {
                session.remove_item(number)?;
            }
            Effect::UpdateQuantity { number, quantity } => {
                session.update_quantity(number, quantity)?;
            }
            Effect::ClearCart => session.clear_cart(),
            Effect::ApplyDiscount(code) => session.apply_discount(code),
            Effect::SetCustomerName(name) => session.customer_name = Some(name),
            Effect::SetCustomerAddress(address) => session.customer_address = Some(address),
            Effect::PlaceOrder(order) => session.place_order(order),
            Effect::CancelOrder { number } => {
                session.cancel_order(number)?;
            }
        }
        Ok(())
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::AddToCart(_) => "add_to_cart",
            Effect::RemoveCartItem { .. } => "remove_cart_item",
            Effect::UpdateQuantity { .. } => "update_quantity",
            Effect::ClearCart => "clear_cart",
            Effect::ApplyDiscount(_) => "apply_discount",
            Effect::SetCustomerName(_) => "set_customer_name",
            Effect::SetCustomerAddress(_) => "set_customer_address",
            Effect::PlaceOrder(_) => "place_order",
            Effect::CancelOrder { .. } => "cancel_order",
        }
    }
}

/// Apply effects in order, stopping at the first failure.
#[cfg(test)]
pub fn apply_all(
    effects: impl IntoIterator<Item = Effect>,
    session: &mut SessionState,
) -> StoreResult<()> {
    effects
        .into_iter()
        .try_for_each(|effect| effect.apply(session))
}
