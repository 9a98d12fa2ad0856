//! Per-session cart, discount and order history
//!
//! Item and order numbers arrive 1-based from the dialogue and are checked
//! here; a bad number is a [`StoreError`] whose message is shown to the
//! shopper as-is.

use crate::catalog::Product;
use crate::pricing::Totals;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid item number.")]
    InvalidItemNumber,
    #[error("Invalid order number.")]
    InvalidOrderNumber,
    #[error("Quantity must be > 0.")]
    InvalidQuantity,
    #[error("Discount rate must be 0 or 0.10.")]
    InvalidDiscountRate,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A product in the cart with the quantity the shopper asked for.
///
/// Deserializing rejects a zero quantity, so a blob handed back by a client
/// cannot carry an empty line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CartItemRecord")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

#[derive(Deserialize)]
struct CartItemRecord {
    #[serde(flatten)]
    product: Product,
    quantity: u32,
}

impl TryFrom<CartItemRecord> for CartItem {
    type Error = StoreError;

    fn try_from(record: CartItemRecord) -> StoreResult<Self> {
        if record.quantity == 0 {
            return Err(StoreError::InvalidQuantity);
        }
        Ok(Self::new(record.product, record.quantity))
    }
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn line_total_usd(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Active discount codes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiscountRecord")]
pub struct DiscountState {
    /// Fraction taken off the subtotal, 0.0 or 0.10
    pub rate: f64,
    pub free_shipping: bool,
}

#[derive(Deserialize)]
struct DiscountRecord {
    rate: f64,
    free_shipping: bool,
}

/// Tolerance when matching a deserialized rate to a known one
const RATE_EPSILON: f64 = 1e-9;

impl TryFrom<DiscountRecord> for DiscountState {
    type Error = StoreError;

    fn try_from(record: DiscountRecord) -> StoreResult<Self> {
        let rate = if record.rate.abs() < RATE_EPSILON {
            0.0
        } else if (record.rate - DiscountCode::SAVE10_RATE).abs() < RATE_EPSILON {
            DiscountCode::SAVE10_RATE
        } else {
            return Err(StoreError::InvalidDiscountRate);
        };
        Ok(Self {
            rate,
            free_shipping: record.free_shipping,
        })
    }
}

impl Default for DiscountState {
    fn default() -> Self {
        Self {
            rate: 0.0,
            free_shipping: false,
        }
    }
}

impl DiscountState {
    /// Whole-percent view used in cart summaries
    pub fn percent(&self) -> u32 {
        (self.rate * 100.0).round() as u32
    }
}

/// Supported promo codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountCode {
    Save10,
    Freeship,
}

impl DiscountCode {
    pub const SAVE10_RATE: f64 = 0.10;

    /// Case-insensitive code lookup
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "SAVE10" => Some(Self::Save10),
            "FREESHIP" => Some(Self::Freeship),
            _ => None,
        }
    }
}

/// Totals recorded on a placed order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub grand_total_usd: f64,
    pub grand_total: f64,
}

impl From<&Totals> for OrderTotals {
    fn from(totals: &Totals) -> Self {
        Self {
            grand_total_usd: totals.grand_total_usd(),
            grand_total: totals.grand_total,
        }
    }
}

/// A completed checkout. `items` is a copy of the cart at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub date: String,
    pub items: Vec<CartItem>,
    pub totals: OrderTotals,
    pub customer_name: String,
    pub customer_address: String,
}

/// Everything that survives between turns for one shopper
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default)]
    pub discount: DiscountState,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
}

/// Map a 1-based number onto a 0-based index into a list of `len` entries.
pub fn resolve_index(number: i64, len: usize) -> Option<usize> {
    let idx = usize::try_from(number.checked_sub(1)?).ok()?;
    (idx < len).then_some(idx)
}

impl SessionState {
    // ==================== Cart ====================

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn add_item(&mut self, item: CartItem) {
        self.cart.push(item);
    }

    pub fn remove_item(&mut self, number: i64) -> StoreResult<CartItem> {
        let idx = resolve_index(number, self.cart.len()).ok_or(StoreError::InvalidItemNumber)?;
        Ok(self.cart.remove(idx))
    }

    /// Set (not add to) the quantity of a cart line.
    pub fn update_quantity(&mut self, number: i64, quantity: u32) -> StoreResult<&CartItem> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity);
        }
        let idx = resolve_index(number, self.cart.len()).ok_or(StoreError::InvalidItemNumber)?;
        let item = &mut self.cart[idx];
        item.quantity = quantity;
        Ok(item)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    // ==================== Discounts ====================

    pub fn apply_discount(&mut self, code: DiscountCode) {
        match code {
            DiscountCode::Save10 => self.discount.rate = DiscountCode::SAVE10_RATE,
            DiscountCode::Freeship => self.discount.free_shipping = true,
        }
    }

    // ==================== Orders ====================

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Record the order and reset everything tied to the finished checkout.
    pub fn place_order(&mut self, order: Order) {
        self.orders.push(order);
        self.cart.clear();
        self.discount = DiscountState::default();
        self.customer_name = None;
        self.customer_address = None;
    }

    pub fn cancel_order(&mut self, number: i64) -> StoreResult<Order> {
        let idx =
            resolve_index(number, self.orders.len()).ok_or(StoreError::InvalidOrderNumber)?;
        Ok(self.orders.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::product;

    fn session_with_items(n: u64) -> SessionState {
        let mut session = SessionState::default();
        for id in 1..=n {
            session.add_item(CartItem::new(
                product(id, &format!("Item {id}"), "misc", None, 10.0),
                1,
            ));
        }
        session
    }

    fn order(id: &str, items: Vec<CartItem>) -> Order {
        Order {
            id: id.to_string(),
            date: "Jan 01, 2026".to_string(),
            items,
            totals: OrderTotals {
                grand_total_usd: 10.0,
                grand_total: 906.5,
            },
            customer_name: "asha".to_string(),
            customer_address: "12 mg road".to_string(),
        }
    }

    #[test]
    fn test_resolve_index_bounds() {
        assert_eq!(resolve_index(1, 2), Some(0));
        assert_eq!(resolve_index(2, 2), Some(1));
        assert_eq!(resolve_index(0, 2), None);
        assert_eq!(resolve_index(3, 2), None);
        assert_eq!(resolve_index(-1, 2), None);
        assert_eq!(resolve_index(i64::MIN, 2), None);
        assert_eq!(resolve_index(1, 0), None);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut session = session_with_items(2);
        assert_eq!(session.remove_item(0), Err(StoreError::InvalidItemNumber));
        assert_eq!(session.remove_item(99), Err(StoreError::InvalidItemNumber));
        assert_eq!(session.cart().len(), 2);
    }

    #[test]
    fn test_remove_last_item_empties_cart() {
        let mut session = session_with_items(1);
        let removed = session.remove_item(1).unwrap();
        assert_eq!(removed.product.title, "Item 1");
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_update_sets_quantity() {
        let mut session = session_with_items(1);
        session.cart[0].quantity = 3;
        let item = session.update_quantity(1, 5).unwrap();
        assert_eq!(item.quantity, 5);
    }

    #[test]
    fn test_update_rejects_zero_before_index() {
        let mut session = session_with_items(1);
        assert_eq!(session.update_quantity(9, 0), Err(StoreError::InvalidQuantity));
        assert_eq!(session.update_quantity(9, 2), Err(StoreError::InvalidItemNumber));
    }

    #[test]
    fn test_discount_codes() {
        assert_eq!(DiscountCode::parse("save10"), Some(DiscountCode::Save10));
        assert_eq!(DiscountCode::parse("FreeShip"), Some(DiscountCode::Freeship));
        assert_eq!(DiscountCode::parse("save20"), None);

        let mut session = SessionState::default();
        session.apply_discount(DiscountCode::Freeship);
        session.apply_discount(DiscountCode::Save10);
        assert_eq!(session.discount.percent(), 10);
        assert!(session.discount.free_shipping);
    }

    #[test]
    fn test_place_order_resets_checkout_state() {
        let mut session = session_with_items(2);
        session.apply_discount(DiscountCode::Save10);
        session.apply_discount(DiscountCode::Freeship);
        session.customer_name = Some("asha".to_string());
        session.customer_address = Some("12 mg road".to_string());

        let snapshot = session.cart.clone();
        session.place_order(order("ORD12345", snapshot));

        assert_eq!(session.orders().len(), 1);
        assert!(session.cart().is_empty());
        assert_eq!(session.discount, DiscountState::default());
        assert!(session.customer_name.is_none());
        assert!(session.customer_address.is_none());
        assert_eq!(session.orders()[0].items.len(), 2);
    }

    #[test]
    fn test_order_snapshot_independent_of_cart() {
        let mut session = session_with_items(1);
        session.place_order(order("ORD11111", session.cart.clone()));
        session.add_item(CartItem::new(product(9, "Late add", "misc", None, 1.0), 4));
        session.update_quantity(1, 7).unwrap();
        assert_eq!(session.orders()[0].items[0].quantity, 1);
        assert_eq!(session.orders()[0].items[0].product.title, "Item 1");
    }

    #[test]
    fn test_cancel_order() {
        let mut session = SessionState::default();
        session.place_order(order("ORD10001", vec![]));
        session.place_order(order("ORD10002", vec![]));

        assert_eq!(session.cancel_order(3), Err(StoreError::InvalidOrderNumber));
        let cancelled = session.cancel_order(1).unwrap();
        assert_eq!(cancelled.id, "ORD10001");
        assert_eq!(session.orders()[0].id, "ORD10002");
    }

    #[test]
    fn test_cart_item_serializes_flat() {
        let item = CartItem::new(product(1, "Widget", "misc", Some("Acme"), 2.5), 3);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["title"], "Widget");
        assert_eq!(value["quantity"], 3);
        let back: CartItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_zero_quantity_is_rejected_on_load() {
        let mut value =
            serde_json::to_value(CartItem::new(product(1, "Widget", "misc", None, 2.5), 1)).unwrap();
        value["quantity"] = serde_json::json!(0);
        let err = serde_json::from_value::<CartItem>(value).unwrap_err();
        assert!(err.to_string().contains("Quantity must be > 0."));
    }

    #[test]
    fn test_discount_rate_must_be_known() {
        let loaded: DiscountState =
            serde_json::from_value(serde_json::json!({ "rate": 0.1, "free_shipping": true })).unwrap();
        assert_eq!(loaded.percent(), 10);
        assert!(loaded.free_shipping);

        let loaded: DiscountState =
            serde_json::from_value(serde_json::json!({ "rate": 0.0, "free_shipping": false })).unwrap();
        assert_eq!(loaded, DiscountState::default());

        for rate in [1.5, -0.1, 0.2] {
            let result = serde_json::from_value::<DiscountState>(
                serde_json::json!({ "rate": rate, "free_shipping": false }),
            );
            assert!(result.is_err(), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_forged_session_is_rejected() {
        let forged = serde_json::json!({
            "cart": [{
                "id": 1, "title": "X", "category": "misc", "price": 30.0,
                "rating": { "rate": 4.0, "count": 1 }, "quantity": 0
            }],
            "discount": { "rate": 0.1, "free_shipping": false }
        });
        assert!(serde_json::from_value::<SessionState>(forged).is_err());
    }
}
