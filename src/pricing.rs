//! Cart pricing
//!
//! Catalog prices are USD; everything shown to the shopper is converted to
//! the display currency (INR) first. Rounding happens only when formatting.

use crate::session::{CartItem, DiscountState};
use serde::{Deserialize, Serialize};

/// Display-currency units per USD
pub const EXCHANGE_RATE: f64 = 90.65;

/// Display-currency glyph
pub const CURRENCY_SYMBOL: &str = "₹";

/// Orders at or above this amount (after discount, display currency) ship free
pub const FREE_SHIPPING_THRESHOLD: f64 = 2000.0;

/// Flat shipping fee in display currency
pub const FLAT_SHIPPING_FEE: f64 = 99.0;

/// GST applied on discounted subtotal plus shipping
pub const TAX_RATE: f64 = 0.18;

/// Price breakdown for a cart. All amounts except `subtotal_usd` are in
/// display currency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal_usd: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub after_discount: f64,
    pub shipping: f64,
    pub tax: f64,
    pub grand_total: f64,
}

impl Totals {
    pub fn ships_free(&self) -> bool {
        self.shipping == 0.0
    }

    /// Grand total expressed back in store currency
    pub fn grand_total_usd(&self) -> f64 {
        self.grand_total / EXCHANGE_RATE
    }
}

/// Compute the full price breakdown for `items` under `discount`.
pub fn compute_totals(items: &[CartItem], discount: &DiscountState) -> Totals {
    let subtotal_usd: f64 = items.iter().map(CartItem::line_total_usd).sum();
    let subtotal = subtotal_usd * EXCHANGE_RATE;
    let discount_amount = subtotal * discount.rate;
    let after_discount = subtotal - discount_amount;
    let shipping = if discount.free_shipping || after_discount >= FREE_SHIPPING_THRESHOLD {
        0.0
    } else {
        FLAT_SHIPPING_FEE
    };
    let tax = (after_discount + shipping) * TAX_RATE;

    Totals {
        subtotal_usd,
        subtotal,
        discount_amount,
        after_discount,
        shipping,
        tax,
        grand_total: after_discount + shipping + tax,
    }
}

/// `₹1234.50`
pub fn format_money(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

/// Convert a USD amount and format it in display currency.
pub fn format_usd(amount_usd: f64) -> String {
    format_money(amount_usd * EXCHANGE_RATE)
}
