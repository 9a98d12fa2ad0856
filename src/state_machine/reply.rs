//! Reply text rendering

use crate::catalog::{display_category, Product};
use crate::pricing::{compute_totals, format_money, format_usd, Totals};
use crate::session::{CartItem, DiscountState, Order};
use std::fmt::Write;

pub const HELP: &str = "Available commands anytime:\n\
    - hi: show categories\n\
    - cart: view cart\n\
    - checkout: proceed to payment\n\
    - clear cart: empty cart\n\
    - remove <num>: remove item from cart\n\
    - update <num> <qty>: change quantity\n\
    - apply SAVE10 / apply FREESHIP: discount codes\n\
    - orders: view past orders\n\
    - cancel order <num>: cancel a past order (e.g., cancel order 1)\n\
    - search: keyword search\n\
    - cancel: abort checkout";

pub const DIDNT_UNDERSTAND: &str = "I didn't understand. Type 'help' for commands.";

pub fn greeting(shopper_name: &str, categories: &[String]) -> String {
    let list = categories
        .iter()
        .map(|c| format!("• {}", display_category(c)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Hi {shopper_name}! Welcome to the store 🇮🇳\n\n\
         Available Categories:\n{list}\n\n\
         Type a category name to browse (e.g., 'laptops' or 'laptop accessories')\n\
         Or type 'help' for all commands."
    )
}

/// `1. Title - ₹123.45` per product
pub fn product_list(products: &[Product]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} - {}", i + 1, p.title, format_usd(p.price)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn product_card(product: &Product) -> String {
    format!(
        "📱 {}\n\
         Brand: {}\n\
         Price: {}\n\
         Rating: {}/5 ({} reviews)\n\
         {}\n\
         Image: {}\n\n\
         Type 'buy' to add to cart or 'back' to category.",
        product.title,
        product.brand_or_na(),
        format_usd(product.price),
        product.rating.rate,
        product.rating.count,
        product.description,
        product.image,
    )
}

fn item_line(item: &CartItem) -> String {
    format!(
        "{} (x{}) - {}",
        item.product.title,
        item.quantity,
        format_usd(item.line_total_usd())
    )
}

fn bulleted_items(cart: &[CartItem]) -> String {
    cart.iter()
        .map(|item| format!("• {}", item_line(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn shipping_line(totals: &Totals) -> String {
    if totals.ships_free() {
        format!("Shipping: {} (FREE! 🚚)", format_money(totals.shipping))
    } else {
        format!("Shipping: {}", format_money(totals.shipping))
    }
}

pub fn cart_summary(cart: &[CartItem], discount: &DiscountState) -> String {
    let totals = compute_totals(cart, discount);
    let lines = cart
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item_line(item)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🛒 Your Cart:\n{lines}\n\n\
         Subtotal: {}\n\
         Discount: {}% → -{}\n\
         After discount: {}\n\
         {}\n\n\
         Type 'checkout' to buy or continue shopping.",
        format_money(totals.subtotal),
        discount.percent(),
        format_money(totals.discount_amount),
        format_money(totals.after_discount),
        shipping_line(&totals),
    )
}

pub fn checkout_summary(cart: &[CartItem], totals: &Totals) -> String {
    format!(
        "--- CHECKOUT SUMMARY ---\n{}\n\n\
         Subtotal: {}\n\
         Discount: -{}\n\
         {}\n\
         GST (18%): {}\n\
         Grand Total: {}\n\n\
         Please enter your full name:",
        bulleted_items(cart),
        format_money(totals.subtotal),
        format_money(totals.discount_amount),
        shipping_line(totals),
        format_money(totals.tax),
        format_money(totals.grand_total),
    )
}

pub fn order_confirmation(order: &Order, totals: &Totals, shopper_name: &str) -> String {
    format!(
        "🎉 ORDER CONFIRMED!\n\
         Order ID: {}\n\
         Name: {}\n\
         Delivery: {}\n\n\
         {}\n\n\
         Subtotal: {}\n\
         Discount: -{}\n\
         Shipping: {}\n\
         GST: {}\n\
         Total Paid: {}\n\n\
         Thank you {shopper_name}! Your order will arrive in 3-5 days 🚚",
        order.id,
        order.customer_name,
        order.customer_address,
        bulleted_items(&order.items),
        format_money(totals.subtotal),
        format_money(totals.discount_amount),
        format_money(totals.shipping),
        format_money(totals.tax),
        format_money(totals.grand_total),
    )
}

pub fn orders_list(orders: &[Order]) -> String {
    let mut out = String::from("Your Orders:\n");
    for (i, order) in orders.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. Order {} ({}) → {}",
            i + 1,
            order.id,
            order.date,
            format_money(order.totals.grand_total)
        );
    }
    out.push_str("\nTo cancel an order, type 'cancel order <number>'");
    out
}
