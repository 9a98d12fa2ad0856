//! Pure state transition function
//!
//! Given the same state, session, catalog, context and input, `transition`
//! always produces the same reply, next state and effects. Session changes
//! are returned as [`Effect`]s rather than applied here.

use super::command::{GlobalCommand, NumberArg};
use super::input::UserInput;
use super::reply;
use super::state::{DialogueState, Step, TurnContext};
use super::Effect;
use crate::catalog::{title_case, CatalogStore};
use crate::pricing::compute_totals;
use crate::session::{resolve_index, CartItem, DiscountCode, Order, OrderTotals, SessionState};

/// Result of a state transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    pub reply: String,
    pub new_state: DialogueState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(reply: impl Into<String>, state: DialogueState) -> Self {
        Self {
            reply: reply.into(),
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Read-only view of everything a handler may consult
struct Turn<'a> {
    state: &'a DialogueState,
    session: &'a SessionState,
    catalog: &'a dyn CatalogStore,
    ctx: &'a TurnContext,
    input: &'a UserInput,
}

impl Turn<'_> {
    /// Reply without changing step or session
    fn stay(&self, reply: impl Into<String>) -> TransitionResult {
        TransitionResult::new(reply, self.state.clone())
    }

    fn goto(&self, step: Step, reply: impl Into<String>) -> TransitionResult {
        TransitionResult::new(reply, self.state.with_step(step))
    }
}

/// Process one turn of shopper input.
///
/// Global commands are checked first at every step; only if none matches
/// does the current step's handler run. Anything left unhandled gets the
/// generic "didn't understand" reply with the step unchanged.
pub fn transition(
    state: &DialogueState,
    session: &SessionState,
    catalog: &dyn CatalogStore,
    ctx: &TurnContext,
    input: &UserInput,
) -> TransitionResult {
    let turn = Turn {
        state,
        session,
        catalog,
        ctx,
        input,
    };

    if let Some(command) = GlobalCommand::parse(input.as_str()) {
        return handle_global(&turn, command);
    }

    let handled = match state.step {
        Step::Start => None,
        Step::SelectCategory => Some(select_category(&turn)),
        Step::SelectProduct => Some(select_product(&turn)),
        Step::ConfirmPurchase => confirm_purchase(&turn),
        Step::Quantity => Some(quantity(&turn)),
        Step::SearchProduct => Some(search_product(&turn)),
        Step::CheckoutName => Some(checkout_name(&turn)),
        Step::CheckoutAddress => Some(checkout_address(&turn)),
    };

    handled.unwrap_or_else(|| turn.stay(reply::DIDNT_UNDERSTAND))
}

// ============================================================
// Global commands
// ============================================================

fn handle_global(turn: &Turn<'_>, command: GlobalCommand) -> TransitionResult {
    match command {
        GlobalCommand::Greet => greet(turn),
        GlobalCommand::Help => turn.stay(reply::HELP),
        GlobalCommand::ShowCart => show_cart(turn),
        GlobalCommand::ClearCart => turn
            .stay("Cart cleared! Type 'hi' to shop again.")
            .with_effect(Effect::ClearCart),
        GlobalCommand::ListOrders => list_orders(turn),
        GlobalCommand::CancelOrder(arg) => cancel_order(turn, arg),
        GlobalCommand::Remove(arg) => remove_item(turn, arg),
        GlobalCommand::Update { item, quantity } => update_item(turn, item, quantity),
        GlobalCommand::Apply(code) => apply_code(turn, &code),
        GlobalCommand::Cancel => cancel_checkout(turn),
        GlobalCommand::Search => turn.goto(
            Step::SearchProduct,
            "What are you looking for? Type a keyword:",
        ),
        GlobalCommand::Checkout => checkout(turn),
    }
}

/// List categories and start browsing from scratch.
fn greet(turn: &Turn<'_>) -> TransitionResult {
    TransitionResult::new(
        reply::greeting(&turn.ctx.shopper_name, turn.catalog.categories()),
        DialogueState::at(Step::SelectCategory),
    )
}

fn show_cart(turn: &Turn<'_>) -> TransitionResult {
    let cart = turn.session.cart();
    if cart.is_empty() {
        return turn.stay("Your cart is empty.");
    }
    turn.stay(reply::cart_summary(cart, &turn.session.discount))
}

fn list_orders(turn: &Turn<'_>) -> TransitionResult {
    let orders = turn.session.orders();
    if orders.is_empty() {
        return turn.stay("You have no past orders.");
    }
    turn.stay(reply::orders_list(orders))
}

fn cancel_order(turn: &Turn<'_>, arg: NumberArg) -> TransitionResult {
    let number = match arg {
        NumberArg::Missing => {
            return turn.stay(
                "Please specify the order number.\n\
                 Type 'orders' to see the list, then 'cancel order 1' (replace 1 with the number).",
            )
        }
        NumberArg::Invalid => {
            return turn.stay("Please use a valid number (e.g., 'cancel order 1').")
        }
        NumberArg::Number(n) => n,
    };

    let orders = turn.session.orders();
    match resolve_index(number, orders.len()) {
        Some(idx) => turn
            .stay(format!(
                "Order {} has been cancelled and removed.",
                orders[idx].id
            ))
            .with_effect(Effect::CancelOrder { number }),
        None => turn.stay("Invalid order number."),
    }
}

fn remove_item(turn: &Turn<'_>, arg: NumberArg) -> TransitionResult {
    let Some(number) = arg.number() else {
        return turn.stay("Usage: remove <number>");
    };

    let cart = turn.session.cart();
    match resolve_index(number, cart.len()) {
        Some(idx) => turn
            .stay(format!("Removed {} from cart.", cart[idx].product.title))
            .with_effect(Effect::RemoveCartItem { number }),
        None => turn.stay("Invalid item number."),
    }
}

fn update_item(turn: &Turn<'_>, item: NumberArg, quantity: NumberArg) -> TransitionResult {
    const USAGE: &str = "Usage: update <number> <new quantity>";

    let (Some(number), Some(quantity)) = (item.number(), quantity.number()) else {
        return turn.stay(USAGE);
    };
    if quantity <= 0 {
        return turn.stay("Quantity must be > 0.");
    }
    let Ok(quantity) = u32::try_from(quantity) else {
        return turn.stay(USAGE);
    };
    if resolve_index(number, turn.session.cart().len()).is_none() {
        return turn.stay("Invalid item number.");
    }

    turn.stay(format!("Updated to {quantity} unit(s)."))
        .with_effect(Effect::UpdateQuantity { number, quantity })
}

fn apply_code(turn: &Turn<'_>, code: &str) -> TransitionResult {
    match DiscountCode::parse(code) {
        Some(DiscountCode::Save10) => turn
            .stay("✅ 10% discount applied! (SAVE10)")
            .with_effect(Effect::ApplyDiscount(DiscountCode::Save10)),
        Some(DiscountCode::Freeship) => turn
            .stay("✅ Free shipping applied! (FREESHIP)")
            .with_effect(Effect::ApplyDiscount(DiscountCode::Freeship)),
        None => turn.stay("Invalid code. Try SAVE10 or FREESHIP."),
    }
}

fn cancel_checkout(turn: &Turn<'_>) -> TransitionResult {
    if turn.state.step.is_checkout() {
        let new_state = DialogueState {
            step: Step::Start,
            checkout_temp: None,
            ..turn.state.clone()
        };
        return TransitionResult::new("Checkout cancelled.", new_state);
    }
    turn.stay("Nothing to cancel.")
}

/// Price the cart, freeze the breakdown and ask for the customer name.
fn checkout(turn: &Turn<'_>) -> TransitionResult {
    let cart = turn.session.cart();
    if cart.is_empty() {
        return turn.stay("Your cart is empty!");
    }

    let totals = compute_totals(cart, &turn.session.discount);
    let new_state = DialogueState {
        step: Step::CheckoutName,
        checkout_temp: Some(totals),
        ..turn.state.clone()
    };
    TransitionResult::new(reply::checkout_summary(cart, &totals), new_state)
}

// ============================================================
// Step handlers
// ============================================================

fn select_category(turn: &Turn<'_>) -> TransitionResult {
    let wanted = turn.input.as_str().replace(' ', "-");
    let Some(category) = turn.catalog.find_category(&wanted) else {
        return turn.stay("Category not found. Type 'hi' to see available categories.");
    };

    let products = turn.catalog.products_in(category);
    if products.is_empty() {
        return turn.stay("No products in this category yet.");
    }

    let text = format!(
        "Products in {}:\n{}\n\nType a number for details:",
        title_case(turn.input.as_str()),
        reply::product_list(&products)
    );
    let new_state = DialogueState {
        step: Step::SelectProduct,
        catalog: products,
        ..turn.state.clone()
    };
    TransitionResult::new(text, new_state)
}

fn select_product(turn: &Turn<'_>) -> TransitionResult {
    let picked = turn
        .input
        .positive_number()
        .and_then(|n| turn.state.catalog.get(n as usize - 1));

    let Some(product) = picked else {
        return turn.stay("Please type a valid number.");
    };

    let new_state = DialogueState {
        step: Step::ConfirmPurchase,
        selected_product: Some(product.clone()),
        ..turn.state.clone()
    };
    TransitionResult::new(reply::product_card(product), new_state)
}

/// `buy` or `back`; anything else is left unhandled.
fn confirm_purchase(turn: &Turn<'_>) -> Option<TransitionResult> {
    match turn.input.as_str() {
        "buy" => Some(match &turn.state.selected_product {
            Some(product) => turn.goto(
                Step::Quantity,
                format!("How many {} do you want?", product.title),
            ),
            None => greet(turn),
        }),
        "back" => Some(greet(turn)),
        _ => None,
    }
}

fn quantity(turn: &Turn<'_>) -> TransitionResult {
    let Some(product) = &turn.state.selected_product else {
        return TransitionResult::new(
            "No product selected. Type 'hi' to browse.",
            DialogueState::at(Step::Start),
        );
    };
    let Some(quantity) = turn.input.positive_number() else {
        return turn.stay("Please enter a valid quantity.");
    };

    let new_state = DialogueState {
        step: Step::Start,
        selected_product: None,
        ..turn.state.clone()
    };
    TransitionResult::new(
        format!(
            "Added {quantity} × {} to cart! 🛒\n\
             Type 'cart' to review or 'checkout' to buy.",
            product.title
        ),
        new_state,
    )
    .with_effect(Effect::AddToCart(CartItem::new(product.clone(), quantity)))
}

fn search_product(turn: &Turn<'_>) -> TransitionResult {
    let keyword = turn.input.as_str();
    let matches = turn.catalog.search(keyword);
    if matches.is_empty() {
        return turn.goto(Step::Start, "No matches found. Type 'hi' to browse.");
    }

    let text = format!(
        "Search results for '{keyword}':\n{}\nType a number:",
        reply::product_list(&matches)
    );
    let new_state = DialogueState {
        step: Step::SelectProduct,
        catalog: matches,
        ..turn.state.clone()
    };
    TransitionResult::new(text, new_state)
}

fn checkout_name(turn: &Turn<'_>) -> TransitionResult {
    turn.goto(
        Step::CheckoutAddress,
        "Great! Now enter your full shipping address (street, city, state, PIN):",
    )
    .with_effect(Effect::SetCustomerName(turn.input.raw.clone()))
}

/// Place the order using the breakdown frozen at `checkout`.
fn checkout_address(turn: &Turn<'_>) -> TransitionResult {
    let cart = turn.session.cart();
    let done = DialogueState::at(Step::Start);
    if cart.is_empty() {
        return TransitionResult::new("Your cart is empty!", done);
    }

    let totals = turn
        .state
        .checkout_temp
        .unwrap_or_else(|| compute_totals(cart, &turn.session.discount));
    let address = turn.input.raw.clone();
    let order = Order {
        id: turn.ctx.order_id.clone(),
        date: turn.ctx.order_date.clone(),
        items: cart.to_vec(),
        totals: OrderTotals::from(&totals),
        customer_name: turn.session.customer_name.clone().unwrap_or_default(),
        customer_address: address.clone(),
    };

    TransitionResult::new(
        reply::order_confirmation(&order, &totals, &turn.ctx.shopper_name),
        done,
    )
    .with_effect(Effect::SetCustomerAddress(address))
    .with_effect(Effect::PlaceOrder(order))
}
