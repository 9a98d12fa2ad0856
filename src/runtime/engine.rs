//! Chat turn engine

use super::{SessionBlob, TurnOutput};
use crate::catalog::CatalogStore;
use crate::session::Order;
use crate::state_machine::{transition, Effect, TurnContext, UserInput};
use rand::Rng;
use std::sync::Arc;

/// Format for dates stamped on orders, e.g. `Jan 02, 2026`
const ORDER_DATE_FORMAT: &str = "%b %d, %Y";

/// Runs chat turns against a catalog
pub struct ChatEngine<C: CatalogStore> {
    catalog: Arc<C>,
    shopper_name: String,
}

impl<C: CatalogStore> ChatEngine<C> {
    pub fn new(catalog: Arc<C>, shopper_name: impl Into<String>) -> Self {
        Self {
            catalog,
            shopper_name: shopper_name.into(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Process one shopper message against the state from the previous turn.
    pub fn handle_turn(&self, message: &str, blob: SessionBlob) -> TurnOutput {
        let ctx = TurnContext::new(
            self.shopper_name.clone(),
            unused_order_id(blob.session.orders(), random_order_id),
            chrono::Local::now().format(ORDER_DATE_FORMAT).to_string(),
        );
        self.handle_turn_with(message, blob, &ctx)
    }

    /// Same as [`handle_turn`](Self::handle_turn) with a caller-supplied context.
    pub fn handle_turn_with(
        &self,
        message: &str,
        blob: SessionBlob,
        ctx: &TurnContext,
    ) -> TurnOutput {
        let SessionBlob {
            dialogue,
            mut session,
        } = blob;
        let input = UserInput::new(message);

        let result = transition(&dialogue, &session, self.catalog.as_ref(), ctx, &input);

        tracing::debug!(
            from = %dialogue.step,
            to = %result.new_state.step,
            effects = result.effects.len(),
            "Turn processed"
        );

        for effect in result.effects {
            let kind = effect.kind();
            if let Effect::PlaceOrder(order) = &effect {
                tracing::info!(
                    order_id = %order.id,
                    items = order.items.len(),
                    grand_total = order.totals.grand_total,
                    "Placing order"
                );
            }
            if let Err(e) = effect.apply(&mut session) {
                // Transitions check preconditions against this same session
                tracing::warn!(effect = kind, error = %e, "Failed to apply effect");
                continue;
            }
            tracing::info!(effect = kind, "Applied effect");
        }

        TurnOutput {
            reply: result.reply,
            blob: SessionBlob {
                dialogue: result.new_state,
                session,
            },
        }
    }
}

/// `ORD` followed by five random digits
fn random_order_id() -> String {
    let n: u32 = rand::thread_rng().gen_range(10_000..=99_999);
    format!("ORD{n}")
}

/// Draw ids until one is not already taken by an order in this session.
fn unused_order_id(orders: &[Order], mut generate: impl FnMut() -> String) -> String {
    loop {
        let id = generate();
        if orders.iter().all(|order| order.id != id) {
            return id;
        }
        tracing::debug!(order_id = %id, "Order id already used, drawing again");
    }
}
