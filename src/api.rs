//! HTTP API for the chat shop
//!
//! A thin transport over [`crate::runtime::ChatEngine`]; all dialogue logic
//! lives in the state machine.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::{InMemorySessionStore, ProductionEngine};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProductionEngine>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl AppState {
    pub fn new(engine: ProductionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }
}
