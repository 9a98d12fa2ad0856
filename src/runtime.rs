//! Runtime for chat turns
//!
//! Wraps the pure state machine: normalizes input, supplies the per-turn
//! context, applies effects to the session and hands back the new blob.

mod engine;
mod store;
pub mod traits;

pub use engine::ChatEngine;
pub use store::InMemorySessionStore;
pub use traits::SessionStore;

use crate::catalog::JsonCatalog;
use crate::session::SessionState;
use crate::state_machine::DialogueState;
use serde::{Deserialize, Serialize};

/// Engine over the file-backed catalog
pub type ProductionEngine = ChatEngine<JsonCatalog>;

/// Everything carried between turns for one shopper.
///
/// Opaque to clients; they send back whatever they last received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionBlob {
    #[serde(default)]
    pub dialogue: DialogueState,
    #[serde(default)]
    pub session: SessionState,
}

/// Reply for one turn plus the state to carry into the next
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    pub reply: String,
    pub blob: SessionBlob,
}
