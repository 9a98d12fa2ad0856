//! Dialogue state machine
//!
//! Each shopper message runs through the pure [`transition`] function:
//! global commands first, then the handler for the current [`Step`]. Session
//! changes come back as [`Effect`]s for the runtime to apply.

mod command;
mod effect;
mod input;
mod reply;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

#[cfg(test)]
pub use effect::apply_all;
pub use effect::Effect;
pub use input::UserInput;
pub use state::{DialogueState, Step, TurnContext};
pub use transition::transition;
