//! Core state machine types and logic.
//!
//! This module contains the pure core of the rover:
//! - State and command vocabulary
//! - The transition table
//! - Guard predicates for deferred transitions
//! - The state store and its bounded history
//!
//! Nothing here schedules work or talks to subsystems; the orchestrator is
//! the only caller that mutates a `StateStore`.

mod command;
mod guard;
mod history;
mod state;
mod store;
mod transition;

pub use command::Command;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition, STATE_HISTORY_CAPACITY};
pub use state::{RoverState, State};
pub use store::StateStore;
pub use transition::{transition, valid_commands, TransitionResult};
