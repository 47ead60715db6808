//! Validation-based preconditions for orchestrator operations.
//!
//! The transition table says which commands a state accepts; these rules
//! cover what the table cannot express, such as "only one mission in flight"
//! or "redelivery needs a previous mission". Checks run against a
//! `CommandContext` snapshot and use Stillwater's `Validation` so that every
//! failed rule is reported, not just the first.
//!
//! # Example
//!
//! ```rust
//! use courier::core::RoverState;
//! use courier::enforcement::{CommandContext, Preconditions};
//!
//! let rules = Preconditions::new()
//!     .require_state(RoverState::Idle)
//!     .require_no_active_mission();
//!
//! let context = CommandContext::new("start mission", RoverState::Idle);
//! assert!(rules.check(&context).is_ok());
//!
//! let busy = CommandContext::new("start mission", RoverState::Navigating)
//!     .with_mission_active(true);
//! assert_eq!(rules.check(&busy).unwrap_err().violations().len(), 2);
//! ```

pub mod context;
pub mod rules;
pub mod violations;

pub use context::CommandContext;
pub use rules::{PreconditionCheck, Preconditions};
pub use violations::PreconditionViolation;
