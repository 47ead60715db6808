//! The rover's transition table.
//!
//! `transition` is a pure function of `(state, command)`: it never touches
//! the store, so callers may consult it speculatively before committing.

use super::command::Command;
use super::state::RoverState;
use std::fmt;

/// Outcome of looking up a `(state, command)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionResult {
    /// The command is permitted; move to this state.
    Accepted(RoverState),

    /// The command is not in the table for this state.
    Rejected {
        state: RoverState,
        command: Command,
    },
}

impl TransitionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The state the rover would be in afterwards. A rejection leaves it unchanged.
    pub fn resulting_state(&self) -> RoverState {
        match self {
            Self::Accepted(to) => *to,
            Self::Rejected { state, .. } => *state,
        }
    }

    /// Human-readable rejection reason naming the offending pair.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected { state, command } => {
                Some(format!("invalid transition: {} -> {}", state, command))
            }
        }
    }
}

impl fmt::Display for TransitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(to) => write!(f, "accepted -> {}", to),
            Self::Rejected { state, command } => {
                write!(f, "invalid transition: {} -> {}", state, command)
            }
        }
    }
}

/// Look up the destination for `command` issued in `state`.
///
/// `Command::Error` is accepted everywhere and always lands in
/// `RoverState::Error`. Manual override interrupts any state that is neither
/// final nor already manual.
///
/// # Example
///
/// ```rust
/// use courier::core::{transition, Command, RoverState, TransitionResult};
///
/// assert_eq!(
///     transition(RoverState::Idle, Command::StartMission),
///     TransitionResult::Accepted(RoverState::Navigating),
/// );
/// assert!(!transition(RoverState::Idle, Command::OpenCompartment).is_accepted());
/// assert_eq!(
///     transition(RoverState::Completed, Command::Error).resulting_state(),
///     RoverState::Error,
/// );
/// ```
pub fn transition(state: RoverState, command: Command) -> TransitionResult {
    use Command as C;
    use RoverState as S;

    if command == C::Error {
        return TransitionResult::Accepted(S::Error);
    }

    let next = match state {
        S::Idle => match command {
            C::StartMission => Some(S::Navigating),
            C::ManualOverride => Some(S::ManualControl),
            _ => None,
        },
        S::Navigating => match command {
            C::Arrive => Some(S::Arrived),
            C::ManualOverride => Some(S::ManualControl),
            _ => None,
        },
        S::Arrived => match command {
            C::NotifyUser => Some(S::WaitingForUser),
            C::ManualOverride => Some(S::ManualControl),
            _ => None,
        },
        S::WaitingForUser => match command {
            C::OpenCompartment => Some(S::DeliveryWindow),
            C::Timeout | C::Return => Some(S::ReturningHome),
            C::ManualOverride => Some(S::ManualControl),
            _ => None,
        },
        S::DeliveryWindow => match command {
            C::CloseCompartment => Some(S::Completed),
            C::ManualOverride => Some(S::ManualControl),
            _ => None,
        },
        S::ReturningHome => match command {
            C::Arrive => Some(S::Idle),
            C::ManualOverride => Some(S::ManualControl),
            _ => None,
        },
        S::ManualControl => match command {
            C::Stop => Some(S::Idle),
            C::ManualMove => Some(S::ManualControl),
            _ => None,
        },
        S::Completed | S::Error => match command {
            C::Reset => Some(S::Idle),
            _ => None,
        },
    };

    match next {
        Some(to) => TransitionResult::Accepted(to),
        None => TransitionResult::Rejected { state, command },
    }
}

/// Commands accepted in `state`, in declaration order (`ERROR` last).
pub fn valid_commands(state: RoverState) -> Vec<Command> {
    Command::ALL
        .into_iter()
        .filter(|command| transition(state, *command).is_accepted())
        .collect()
}
