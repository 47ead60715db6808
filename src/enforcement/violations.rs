//! Business-rule violations.

use crate::core::RoverState;
use thiserror::Error;

/// A rule beyond the transition table that an operation did not satisfy.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PreconditionViolation {
    #[error("cannot {operation}: rover is {actual}, expected {expected}")]
    WrongState {
        operation: &'static str,
        expected: RoverState,
        actual: RoverState,
    },

    #[error("a mission is already active")]
    MissionAlreadyActive,

    #[error("no previous mission to redeliver")]
    NoPreviousMission,

    #[error("unknown motor {motor_id}")]
    UnknownMotor { motor_id: u8 },
}
