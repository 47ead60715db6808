//! Errors reported by orchestrator operations.

use crate::core::{Command, RoverState};
use crate::enforcement::PreconditionViolation;
use thiserror::Error;
use uuid::Uuid;

/// Internal consistency breach. Unreachable when the orchestrator sequences
/// its calls correctly; surfaced as a fatal error, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("mission {mission_id} is already active")]
    MissionAlreadyActive { mission_id: Uuid },
}

/// Why an orchestrator operation was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestratorError {
    /// The command is not in the transition table for the current state.
    #[error("invalid transition: {state} -> {command}")]
    InvalidTransition { state: RoverState, command: Command },

    /// A business rule beyond the transition table failed.
    #[error("{}", describe(.0))]
    PreconditionFailed(Vec<PreconditionViolation>),

    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl OrchestratorError {
    /// Invalid transitions and failed preconditions leave the rover untouched
    /// and may be retried by the caller. Invariant breaches may not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Invariant(_))
    }

    pub fn violations(&self) -> &[PreconditionViolation] {
        match self {
            Self::PreconditionFailed(violations) => violations,
            _ => &[],
        }
    }
}

fn describe(violations: &[PreconditionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
