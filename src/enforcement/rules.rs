//! Precondition rules for orchestrator operations using Validation.

use crate::core::RoverState;
use crate::enforcement::context::CommandContext;
use crate::enforcement::violations::PreconditionViolation;
use crate::error::OrchestratorError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for precondition check functions
pub type PreconditionCheck = Box<
    dyn Fn(&CommandContext) -> Validation<(), NonEmptyVec<PreconditionViolation>> + Send + Sync,
>;

/// A set of checks run before an operation consults the transition table.
/// Every check runs; failures are accumulated rather than short-circuited.
pub struct Preconditions {
    checks: Vec<PreconditionCheck>,
}

impl Preconditions {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&CommandContext) -> Validation<(), NonEmptyVec<PreconditionViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a predicate check that reports `violation` when it fails
    pub fn require_pred<F>(self, predicate: F, violation: PreconditionViolation) -> Self
    where
        F: Fn(&CommandContext) -> bool + Send + Sync + 'static,
    {
        self.require(move |ctx| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(violation.clone())
            }
        })
    }

    /// The rover must currently be in `expected`.
    pub fn require_state(self, expected: RoverState) -> Self {
        self.require(move |ctx| {
            if ctx.state == expected {
                Validation::success(())
            } else {
                Validation::fail(PreconditionViolation::WrongState {
                    operation: ctx.operation,
                    expected,
                    actual: ctx.state,
                })
            }
        })
    }

    /// The active mission slot must be empty.
    pub fn require_no_active_mission(self) -> Self {
        self.require_pred(
            |ctx| !ctx.mission_active,
            PreconditionViolation::MissionAlreadyActive,
        )
    }

    /// At least one mission must have been archived.
    pub fn require_archived_mission(self) -> Self {
        self.require_pred(
            |ctx| ctx.archived_missions > 0,
            PreconditionViolation::NoPreviousMission,
        )
    }

    /// Run every check, accumulating ALL violations.
    pub fn enforce(
        &self,
        context: &CommandContext,
    ) -> Validation<(), NonEmptyVec<PreconditionViolation>> {
        let checks: Vec<Validation<(), NonEmptyVec<PreconditionViolation>>> =
            self.checks.iter().map(|check| check(context)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Enforce and convert a failure into the orchestrator's error type.
    pub fn check(&self, context: &CommandContext) -> Result<(), OrchestratorError> {
        match self.enforce(context) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => Err(OrchestratorError::PreconditionFailed(
                violations.iter().cloned().collect(),
            )),
        }
    }
}

impl Default for Preconditions {
    fn default() -> Self {
        Self::new()
    }
}
