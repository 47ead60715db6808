//! Context provided to precondition checks.

use crate::core::RoverState;

/// Read-only view of the rover taken at the start of an operation.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandContext {
    pub operation: &'static str,
    pub state: RoverState,
    pub mission_active: bool,
    pub archived_missions: usize,
}

impl CommandContext {
    pub fn new(operation: &'static str, state: RoverState) -> Self {
        Self {
            operation,
            state,
            mission_active: false,
            archived_missions: 0,
        }
    }

    pub fn with_mission_active(mut self, active: bool) -> Self {
        self.mission_active = active;
        self
    }

    pub fn with_archived_missions(mut self, count: usize) -> Self {
        self.archived_missions = count;
        self
    }
}
