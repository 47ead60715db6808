//! Commands that drive the rover state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trigger for a state transition, issued externally or by a timer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    StartMission,
    Arrive,
    NotifyUser,
    OpenCompartment,
    CloseCompartment,
    Timeout,
    Return,
    ManualOverride,
    ManualMove,
    Stop,
    Reset,
    Error,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Command; 12] = [
        Self::StartMission,
        Self::Arrive,
        Self::NotifyUser,
        Self::OpenCompartment,
        Self::CloseCompartment,
        Self::Timeout,
        Self::Return,
        Self::ManualOverride,
        Self::ManualMove,
        Self::Stop,
        Self::Reset,
        Self::Error,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::StartMission => "START_MISSION",
            Self::Arrive => "ARRIVE",
            Self::NotifyUser => "NOTIFY_USER",
            Self::OpenCompartment => "OPEN_COMPARTMENT",
            Self::CloseCompartment => "CLOSE_COMPARTMENT",
            Self::Timeout => "TIMEOUT",
            Self::Return => "RETURN",
            Self::ManualOverride => "MANUAL_OVERRIDE",
            Self::ManualMove => "MANUAL_MOVE",
            Self::Stop => "STOP",
            Self::Reset => "RESET",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_display() {
        for command in Command::ALL {
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command));
        }
    }

    #[test]
    fn error_is_declared_last() {
        assert_eq!(Command::ALL.last(), Some(&Command::Error));
    }
}
