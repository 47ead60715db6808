//! Values returned to collaborators.

use crate::core::{Command, RoverState};
use crate::error::OrchestratorError;
use crate::hardware::{Motor, PayloadStatus};
use crate::mission::Mission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries returned by `state_history`.
pub const DEFAULT_STATE_HISTORY_LIMIT: usize = 50;

/// Default number of entries returned by `mission_history`.
pub const DEFAULT_MISSION_HISTORY_LIMIT: usize = 20;

/// Speed collaborators use when a manual request carries none.
pub const DEFAULT_MANUAL_SPEED: i32 = 100;

/// Acknowledgement of an accepted operation: the resulting state plus
/// whatever the operation touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub state: RoverState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<Mission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motors: Option<Vec<Motor>>,
}

impl Ack {
    pub fn new(state: RoverState) -> Self {
        Self {
            state,
            mission: None,
            payload: None,
            motors: None,
        }
    }

    pub fn with_mission(mut self, mission: impl Into<Option<Mission>>) -> Self {
        self.mission = mission.into();
        self
    }

    pub fn with_payload(mut self, payload: PayloadStatus) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_motors(mut self, motors: Vec<Motor>) -> Self {
        self.motors = Some(motors);
        self
    }
}

/// Point-in-time view of the whole rover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoverStatus {
    pub state: RoverState,
    pub motors: Vec<Motor>,
    pub payload: PayloadStatus,
    pub active_mission: Option<Mission>,
    pub valid_commands: Vec<Command>,
    pub timestamp: DateTime<Utc>,
}

/// Tagged JSON shape: `{"success": true, "state": ..}` or
/// `{"success": false, "error": ".."}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(flatten)]
    pub ack: Option<Ack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            serde_json::json!({ "success": false, "error": err.to_string() })
        })
    }
}

impl From<Result<Ack, OrchestratorError>> for Response {
    fn from(result: Result<Ack, OrchestratorError>) -> Self {
        match result {
            Ok(ack) => Self {
                success: true,
                ack: Some(ack),
                error: None,
            },
            Err(err) => Self {
                success: false,
                ack: None,
                error: Some(err.to_string()),
            },
        }
    }
}
