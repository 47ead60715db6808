//! Core State trait and the rover's state vocabulary.
//!
//! States are plain values: inspecting them never has side effects.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe the current position in a state machine.
///
/// # Required Traits
///
/// - `Clone`: States must be cloneable for history tracking
/// - `PartialEq`: States must be comparable for transition logic
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States are reported across the API boundary
///
/// # Example
///
/// ```rust
/// use courier::core::{RoverState, State};
///
/// assert_eq!(RoverState::WaitingForUser.name(), "WAITING_FOR_USER");
/// assert!(RoverState::Completed.is_final());
/// assert!(RoverState::Error.is_error());
/// assert!(!RoverState::Idle.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Final states only leave through an explicit reset.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Lifecycle position of the rover. Exactly one is live at a time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoverState {
    #[default]
    Idle,
    Navigating,
    Arrived,
    WaitingForUser,
    DeliveryWindow,
    ReturningHome,
    ManualControl,
    Completed,
    Error,
}

impl RoverState {
    /// Every state, in declaration order.
    pub const ALL: [RoverState; 9] = [
        Self::Idle,
        Self::Navigating,
        Self::Arrived,
        Self::WaitingForUser,
        Self::DeliveryWindow,
        Self::ReturningHome,
        Self::ManualControl,
        Self::Completed,
        Self::Error,
    ];

    /// States a manual override may interrupt.
    pub fn is_interruptible(&self) -> bool {
        !self.is_final() && *self != Self::ManualControl
    }
}

impl State for RoverState {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "IDLE",
            Self::Navigating => "NAVIGATING",
            Self::Arrived => "ARRIVED",
            Self::WaitingForUser => "WAITING_FOR_USER",
            Self::DeliveryWindow => "DELIVERY_WINDOW",
            Self::ReturningHome => "RETURNING_HOME",
            Self::ManualControl => "MANUAL_CONTROL",
            Self::Completed => "COMPLETED",
            Self::Error => "ERROR",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for RoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
