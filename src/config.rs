//! Orchestrator timing and capacity configuration.

use crate::core::STATE_HISTORY_CAPACITY;
use crate::mission::{DEFAULT_TIMEOUT_SECONDS, MISSION_HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single reason a configuration was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    #[error("navigation_tick_ms must be greater than 0")]
    ZeroNavigationTick,

    #[error("progress steps must satisfy 1 <= min ({min}) <= max ({max}) <= 100")]
    InvalidProgressStep { min: u8, max: u8 },

    #[error("wait_timeout_secs must be greater than 0")]
    ZeroWaitTimeout,

    #[error("{name} must be greater than 0")]
    ZeroCapacity { name: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {}", describe(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn describe(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Timings and capacities for the orchestrator. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    /// Period of the navigation progress tick.
    pub navigation_tick_ms: u64,
    /// Smallest progress step per tick, in percent.
    pub progress_step_min: u8,
    /// Largest progress step per tick, in percent.
    pub progress_step_max: u8,
    /// How long the rover waits for the user before heading home.
    pub wait_timeout_secs: u64,
    /// Duration of the simulated trip back to base.
    pub return_trip_ms: u64,
    /// Delay before a completed delivery resets to `IDLE`.
    pub auto_reset_ms: u64,
    /// Outbound motor speed.
    pub cruise_speed: u8,
    /// Motor speed while reversing home.
    pub return_speed: u8,
    pub state_history_capacity: usize,
    pub mission_history_capacity: usize,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            navigation_tick_ms: 1500,
            progress_step_min: 2,
            progress_step_max: 10,
            wait_timeout_secs: DEFAULT_TIMEOUT_SECONDS,
            return_trip_ms: 8000,
            auto_reset_ms: 3000,
            cruise_speed: 100,
            return_speed: 80,
            state_history_capacity: STATE_HISTORY_CAPACITY,
            mission_history_capacity: MISSION_HISTORY_CAPACITY,
        }
    }
}

impl RoverConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.ensure_valid()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn navigation_tick(&self) -> Duration {
        Duration::from_millis(self.navigation_tick_ms)
    }

    pub fn return_trip(&self) -> Duration {
        Duration::from_millis(self.return_trip_ms)
    }

    pub fn auto_reset(&self) -> Duration {
        Duration::from_millis(self.auto_reset_ms)
    }

    /// Check every field, accumulating ALL issues.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        let check = |ok: bool, issue: ConfigIssue| -> Validation<(), NonEmptyVec<ConfigIssue>> {
            if ok {
                Validation::success(())
            } else {
                Validation::fail(issue)
            }
        };

        let checks = vec![
            check(self.navigation_tick_ms > 0, ConfigIssue::ZeroNavigationTick),
            check(
                self.progress_step_min >= 1
                    && self.progress_step_min <= self.progress_step_max
                    && self.progress_step_max <= 100,
                ConfigIssue::InvalidProgressStep {
                    min: self.progress_step_min,
                    max: self.progress_step_max,
                },
            ),
            check(self.wait_timeout_secs > 0, ConfigIssue::ZeroWaitTimeout),
            check(
                self.state_history_capacity > 0,
                ConfigIssue::ZeroCapacity {
                    name: "state_history_capacity",
                },
            ),
            check(
                self.mission_history_capacity > 0,
                ConfigIssue::ZeroCapacity {
                    name: "mission_history_capacity",
                },
            ),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(issues) => {
                Err(ConfigError::Invalid(issues.iter().cloned().collect()))
            }
        }
    }
}
