//! Courier: a timer-driven mission orchestrator for a delivery rover.
//!
//! Courier follows a "pure core, imperative shell" layout. The transition
//! table, guards and history in [`core`] are pure; the [`orchestrator`] is
//! the shell that owns the mutable rover, drives the motor bank and payload
//! lock, and schedules the timers that move a mission along on its own.
//!
//! # Core Concepts
//!
//! - **State**: the nine [`RoverState`]s and twelve [`Command`]s, joined by an
//!   exhaustive transition table
//! - **Preconditions**: business rules checked with Stillwater `Validation`,
//!   reporting every failure at once
//! - **Timers**: generation-tagged, guarded tasks that can never apply a stale
//!   effect after they are cancelled
//! - **Log sinks**: domain events journaled under the lock and delivered after
//!
//! # Example
//!
//! ```rust
//! use courier::{MissionOrchestrator, RoverConfig, RoverState};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = RoverConfig {
//!     progress_step_min: 100,
//!     progress_step_max: 100,
//!     navigation_tick_ms: 10,
//!     auto_reset_ms: 10,
//!     ..RoverConfig::default()
//! };
//! let rover = MissionOrchestrator::builder().config(config).build().unwrap();
//!
//! rover.start_mission("305").unwrap();
//! tokio::time::sleep(Duration::from_millis(100)).await;
//! assert_eq!(rover.state(), RoverState::WaitingForUser);
//!
//! rover.open_compartment().unwrap();
//! rover.close_compartment().unwrap();
//! tokio::time::sleep(Duration::from_millis(100)).await;
//! assert_eq!(rover.state(), RoverState::Idle);
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod enforcement;
pub mod error;
pub mod hardware;
pub mod logging;
pub mod mission;
pub mod orchestrator;

// Re-export commonly used types
pub use builder::{BuildError, OrchestratorBuilder};
pub use config::{ConfigError, RoverConfig};
pub use core::{Command, RoverState, State, StateTransition, TransitionResult};
pub use error::{InvariantViolation, OrchestratorError};
pub use hardware::Drive;
pub use logging::{LogEvent, LogLevel, LogSink, LogSource, MemorySink, TracingSink};
pub use mission::{Mission, MissionStatus};
pub use orchestrator::{Ack, MissionOrchestrator, Response, RoverStatus};
