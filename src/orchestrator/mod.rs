//! The mission orchestrator: a cloneable handle over the rover aggregate.
//!
//! Every operation takes the core lock, runs to completion, spawns whatever
//! timers it armed, and releases the lock before journaled log events reach
//! the sink. Timer tasks hold only a weak reference, so dropping the last
//! handle tears the rover down and aborts them.
//!
//! # Example
//!
//! ```rust
//! use courier::orchestrator::MissionOrchestrator;
//! use courier::core::RoverState;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let rover = MissionOrchestrator::builder().seed(1).build().unwrap();
//!
//! let ack = rover.start_mission("305").unwrap();
//! assert_eq!(ack.state, RoverState::Navigating);
//!
//! // Only one mission at a time.
//! assert!(rover.start_mission("101").is_err());
//! # }
//! ```

mod response;
mod rover;
mod timers;

pub use response::{
    Ack, Response, RoverStatus, DEFAULT_MANUAL_SPEED, DEFAULT_MISSION_HISTORY_LIMIT,
    DEFAULT_STATE_HISTORY_LIMIT,
};
pub use timers::TimerClass;

use crate::builder::OrchestratorBuilder;
use crate::config::RoverConfig;
use crate::core::{RoverState, StateTransition};
use crate::error::OrchestratorError;
use crate::hardware::Drive;
use crate::logging::{LogEvent, LogLevel, LogSink, LogSource};
use crate::mission::Mission;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rover::RoverCore;
use std::sync::{Arc, Weak};
use timers::{Schedule, TimerFlow, TimerTicket};
use tokio::runtime::Handle;
use tracing::{debug, error};

/// Cloneable handle to one rover. All clones drive the same state.
#[derive(Clone)]
pub struct MissionOrchestrator {
    shared: Arc<Shared>,
}

struct Shared {
    core: Mutex<RoverCore>,
    sink: Arc<dyn LogSink>,
    runtime: Handle,
}

impl MissionOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub(crate) fn from_parts(
        config: RoverConfig,
        sink: Arc<dyn LogSink>,
        runtime: Handle,
        rng: StdRng,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(RoverCore::new(config, rng)),
                sink,
                runtime,
            }),
        }
    }

    /// Dispatch the rover to `room`. Requires `IDLE` and no active mission.
    pub fn start_mission(&self, room: impl Into<String>) -> Result<Ack, OrchestratorError> {
        let room = room.into();
        self.shared
            .run("start_mission", |core| core.start_mission(&room))
    }

    /// User opened the compartment. Cancels the wait window.
    pub fn open_compartment(&self) -> Result<Ack, OrchestratorError> {
        self.shared.run("open_compartment", RoverCore::open_compartment)
    }

    /// User closed the compartment. Archives the mission and schedules the
    /// auto-reset.
    pub fn close_compartment(&self) -> Result<Ack, OrchestratorError> {
        self.shared
            .run("close_compartment", RoverCore::close_compartment)
    }

    /// Start a new mission to the most recently archived room.
    pub fn request_redelivery(&self) -> Result<Ack, OrchestratorError> {
        self.shared
            .run("request_redelivery", RoverCore::request_redelivery)
    }

    pub fn manual_override(&self, drive: Drive, speed: i32) -> Result<Ack, OrchestratorError> {
        self.shared
            .run("manual_override", |core| core.manual_override(drive, speed))
    }

    /// Leave manual control. Any active mission is cancelled.
    pub fn stop_manual(&self) -> Result<Ack, OrchestratorError> {
        self.shared.run("stop_manual", RoverCore::stop_manual)
    }

    /// Give up waiting and head home now.
    pub fn return_to_base(&self) -> Result<Ack, OrchestratorError> {
        self.shared.run("return_to_base", RoverCore::return_to_base)
    }

    /// Put the rover into `ERROR` from any state.
    pub fn inject_fault(&self, reason: impl Into<String>) -> Result<Ack, OrchestratorError> {
        let reason = reason.into();
        self.shared
            .run("inject_fault", |core| core.inject_fault(&reason))
    }

    pub fn set_motor_fault(&self, motor_id: u8) -> Result<Ack, OrchestratorError> {
        self.shared
            .run("set_motor_fault", |core| core.set_motor_fault(motor_id))
    }

    /// Unconditionally return to a clean `IDLE` and report the result.
    pub fn reset_rover(&self) -> RoverStatus {
        match self.shared.run("reset_rover", |core| Ok(core.reset())) {
            Ok(status) => status,
            Err(_) => self.status(),
        }
    }

    pub fn status(&self) -> RoverStatus {
        self.shared.core.lock().status()
    }

    pub fn state(&self) -> RoverState {
        self.shared.core.lock().state()
    }

    pub fn active_mission(&self) -> Option<Mission> {
        self.shared.core.lock().active_mission()
    }

    /// Up to `limit` transitions, newest first.
    pub fn state_history(&self, limit: usize) -> Vec<StateTransition> {
        self.shared.core.lock().state_history(limit)
    }

    /// Up to `limit` archived missions, newest first.
    pub fn mission_history(&self, limit: usize) -> Vec<Mission> {
        self.shared.core.lock().mission_history(limit)
    }

    /// Timer classes currently armed.
    pub fn active_timers(&self) -> Vec<TimerClass> {
        self.shared.core.lock().live_timers()
    }
}

impl std::fmt::Debug for MissionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissionOrchestrator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Shared {
    /// Run one operation inside the critical section.
    fn run<T>(
        self: &Arc<Self>,
        operation: &'static str,
        op: impl FnOnce(&mut RoverCore) -> Result<T, OrchestratorError>,
    ) -> Result<T, OrchestratorError> {
        let (result, events) = {
            let mut core = self.core.lock();
            let result = op(&mut *core);
            match &result {
                Ok(_) => debug!(operation, state = %core.state(), "operation applied"),
                Err(err @ OrchestratorError::Invariant(_)) => {
                    error!(operation, error = %err, "invariant violated");
                    core.log(
                        LogLevel::Error,
                        LogSource::System,
                        format!("{operation} aborted: {err}"),
                    );
                }
                Err(err) => debug!(operation, error = %err, "operation refused"),
            }
            self.spawn_pending(&mut *core);
            (result, core.take_journal())
        };
        self.deliver(events);
        result
    }

    fn fire(self: &Arc<Self>, ticket: &TimerTicket) -> TimerFlow {
        let (flow, events) = {
            let mut core = self.core.lock();
            let flow = core.fire(ticket);
            self.spawn_pending(&mut *core);
            (flow, core.take_journal())
        };
        self.deliver(events);
        flow
    }

    /// Start a task for every timer armed during the current critical section.
    fn spawn_pending(self: &Arc<Self>, core: &mut RoverCore) {
        for ticket in core.take_pending_timers() {
            let handle = self
                .runtime
                .spawn(run_timer(Arc::downgrade(self), ticket));
            core.attach_timer(&ticket, handle);
        }
    }

    fn deliver(&self, events: Vec<LogEvent>) {
        for event in events {
            self.sink.record(event);
        }
    }
}

async fn run_timer(shared: Weak<Shared>, ticket: TimerTicket) {
    match ticket.schedule {
        Schedule::Once(delay) => {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.fire(&ticket);
            }
        }
        Schedule::Every(period) => {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                if shared.fire(&ticket) == TimerFlow::Done {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use std::time::Duration;

    fn fast_config() -> RoverConfig {
        RoverConfig {
            progress_step_min: 100,
            progress_step_max: 100,
            ..RoverConfig::default()
        }
    }

    fn rover_with_sink() -> (MissionOrchestrator, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        let rover = MissionOrchestrator::builder()
            .config(fast_config())
            .sink(sink.clone())
            .seed(42)
            .build()
            .unwrap();
        (rover, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_timer_reaches_waiting() {
        let (rover, _) = rover_with_sink();
        rover.start_mission("305").unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(rover.state(), RoverState::WaitingForUser);
    }

    #[tokio::test(start_paused = true)]
    async fn events_reach_the_sink_after_the_operation() {
        let (rover, sink) = rover_with_sink();
        rover.start_mission("305").unwrap();

        assert!(sink.contains(LogLevel::Command, "Room 305"));
        assert!(sink.contains(LogLevel::Info, "IDLE -> NAVIGATING"));
    }

    #[tokio::test(start_paused = true)]
    async fn refused_operations_emit_nothing() {
        let (rover, sink) = rover_with_sink();

        assert!(rover.close_compartment().is_err());

        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timers_follow_the_mission() {
        let (rover, _) = rover_with_sink();
        rover.start_mission("305").unwrap();
        assert_eq!(rover.active_timers(), vec![TimerClass::Navigation]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rover.active_timers(), vec![TimerClass::Wait]);

        rover.open_compartment().unwrap();
        assert!(rover.active_timers().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_rover() {
        let (rover, _) = rover_with_sink();
        let other = rover.clone();

        rover.start_mission("305").unwrap();

        assert_eq!(other.state(), RoverState::Navigating);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_timers() {
        let (rover, sink) = rover_with_sink();
        rover.start_mission("305").unwrap();
        drop(rover);
        sink.clear();

        tokio::time::sleep(Duration::from_secs(300)).await;

        assert!(sink.is_empty());
    }
}
