//! The rover aggregate: every piece of mutable state behind the orchestrator
//! lock, and the operations that move it.
//!
//! Each operation reads the current state, checks its preconditions, asks the
//! transition table, and only then mutates. A refused operation returns before
//! touching anything. Log events go to an in-memory journal that the
//! orchestrator drains once the lock is released.

use crate::config::RoverConfig;
use crate::core::{transition, valid_commands, Command, RoverState, StateStore, StateTransition, TransitionResult};
use crate::enforcement::{CommandContext, PreconditionViolation, Preconditions};
use crate::error::OrchestratorError;
use crate::hardware::{Drive, MotorBank, PayloadLock, MOTOR_COUNT};
use crate::logging::{LogEvent, LogLevel, LogSource};
use crate::mission::{Mission, MissionLedger, MissionStatus};
use crate::orchestrator::response::{Ack, RoverStatus};
use crate::orchestrator::timers::{Schedule, TimerClass, TimerFlow, TimerTicket, Timers};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub(crate) struct RoverCore {
    config: RoverConfig,
    store: StateStore,
    motors: MotorBank,
    payload: PayloadLock,
    ledger: MissionLedger,
    timers: Timers,
    rng: StdRng,
    journal: Vec<LogEvent>,
}

impl RoverCore {
    pub(crate) fn new(config: RoverConfig, rng: StdRng) -> Self {
        Self {
            store: StateStore::new(config.state_history_capacity),
            ledger: MissionLedger::new(config.mission_history_capacity),
            motors: MotorBank::new(),
            payload: PayloadLock::new(),
            timers: Timers::new(),
            rng,
            journal: Vec::new(),
            config,
        }
    }

    // Plumbing

    pub(crate) fn log(&mut self, level: LogLevel, source: LogSource, message: impl Into<String>) {
        self.journal.push(LogEvent::new(level, source, message));
    }

    pub(crate) fn take_journal(&mut self) -> Vec<LogEvent> {
        std::mem::take(&mut self.journal)
    }

    pub(crate) fn take_pending_timers(&mut self) -> Vec<TimerTicket> {
        self.timers.take_pending()
    }

    pub(crate) fn attach_timer(&mut self, ticket: &TimerTicket, handle: JoinHandle<()>) {
        self.timers.attach(ticket, handle);
    }

    fn context(&self, operation: &'static str) -> CommandContext {
        CommandContext::new(operation, self.store.current())
            .with_mission_active(self.ledger.has_active())
            .with_archived_missions(self.ledger.archived_count())
    }

    /// Consult the transition table without changing anything.
    fn decide(&self, command: Command) -> Result<RoverState, OrchestratorError> {
        match transition(self.store.current(), command) {
            TransitionResult::Accepted(next) => Ok(next),
            TransitionResult::Rejected { state, command } => {
                Err(OrchestratorError::InvalidTransition { state, command })
            }
        }
    }

    fn commit(&mut self, to: RoverState, command: Command) {
        let from = self.store.current();
        self.store.commit(to, command);
        self.log(
            LogLevel::Info,
            LogSource::StateMachine,
            format!("State: {from} -> {to} ({command})"),
        );
    }

    fn ack(&self) -> Ack {
        Ack::new(self.store.current())
    }

    fn active_mission_cloned(&self) -> Option<Mission> {
        self.ledger.active().cloned()
    }

    // Operations

    pub(crate) fn start_mission(&mut self, room: &str) -> Result<Ack, OrchestratorError> {
        Preconditions::new()
            .require_state(RoverState::Idle)
            .require_no_active_mission()
            .check(&self.context("start mission"))?;
        let next = self.decide(Command::StartMission)?;

        let mission = self
            .ledger
            .create_mission(room, self.config.wait_timeout_secs)?
            .clone();

        self.log(
            LogLevel::Command,
            LogSource::Mission,
            format!("Mission started -> Room {room}"),
        );
        self.commit(next, Command::StartMission);
        self.motors
            .set_motors(Drive::Forward, i32::from(self.config.cruise_speed));
        self.timers.arm(
            TimerClass::Navigation,
            Schedule::Every(self.config.navigation_tick()),
            RoverState::Navigating,
        );

        Ok(self.ack().with_mission(mission))
    }

    pub(crate) fn open_compartment(&mut self) -> Result<Ack, OrchestratorError> {
        Preconditions::new()
            .require_state(RoverState::WaitingForUser)
            .check(&self.context("open compartment"))?;
        let next = self.decide(Command::OpenCompartment)?;

        self.timers.cancel(TimerClass::Wait);
        self.log(LogLevel::Command, LogSource::Payload, "Compartment opened by user");
        self.commit(next, Command::OpenCompartment);
        let payload = self.payload.unlock();
        let mission = self.ledger.update_status(MissionStatus::Delivered).cloned();

        Ok(self.ack().with_payload(payload).with_mission(mission))
    }

    pub(crate) fn close_compartment(&mut self) -> Result<Ack, OrchestratorError> {
        let next = self.decide(Command::CloseCompartment)?;

        self.log(
            LogLevel::Command,
            LogSource::Payload,
            "Compartment closed, delivery complete",
        );
        self.commit(next, Command::CloseCompartment);
        let payload = self.payload.lock();
        self.ledger.update_status(MissionStatus::Completed);
        let mission = self.ledger.complete_mission();
        self.timers.arm(
            TimerClass::AutoReset,
            Schedule::Once(self.config.auto_reset()),
            RoverState::Completed,
        );

        Ok(self.ack().with_payload(payload).with_mission(mission))
    }

    pub(crate) fn request_redelivery(&mut self) -> Result<Ack, OrchestratorError> {
        Preconditions::new()
            .require_state(RoverState::Idle)
            .require_no_active_mission()
            .require_archived_mission()
            .check(&self.context("request redelivery"))?;
        let Some(room) = self.ledger.last_archived().map(|m| m.room.clone()) else {
            return Err(OrchestratorError::PreconditionFailed(vec![
                PreconditionViolation::NoPreviousMission,
            ]));
        };

        self.log(
            LogLevel::Command,
            LogSource::Mission,
            format!("Redelivery requested -> Room {room}"),
        );
        self.start_mission(&room)
    }

    /// Take over the motors. The first request moves the rover into
    /// `MANUAL_CONTROL`; later ones only steer and leave no history entry.
    pub(crate) fn manual_override(&mut self, drive: Drive, speed: i32) -> Result<Ack, OrchestratorError> {
        let from = self.store.current();
        let command = if from == RoverState::ManualControl {
            Command::ManualMove
        } else {
            Command::ManualOverride
        };
        let next = self.decide(command)?;

        if command == Command::ManualOverride {
            self.timers.cancel_all();
            self.log(
                LogLevel::Warn,
                LogSource::Manual,
                format!("Manual override activated from {from}"),
            );
            self.commit(next, command);
        }
        self.motors.set_motors(drive, speed);
        self.log(
            LogLevel::Command,
            LogSource::Manual,
            format!("Manual: {drive} @ {speed}"),
        );

        Ok(self.ack().with_motors(self.motors.snapshot()))
    }

    pub(crate) fn stop_manual(&mut self) -> Result<Ack, OrchestratorError> {
        let next = self.decide(Command::Stop)?;

        self.commit(next, Command::Stop);
        self.motors.stop_all();
        if let Some(mission) = self.ledger.cancel_mission() {
            self.log(
                LogLevel::Warn,
                LogSource::Mission,
                format!("Mission to Room {} cancelled by manual stop", mission.room),
            );
        }
        self.log(LogLevel::Info, LogSource::Manual, "Manual control released");

        Ok(self.ack().with_motors(self.motors.snapshot()))
    }

    pub(crate) fn return_to_base(&mut self) -> Result<Ack, OrchestratorError> {
        self.head_home(Command::Return)?;
        Ok(self.ack().with_mission(self.active_mission_cloned()))
    }

    pub(crate) fn inject_fault(&mut self, reason: &str) -> Result<Ack, OrchestratorError> {
        let next = self.decide(Command::Error)?;

        self.timers.cancel_all();
        self.motors.stop_all();
        self.log(
            LogLevel::Error,
            LogSource::System,
            format!("Fault injected: {reason}"),
        );
        self.commit(next, Command::Error);

        Ok(self.ack())
    }

    pub(crate) fn set_motor_fault(&mut self, motor_id: u8) -> Result<Ack, OrchestratorError> {
        Preconditions::new()
            .require_pred(
                move |_| usize::from(motor_id) < MOTOR_COUNT,
                PreconditionViolation::UnknownMotor { motor_id },
            )
            .check(&self.context("set motor fault"))?;

        self.motors.set_fault(motor_id);
        self.log(
            LogLevel::Warn,
            LogSource::System,
            format!("Motor {motor_id} forced to FAULT"),
        );

        Ok(self.ack().with_motors(self.motors.snapshot()))
    }

    /// Unconditional return to a clean `IDLE`. The active mission, if any, is
    /// dropped without being archived.
    pub(crate) fn reset(&mut self) -> RoverStatus {
        self.timers.cancel_all();
        self.store.reset();
        self.motors.reset();
        self.payload.reset();
        if let Some(mission) = self.ledger.discard_active() {
            self.log(
                LogLevel::Warn,
                LogSource::Mission,
                format!("Mission to Room {} discarded by reset", mission.room),
            );
        }
        self.log(LogLevel::Info, LogSource::System, "Rover reset to IDLE");
        self.status()
    }

    // Timer-driven steps

    /// Act on a woken timer. Stale or superseded tickets do nothing.
    pub(crate) fn fire(&mut self, ticket: &TimerTicket) -> TimerFlow {
        let state = self.store.current();
        if !self.timers.admits(ticket, state) {
            debug!(
                timer = ticket.class.name(),
                generation = ticket.generation,
                state = %state,
                "stale timer ignored"
            );
            if self.timers.is_current(ticket) {
                self.timers.retire(ticket.class);
            }
            return TimerFlow::Done;
        }

        match ticket.class {
            TimerClass::Navigation => self.navigation_tick(),
            TimerClass::Wait => {
                self.timers.retire(TimerClass::Wait);
                if let Err(err) = self.head_home(Command::Timeout) {
                    debug!(error = %err, "wait timeout refused");
                }
                TimerFlow::Done
            }
            TimerClass::Return => {
                self.timers.retire(TimerClass::Return);
                self.finish_return();
                TimerFlow::Done
            }
            TimerClass::AutoReset => {
                self.timers.retire(TimerClass::AutoReset);
                self.auto_reset();
                TimerFlow::Done
            }
        }
    }

    fn navigation_tick(&mut self) -> TimerFlow {
        let step = self
            .rng
            .gen_range(self.config.progress_step_min..=self.config.progress_step_max);
        let Some(progress) = self.ledger.advance_progress(step) else {
            self.timers.retire(TimerClass::Navigation);
            return TimerFlow::Done;
        };
        debug!(progress, step, "navigation tick");
        if progress < 100 {
            return TimerFlow::Continue;
        }

        self.timers.retire(TimerClass::Navigation);
        self.arrive();
        TimerFlow::Done
    }

    /// NAVIGATING -> ARRIVED -> WAITING_FOR_USER, then start the wait window.
    fn arrive(&mut self) {
        let Ok(arrived) = self.decide(Command::Arrive) else {
            return;
        };
        self.commit(arrived, Command::Arrive);
        self.motors.stop_all();
        let room = self
            .ledger
            .update_status(MissionStatus::Arrived)
            .map(|m| m.room.clone())
            .unwrap_or_default();
        self.log(
            LogLevel::Info,
            LogSource::Navigation,
            format!("Arrived at Room {room}"),
        );

        let Ok(waiting) = self.decide(Command::NotifyUser) else {
            return;
        };
        self.commit(waiting, Command::NotifyUser);
        let timeout = self
            .ledger
            .update_status(MissionStatus::Waiting)
            .map_or(self.config.wait_timeout_secs, |m| m.timeout_seconds);
        self.log(
            LogLevel::Info,
            LogSource::Mission,
            "User notified, waiting for compartment to open",
        );
        self.timers.arm(
            TimerClass::Wait,
            Schedule::Once(Duration::from_secs(timeout)),
            RoverState::WaitingForUser,
        );
    }

    /// Shared by the wait timeout and an explicit return request.
    fn head_home(&mut self, command: Command) -> Result<(), OrchestratorError> {
        let next = self.decide(command)?;

        self.timers.cancel(TimerClass::Wait);
        match command {
            Command::Timeout => self.log(
                LogLevel::Warn,
                LogSource::Mission,
                "User did not respond, returning to base",
            ),
            _ => self.log(LogLevel::Command, LogSource::Mission, "Return to base requested"),
        }
        self.commit(next, command);
        self.ledger.update_status(MissionStatus::Returned);
        self.motors
            .set_motors(Drive::Backward, i32::from(self.config.return_speed));
        self.timers.arm(
            TimerClass::Return,
            Schedule::Once(self.config.return_trip()),
            RoverState::ReturningHome,
        );
        Ok(())
    }

    fn finish_return(&mut self) {
        let Ok(next) = self.decide(Command::Arrive) else {
            return;
        };
        self.commit(next, Command::Arrive);
        self.motors.stop_all();
        self.ledger.complete_mission();
        self.log(LogLevel::Info, LogSource::Navigation, "Returned to base");
    }

    fn auto_reset(&mut self) {
        let Ok(next) = self.decide(Command::Reset) else {
            return;
        };
        self.commit(next, Command::Reset);
        self.log(LogLevel::Info, LogSource::System, "Auto-reset to IDLE");
    }

    // Reads

    pub(crate) fn state(&self) -> RoverState {
        self.store.current()
    }

    pub(crate) fn status(&self) -> RoverStatus {
        let state = self.store.current();
        RoverStatus {
            state,
            motors: self.motors.snapshot(),
            payload: self.payload.status(),
            active_mission: self.active_mission_cloned(),
            valid_commands: valid_commands(state),
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn active_mission(&self) -> Option<Mission> {
        self.active_mission_cloned()
    }

    pub(crate) fn state_history(&self, limit: usize) -> Vec<StateTransition> {
        self.store.recent(limit)
    }

    pub(crate) fn mission_history(&self, limit: usize) -> Vec<Mission> {
        self.ledger.history(limit)
    }

    pub(crate) fn live_timers(&self) -> Vec<TimerClass> {
        self.timers.live_classes()
    }
}
