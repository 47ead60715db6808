//! Cancellable timer slots, one per timer class.
//!
//! Arming a class hands out a fresh generation number and remembers the
//! state the timer was armed for. A firing task may only act if its
//! generation is still the live one for its class and the guard still
//! passes; both are checked under the orchestrator lock, so cancelling
//! inside an operation is enough to make any in-flight wake-up a no-op.

use crate::core::{Guard, RoverState};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerClass {
    /// Periodic progress tick while navigating.
    Navigation,
    /// One-shot user wait window.
    Wait,
    /// One-shot simulated trip back to base.
    Return,
    /// One-shot reset after a completed delivery.
    AutoReset,
}

impl TimerClass {
    pub const ALL: [TimerClass; 4] = [
        Self::Navigation,
        Self::Wait,
        Self::Return,
        Self::AutoReset,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::Wait => "wait",
            Self::Return => "return",
            Self::AutoReset => "auto_reset",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    Once(Duration),
    Every(Duration),
}

/// Everything a timer task needs to find its way back to its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerTicket {
    pub class: TimerClass,
    pub generation: u64,
    pub schedule: Schedule,
}

/// Whether a periodic timer should keep ticking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerFlow {
    Continue,
    Done,
}

#[derive(Default)]
struct Slot {
    generation: Option<u64>,
    guard: Option<Guard<RoverState>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Default)]
pub struct Timers {
    slots: [Slot; 4],
    next_generation: u64,
    pending: Vec<TimerTicket>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `class`, replacing any predecessor. The returned ticket is queued
    /// until the orchestrator spawns a task for it.
    pub fn arm(&mut self, class: TimerClass, schedule: Schedule, expected: RoverState) -> TimerTicket {
        self.cancel(class);
        self.next_generation += 1;
        let generation = self.next_generation;

        let slot = &mut self.slots[class.index()];
        slot.generation = Some(generation);
        slot.guard = Some(Guard::in_state(expected));

        let ticket = TimerTicket {
            class,
            generation,
            schedule,
        };
        self.pending.push(ticket);
        debug!(timer = class.name(), generation, expected = %expected, "timer armed");
        ticket
    }

    /// Disarm `class` and abort its task. Returns whether it was live.
    pub fn cancel(&mut self, class: TimerClass) -> bool {
        let slot = &mut self.slots[class.index()];
        let was_live = slot.generation.take().is_some();
        slot.guard = None;
        if let Some(handle) = slot.handle.take() {
            handle.abort();
        }
        self.pending.retain(|ticket| ticket.class != class);
        if was_live {
            debug!(timer = class.name(), "timer cancelled");
        }
        was_live
    }

    pub fn cancel_all(&mut self) {
        for class in TimerClass::ALL {
            self.cancel(class);
        }
    }

    /// Clear a slot whose task is finishing on its own.
    pub fn retire(&mut self, class: TimerClass) {
        let slot = &mut self.slots[class.index()];
        slot.generation = None;
        slot.guard = None;
        // Detach rather than abort: the caller is usually that very task.
        slot.handle = None;
    }

    pub fn is_live(&self, class: TimerClass) -> bool {
        self.slots[class.index()].generation.is_some()
    }

    /// The ticket still owns its slot.
    pub fn is_current(&self, ticket: &TimerTicket) -> bool {
        self.slots[ticket.class.index()].generation == Some(ticket.generation)
    }

    /// The ticket owns its slot and the rover is still where it was armed for.
    pub fn admits(&self, ticket: &TimerTicket, state: RoverState) -> bool {
        let slot = &self.slots[ticket.class.index()];
        slot.generation == Some(ticket.generation)
            && slot.guard.as_ref().is_some_and(|guard| guard.check(&state))
    }

    /// Record the spawned task for a ticket; abort it if the slot moved on.
    pub fn attach(&mut self, ticket: &TimerTicket, handle: JoinHandle<()>) {
        if self.is_current(ticket) {
            self.slots[ticket.class.index()].handle = Some(handle);
        } else {
            handle.abort();
        }
    }

    pub fn take_pending(&mut self) -> Vec<TimerTicket> {
        std::mem::take(&mut self.pending)
    }

    pub fn live_classes(&self) -> Vec<TimerClass> {
        TimerClass::ALL
            .into_iter()
            .filter(|class| self.is_live(*class))
            .collect()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for slot in &mut self.slots {
            if let Some(handle) = slot.handle.take() {
                handle.abort();
            }
        }
    }
}
