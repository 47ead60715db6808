//! Current rover state plus its transition log.

use super::command::Command;
use super::history::{StateHistory, StateTransition};
use super::state::RoverState;

/// Holds the single live `RoverState` and the bounded history behind it.
#[derive(Clone, Debug)]
pub struct StateStore {
    current: RoverState,
    history: StateHistory,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(super::history::STATE_HISTORY_CAPACITY)
    }
}

impl StateStore {
    /// A store in `IDLE` with one seed record.
    pub fn new(history_capacity: usize) -> Self {
        let mut history = StateHistory::with_capacity(history_capacity);
        history.reseed();
        Self {
            current: RoverState::Idle,
            history,
        }
    }

    pub fn current(&self) -> RoverState {
        self.current
    }

    /// Move to `to` and record the transition from the current state.
    pub fn commit(&mut self, to: RoverState, command: Command) -> StateTransition {
        let record = StateTransition::new(self.current, to, command);
        self.history.record(record.clone());
        self.current = to;
        record
    }

    /// Back to `IDLE` with a fresh seed record.
    pub fn reset(&mut self) {
        self.current = RoverState::Idle;
        self.history.reseed();
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn recent(&self, limit: usize) -> Vec<StateTransition> {
        self.history.recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_seed() {
        let store = StateStore::default();
        assert_eq!(store.current(), RoverState::Idle);
        assert_eq!(store.history().len(), 1);
        assert!(store.history().latest().unwrap().is_seed());
    }

    #[test]
    fn commit_updates_state_and_history() {
        let mut store = StateStore::default();
        let record = store.commit(RoverState::Navigating, Command::StartMission);

        assert_eq!(record.from, Some(RoverState::Idle));
        assert_eq!(store.current(), RoverState::Navigating);
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.recent(1)[0], record);
    }

    #[test]
    fn reset_discards_history() {
        let mut store = StateStore::default();
        store.commit(RoverState::ManualControl, Command::ManualOverride);
        store.commit(RoverState::Idle, Command::Stop);
        store.commit(RoverState::Error, Command::Error);

        store.reset();

        assert_eq!(store.current(), RoverState::Idle);
        assert_eq!(store.history().len(), 1);
    }
}
