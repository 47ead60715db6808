//! State transition history tracking.
//!
//! History is a bounded ring kept newest-first: recording past capacity
//! evicts the oldest entry.

use super::command::Command;
use super::state::RoverState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions kept.
pub const STATE_HISTORY_CAPACITY: usize = 200;

/// Record of a single state transition.
///
/// The seed record written when the store is created or reset has no `from`
/// state and no command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: Option<RoverState>,
    /// The state being transitioned to
    pub to: RoverState,
    /// The command that caused the transition
    pub command: Option<Command>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(from: RoverState, to: RoverState, command: Command) -> Self {
        Self {
            from: Some(from),
            to,
            command: Some(command),
            timestamp: Utc::now(),
        }
    }

    /// The initial record: the rover powered up (or was reset) in `IDLE`.
    pub fn seed() -> Self {
        Self {
            from: None,
            to: RoverState::Idle,
            command: None,
            timestamp: Utc::now(),
        }
    }

    pub fn is_seed(&self) -> bool {
        self.from.is_none() && self.command.is_none()
    }
}

/// Newest-first ring of state transitions.
///
/// # Example
///
/// ```rust
/// use courier::core::{Command, RoverState, StateHistory, StateTransition};
///
/// let mut history = StateHistory::with_capacity(2);
/// history.record(StateTransition::seed());
/// history.record(StateTransition::new(
///     RoverState::Idle,
///     RoverState::Navigating,
///     Command::StartMission,
/// ));
/// history.record(StateTransition::new(
///     RoverState::Navigating,
///     RoverState::Arrived,
///     Command::Arrive,
/// ));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.latest().unwrap().to, RoverState::Arrived);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    capacity: usize,
    transitions: VecDeque<StateTransition>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    /// Create a new empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(STATE_HISTORY_CAPACITY)
    }

    /// Create an empty history that keeps at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a transition at the front, evicting the oldest past capacity.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push_front(transition);
        self.transitions.truncate(self.capacity);
    }

    /// Drop everything and start over from a single seed record.
    pub fn reseed(&mut self) {
        self.transitions.clear();
        self.record(StateTransition::seed());
    }

    pub fn latest(&self) -> Option<&StateTransition> {
        self.transitions.front()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<StateTransition> {
        self.transitions.iter().take(limit).cloned().collect()
    }

    /// States traversed, oldest first: the oldest retained `from` (or the
    /// seed's `to`), then the `to` of each later record.
    pub fn get_path(&self) -> Vec<RoverState> {
        let mut path = Vec::new();
        let mut oldest_first = self.transitions.iter().rev();
        if let Some(first) = oldest_first.next() {
            if let Some(from) = first.from {
                path.push(from);
            }
            path.push(first.to);
        }
        path.extend(oldest_first.map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(oldest), Some(newest)) = (self.transitions.back(), self.transitions.front()) {
            newest
                .timestamp
                .signed_duration_since(oldest.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTransition> {
        self.transitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: RoverState, to: RoverState, command: Command) -> StateTransition {
        StateTransition::new(from, to, command)
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.capacity(), STATE_HISTORY_CAPACITY);
    }

    #[test]
    fn record_keeps_newest_first() {
        let mut history = StateHistory::new();
        history.record(step(RoverState::Idle, RoverState::Navigating, Command::StartMission));
        history.record(step(RoverState::Navigating, RoverState::Arrived, Command::Arrive));

        let recent = history.recent(10);
        assert_eq!(recent[0].to, RoverState::Arrived);
        assert_eq!(recent[1].to, RoverState::Navigating);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = StateHistory::with_capacity(3);
        history.reseed();
        for _ in 0..5 {
            history.record(step(RoverState::ManualControl, RoverState::Idle, Command::Stop));
        }

        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|t| !t.is_seed()));
    }

    #[test]
    fn reseed_leaves_a_single_seed() {
        let mut history = StateHistory::new();
        history.record(step(RoverState::Idle, RoverState::Navigating, Command::StartMission));
        history.reseed();

        assert_eq!(history.len(), 1);
        let seed = history.latest().unwrap();
        assert!(seed.is_seed());
        assert_eq!(seed.to, RoverState::Idle);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::new();
        history.reseed();
        history.record(step(RoverState::Idle, RoverState::Navigating, Command::StartMission));
        history.record(step(RoverState::Navigating, RoverState::Arrived, Command::Arrive));

        assert_eq!(
            history.get_path(),
            vec![RoverState::Idle, RoverState::Navigating, RoverState::Arrived]
        );
    }

    #[test]
    fn recent_respects_limit() {
        let mut history = StateHistory::new();
        for _ in 0..10 {
            history.record(step(RoverState::Idle, RoverState::ManualControl, Command::ManualOverride));
        }
        assert_eq!(history.recent(4).len(), 4);
        assert_eq!(history.recent(0).len(), 0);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::new();
        history.reseed();
        std::thread::sleep(std::time::Duration::from_millis(10));
        history.record(step(RoverState::Idle, RoverState::Navigating, Command::StartMission));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::new();
        history.reseed();
        history.record(step(RoverState::Idle, RoverState::Navigating, Command::StartMission));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(history.latest(), deserialized.latest());
    }
}
