//! Guard predicates for controlling deferred transitions.
//!
//! Guards are pure boolean functions over a state. Scheduled timers carry a
//! guard describing the state they were armed for and check it again when
//! they fire.

use super::state::State;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use courier::core::{Guard, RoverState, State};
///
/// let can_transition = Guard::new(|state: &RoverState| !state.is_final());
///
/// assert!(can_transition.check(&RoverState::Navigating));
/// assert!(!can_transition.check(&RoverState::Completed));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that passes only while the machine is still in `expected`.
    ///
    /// ```rust
    /// use courier::core::{Guard, RoverState};
    ///
    /// let still_waiting = Guard::in_state(RoverState::WaitingForUser);
    ///
    /// assert!(still_waiting.check(&RoverState::WaitingForUser));
    /// assert!(!still_waiting.check(&RoverState::DeliveryWindow));
    /// ```
    pub fn in_state(expected: S) -> Self
    where
        S: 'static,
    {
        Self::new(move |state: &S| *state == expected)
    }

    /// Check if the guard allows transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> std::fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
