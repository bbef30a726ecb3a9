//! State machine runtime
//!
//! Small typed finite state machines for element lifecycles (reveal gates,
//! typewriter sequencing). Transitions are a lookup table keyed by
//! `(state, event)`; an event with no entry for the current state is ignored.
//!
//! Each animated element owns its machine; there is no shared registry.

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    table: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            table: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to)
    ///
    /// A later entry for the same `(from, event)` replaces the earlier one.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        if let Some(previous) = self.table.insert((from, event), to) {
            tracing::warn!(?from, ?event, ?previous, ?to, "fsm: transition redefined");
        }
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            table: self.table,
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    table: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Whether `event` would move the machine from its current state
    pub fn can_send(&self, event: E) -> bool {
        self.table.contains_key(&(self.current_state, event))
    }

    /// Send an event, returning the state after handling it
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;
        match self.table.get(&(current, event)) {
            Some(&to) => {
                self.current_state = to;
                tracing::trace!(from = ?current, ?event, ?to, "fsm: transition");
                to
            }
            None => {
                tracing::trace!(?current, ?event, "fsm: event ignored");
                current
            }
        }
    }
}

impl<S: Debug, E> Debug for StateMachine<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current_state", &self.current_state)
            .field("transitions", &self.table.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Phase {
        Idle,
        Running,
        Done,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Signal {
        Activate,
        Finish,
        Cancel,
    }

    fn sequencer() -> StateMachine<Phase, Signal> {
        StateMachine::builder(Phase::Idle)
            .on(Phase::Idle, Signal::Activate, Phase::Running)
            .on(Phase::Running, Signal::Finish, Phase::Done)
            .on(Phase::Running, Signal::Cancel, Phase::Idle)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = sequencer();
        assert_eq!(fsm.current_state(), Phase::Idle);

        fsm.send(Signal::Activate);
        assert!(fsm.is_in(Phase::Running));

        fsm.send(Signal::Cancel);
        assert!(fsm.is_in(Phase::Idle));

        fsm.send(Signal::Activate);
        assert_eq!(fsm.send(Signal::Finish), Phase::Done);
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = sequencer();

        // Finish is not valid while idle
        assert!(!fsm.can_send(Signal::Finish));
        assert_eq!(fsm.send(Signal::Finish), Phase::Idle);

        // Done is terminal for this table
        fsm.send(Signal::Activate);
        fsm.send(Signal::Finish);
        assert!(!fsm.can_send(Signal::Activate));
        assert_eq!(fsm.send(Signal::Cancel), Phase::Done);
    }

    #[test]
    fn test_redefined_transition_wins() {
        let mut fsm = StateMachine::builder(Phase::Idle)
            .on(Phase::Idle, Signal::Activate, Phase::Running)
            .on(Phase::Idle, Signal::Activate, Phase::Done)
            .build();

        assert_eq!(fsm.send(Signal::Activate), Phase::Done);
    }
}
