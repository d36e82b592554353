//! Machine snapshots.
//!
//! A [`MachineState`] is the externally visible view of a running machine:
//! the active state value, the current context, and the events that the
//! active state accepts. Snapshots are immutable; every change produces a
//! new one.

use serde::{Deserialize, Serialize};

/// Name of a state node.
pub type StateName = String;

/// Name of an event.
pub type EventName = String;

/// Immutable snapshot of a machine.
///
/// `next_events` always lists exactly the event keys of the active state's
/// `on` table, in declaration order. It is recomputed whenever `value`
/// changes and left alone when only the context changes.
///
/// # Example
///
/// ```rust
/// use statekit::{Configuration, Machine, StateDefinition};
///
/// let config = Configuration::<()>::builder()
///     .initial("inactive")
///     .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
///     .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
///     .build()
///     .unwrap();
///
/// let machine = Machine::new(config, ()).unwrap();
/// let snapshot = machine.snapshot();
///
/// assert!(snapshot.matches("inactive"));
/// assert_eq!(snapshot.next_events, vec!["TOGGLE".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineState<C> {
    /// Name of the active state
    pub value: StateName,
    /// Auxiliary data carried alongside the state value
    pub context: C,
    /// Events accepted by the active state
    pub next_events: Vec<EventName>,
}

impl<C> MachineState<C> {
    /// Check whether the active state is `value`.
    pub fn matches(&self, value: &str) -> bool {
        self.value == value
    }

    /// Check whether the active state lists `event` in its `on` table.
    ///
    /// Guards are not evaluated, so a listed event may still be denied.
    pub fn can(&self, event: &str) -> bool {
        self.next_events.iter().any(|e| e == event)
    }
}
