//! Transition resolution.
//!
//! Pure functions mapping a snapshot and a message to the next snapshot.
//! Nothing here touches the runtime, the queue, or effects.

use crate::config::Configuration;
use crate::core::MachineState;
use crate::engine::error::MachineError;
use crate::engine::message::Message;
use tracing::{debug, trace};

/// Outcome of resolving one message.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<C> {
    /// Event not recognized, or denied by a guard
    Unchanged,

    /// A new snapshot; the value may or may not differ
    Next(MachineState<C>),
}

impl<C> Resolution<C> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Resolution::Unchanged)
    }
}

/// Resolve `event` against `state`.
///
/// Unknown events and denied guards resolve to [`Resolution::Unchanged`].
/// The guard sees the current value and the event name only.
///
/// # Example
///
/// ```rust
/// use statekit::{resolve_event, Configuration, MachineState, Resolution, StateDefinition};
///
/// let config = Configuration::<()>::builder()
///     .initial("inactive")
///     .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
///     .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
///     .build()
///     .unwrap();
///
/// let state = MachineState {
///     value: "inactive".to_string(),
///     context: (),
///     next_events: config.next_events("inactive"),
/// };
///
/// match resolve_event(&state, "TOGGLE", &config).unwrap() {
///     Resolution::Next(next) => assert_eq!(next.value, "active"),
///     Resolution::Unchanged => panic!("expected a transition"),
/// }
/// assert!(resolve_event(&state, "UNKNOWN", &config).unwrap().is_unchanged());
/// ```
pub fn resolve_event<C: Clone>(
    state: &MachineState<C>,
    event: &str,
    config: &Configuration<C>,
) -> Result<Resolution<C>, MachineError> {
    let current = config
        .state(&state.value)
        .ok_or_else(|| MachineError::UnknownState(state.value.clone()))?;

    let Some(transition) = current.transition(event) else {
        trace!(state = %state.value, event, "event not handled");
        return Ok(Resolution::Unchanged);
    };

    if !transition.allows(&state.value, event) {
        debug!(state = %state.value, event, "guard denied transition");
        return Ok(Resolution::Unchanged);
    }

    let target = transition.target();
    let next = config
        .state(target)
        .ok_or_else(|| MachineError::UnknownTarget {
            from: state.value.clone(),
            event: event.to_string(),
            target: target.to_string(),
        })?;

    Ok(Resolution::Next(MachineState {
        value: target.to_string(),
        context: state.context.clone(),
        next_events: next.event_names(),
    }))
}

pub(crate) fn resolve<C: Clone>(
    state: &MachineState<C>,
    message: Message<C>,
    config: &Configuration<C>,
) -> Result<Resolution<C>, MachineError> {
    match message {
        Message::Event(event) => resolve_event(state, &event, config),
        Message::ContextUpdate(updater) => Ok(Resolution::Next(MachineState {
            value: state.value.clone(),
            context: updater(&state.context),
            next_events: state.next_events.clone(),
        })),
    }
}
