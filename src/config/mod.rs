//! Declarative machine configuration.
//!
//! A [`Configuration`] names the initial state and maps every state name to
//! a [`StateDefinition`]: the events it reacts to and an optional entry
//! [`Effect`]. It holds no runtime state of its own.

pub mod builder;
pub mod error;
mod validate;

pub use builder::{ConfigurationBuilder, StateBuilder};
pub use error::{BuildError, ConfigIssue};

use crate::core::{EventName, Guard, StateName};
use crate::engine::ContextUpdater;
use std::collections::BTreeMap;
use std::fmt;

/// Edge taken when an event is accepted.
///
/// The shorthand form is just a target name; the detailed form may carry a
/// [`Guard`].
///
/// # Example
///
/// ```rust
/// use statekit::Transition;
///
/// let plain: Transition = "active".into();
/// assert_eq!(plain.target(), "active");
///
/// let denied = Transition::to("active").when(|_value, _event| false);
/// assert!(!denied.allows("inactive", "TOGGLE"));
/// ```
#[derive(Debug)]
pub enum Transition {
    /// Bare target state name
    Target(StateName),

    /// Target with an optional guard
    Guarded {
        target: StateName,
        guard: Option<Guard>,
    },
}

impl Transition {
    /// Detailed transition with no guard yet.
    pub fn to(target: impl Into<StateName>) -> Self {
        Transition::Guarded {
            target: target.into(),
            guard: None,
        }
    }

    /// Attach a guard over `(current_value, event)`.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + 'static,
    {
        self.guarded_by(Guard::new(predicate))
    }

    /// Attach a prebuilt guard.
    pub fn guarded_by(self, guard: Guard) -> Self {
        let target = match self {
            Transition::Target(target) => target,
            Transition::Guarded { target, .. } => target,
        };
        Transition::Guarded {
            target,
            guard: Some(guard),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Transition::Target(target) => target,
            Transition::Guarded { target, .. } => target,
        }
    }

    pub fn guard(&self) -> Option<&Guard> {
        match self {
            Transition::Target(_) => None,
            Transition::Guarded { guard, .. } => guard.as_ref(),
        }
    }

    /// Check whether the transition may fire from `value` on `event`.
    pub fn allows(&self, value: &str, event: &str) -> bool {
        self.guard().is_none_or(|g| g.check(value, event))
    }
}

impl From<&str> for Transition {
    fn from(target: &str) -> Self {
        Transition::Target(target.to_string())
    }
}

impl From<String> for Transition {
    fn from(target: String) -> Self {
        Transition::Target(target)
    }
}

/// Release action returned by an entry effect.
///
/// Runs exactly once, when the machine leaves the state whose effect
/// produced it (or when the machine is stopped).
pub struct Cleanup<C> {
    release: Box<dyn FnOnce(&ContextUpdater<C>)>,
}

impl<C> Cleanup<C> {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce(&ContextUpdater<C>) + 'static,
    {
        Cleanup {
            release: Box::new(release),
        }
    }

    pub(crate) fn release(self, update: &ContextUpdater<C>) {
        (self.release)(update)
    }
}

impl<C> fmt::Debug for Cleanup<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleanup(..)")
    }
}

/// Entry effect of a state.
///
/// Invoked each time the state value changes to the owning state. It may
/// enqueue context updates and may return a [`Cleanup`].
pub struct Effect<C> {
    enter: Box<dyn Fn(&ContextUpdater<C>) -> Option<Cleanup<C>>>,
}

impl<C> Effect<C> {
    pub fn new<F>(enter: F) -> Self
    where
        F: Fn(&ContextUpdater<C>) -> Option<Cleanup<C>> + 'static,
    {
        Effect {
            enter: Box::new(enter),
        }
    }

    pub(crate) fn enter(&self, update: &ContextUpdater<C>) -> Option<Cleanup<C>> {
        (self.enter)(update)
    }
}

impl<C> fmt::Debug for Effect<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Effect(..)")
    }
}

/// Definition of a single state.
#[derive(Debug)]
pub struct StateDefinition<C> {
    pub(crate) on: Vec<(EventName, Transition)>,
    pub(crate) effect: Option<Effect<C>>,
}

impl<C> StateDefinition<C> {
    pub fn builder() -> StateBuilder<C> {
        StateBuilder::new()
    }

    /// Transition registered for `event`, if any.
    pub fn transition(&self, event: &str) -> Option<&Transition> {
        self.on
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, transition)| transition)
    }

    /// Accepted events with their transitions, in declaration order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &Transition)> {
        self.on
            .iter()
            .map(|(event, transition)| (event.as_str(), transition))
    }

    /// Accepted event names, in declaration order.
    pub fn event_names(&self) -> Vec<EventName> {
        self.on.iter().map(|(event, _)| event.clone()).collect()
    }

    pub fn effect(&self) -> Option<&Effect<C>> {
        self.effect.as_ref()
    }
}

/// Complete machine configuration.
///
/// # Example
///
/// ```rust
/// use statekit::{Configuration, StateDefinition, Transition};
///
/// let config = Configuration::<()>::builder()
///     .initial("inactive")
///     .state(
///         "inactive",
///         StateDefinition::builder()
///             .on("TOGGLE", Transition::to("active").when(|_, _| true)),
///     )
///     .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.initial(), "inactive");
/// assert_eq!(config.next_events("active"), vec!["TOGGLE".to_string()]);
/// assert!(config.next_events("missing").is_empty());
/// ```
#[derive(Debug)]
pub struct Configuration<C> {
    pub(crate) initial: StateName,
    pub(crate) states: BTreeMap<StateName, StateDefinition<C>>,
    pub(crate) history_limit: usize,
}

impl<C> Configuration<C> {
    pub fn builder() -> ConfigurationBuilder<C> {
        ConfigurationBuilder::new()
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn state(&self, name: &str) -> Option<&StateDefinition<C>> {
        self.states.get(name)
    }

    /// Maximum number of state-value changes a machine keeps.
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// All states, ordered by name.
    pub fn states(&self) -> impl Iterator<Item = (&str, &StateDefinition<C>)> {
        self.states.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Events accepted by `value`; empty when the state is unknown or has
    /// no `on` table.
    pub fn next_events(&self, value: &str) -> Vec<EventName> {
        self.state(value)
            .map(StateDefinition::event_names)
            .unwrap_or_default()
    }
}
