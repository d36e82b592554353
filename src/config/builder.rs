//! Fluent builders for configurations and state definitions.

use crate::config::error::BuildError;
use crate::config::{Cleanup, Configuration, Effect, StateDefinition, Transition};
use crate::core::{EventName, StateName, DEFAULT_HISTORY_LIMIT};
use crate::engine::ContextUpdater;
use std::collections::BTreeMap;

/// Builder for a single [`StateDefinition`].
pub struct StateBuilder<C> {
    on: Vec<(EventName, Transition)>,
    effect: Option<Effect<C>>,
}

impl<C> StateBuilder<C> {
    pub fn new() -> Self {
        Self {
            on: Vec::new(),
            effect: None,
        }
    }

    /// React to `event` with `transition`.
    ///
    /// Accepts a bare target name or a detailed [`Transition`].
    pub fn on(mut self, event: impl Into<EventName>, transition: impl Into<Transition>) -> Self {
        self.on.push((event.into(), transition.into()));
        self
    }

    /// Set the entry effect.
    pub fn effect<F>(mut self, enter: F) -> Self
    where
        F: Fn(&ContextUpdater<C>) -> Option<Cleanup<C>> + 'static,
    {
        self.effect = Some(Effect::new(enter));
        self
    }

    /// Set an entry effect that never returns a cleanup.
    pub fn entry<F>(self, enter: F) -> Self
    where
        F: Fn(&ContextUpdater<C>) + 'static,
    {
        self.effect(move |update| {
            enter(update);
            None
        })
    }

    pub(crate) fn build(self, state: &str) -> Result<StateDefinition<C>, BuildError> {
        for (i, (event, _)) in self.on.iter().enumerate() {
            if self.on[..i].iter().any(|(earlier, _)| earlier == event) {
                return Err(BuildError::DuplicateEvent {
                    state: state.to_string(),
                    event: event.clone(),
                });
            }
        }

        Ok(StateDefinition {
            on: self.on,
            effect: self.effect,
        })
    }
}

impl<C> Default for StateBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Configuration`].
///
/// Only structural problems are reported here. Dangling transition targets
/// and an undefined initial state are caught by
/// [`Configuration::validate`], which [`Machine::new`](crate::Machine::new)
/// runs before starting.
pub struct ConfigurationBuilder<C> {
    initial: Option<StateName>,
    states: Vec<(StateName, StateBuilder<C>)>,
    history_limit: usize,
}

impl<C> ConfigurationBuilder<C> {
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, name: impl Into<StateName>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a state.
    pub fn state(mut self, name: impl Into<StateName>, definition: StateBuilder<C>) -> Self {
        self.states.push((name.into(), definition));
        self
    }

    /// Keep at most `limit` state-value changes in the machine's history.
    ///
    /// Defaults to [`DEFAULT_HISTORY_LIMIT`]; zero disables recording.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn build(self) -> Result<Configuration<C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut states = BTreeMap::new();
        for (name, builder) in self.states {
            if states.contains_key(&name) {
                return Err(BuildError::DuplicateState(name));
            }
            let definition = builder.build(&name)?;
            states.insert(name, definition);
        }

        Ok(Configuration {
            initial,
            states,
            history_limit: self.history_limit,
        })
    }
}

impl<C> Default for ConfigurationBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
