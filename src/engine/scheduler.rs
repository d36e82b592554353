//! Entry/exit effect scheduling.
//!
//! Effects are tied to changes of the state value only. The scheduler keeps
//! the cleanup returned by the active entry effect and releases it exactly
//! once, before the next entry effect runs.

use crate::config::{Cleanup, StateDefinition};
use crate::engine::channel::ContextUpdater;
use std::cell::RefCell;
use tracing::trace;

pub(crate) struct EffectScheduler<C> {
    pending: RefCell<Option<Cleanup<C>>>,
}

impl<C> EffectScheduler<C> {
    pub(crate) fn new() -> Self {
        Self {
            pending: RefCell::new(None),
        }
    }

    /// Run the initial state's entry effect.
    pub(crate) fn start(
        &self,
        state: &str,
        definition: Option<&StateDefinition<C>>,
        update: &ContextUpdater<C>,
    ) {
        self.enter(state, definition, update);
    }

    /// The value changed to `state`: release the previous cleanup, then run
    /// the new entry effect.
    pub(crate) fn on_value_change(
        &self,
        state: &str,
        definition: Option<&StateDefinition<C>>,
        update: &ContextUpdater<C>,
    ) {
        self.release(update);
        self.enter(state, definition, update);
    }

    /// Release the pending cleanup, if any.
    pub(crate) fn release(&self, update: &ContextUpdater<C>) {
        // Borrow ends before the callback runs.
        let pending = self.pending.borrow_mut().take();
        if let Some(cleanup) = pending {
            trace!("running exit cleanup");
            cleanup.release(update);
        }
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    fn enter(
        &self,
        state: &str,
        definition: Option<&StateDefinition<C>>,
        update: &ContextUpdater<C>,
    ) {
        let Some(effect) = definition.and_then(StateDefinition::effect) else {
            return;
        };
        trace!(state, "running entry effect");
        let cleanup = effect.enter(update);
        *self.pending.borrow_mut() = cleanup;
    }
}
