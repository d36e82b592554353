//! Context channel handed to effects.

use crate::core::EventName;
use crate::engine::error::MachineError;
use crate::engine::message::Message;
use crate::engine::runtime::Shared;
use std::fmt;
use std::rc::Weak;
use tracing::{debug, error};

/// Handle through which effects replace the context.
///
/// `update` does not apply the change synchronously: it enqueues a context
/// update that is resolved after the current message (including its
/// effects) has completed. Value and `next_events` are never touched.
pub struct ContextUpdater<C> {
    shared: Weak<Shared<C>>,
}

impl<C> ContextUpdater<C> {
    pub(crate) fn new(shared: Weak<Shared<C>>) -> Self {
        Self { shared }
    }
}

impl<C: Clone + 'static> ContextUpdater<C> {
    /// Enqueue `updater`, which maps the current context to its replacement.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&C) -> C + 'static,
    {
        let Some(shared) = self.shared.upgrade() else {
            debug!("context update dropped: machine is gone");
            return;
        };

        match shared.submit(Message::ContextUpdate(Box::new(updater))) {
            Ok(()) => {}
            Err(MachineError::Stopped) => debug!("context update dropped: machine stopped"),
            Err(err) => error!(error = %err, "context update drain failed"),
        }
    }
}

impl<C> Clone for ContextUpdater<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<C> fmt::Debug for ContextUpdater<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextUpdater")
            .field("attached", &(self.shared.strong_count() > 0))
            .finish()
    }
}

/// Weak handle for dispatching events from effects or host callbacks.
///
/// Dispatching while the machine is already processing a message queues the
/// event behind it and returns `Ok(())`.
pub struct Dispatcher<C> {
    shared: Weak<Shared<C>>,
}

impl<C> Dispatcher<C> {
    pub(crate) fn new(shared: Weak<Shared<C>>) -> Self {
        Self { shared }
    }
}

impl<C: Clone + 'static> Dispatcher<C> {
    pub fn dispatch(&self, event: impl Into<EventName>) -> Result<(), MachineError> {
        let shared = self.shared.upgrade().ok_or(MachineError::Stopped)?;
        shared.submit(Message::Event(event.into()))
    }
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("attached", &(self.shared.strong_count() > 0))
            .finish()
    }
}
