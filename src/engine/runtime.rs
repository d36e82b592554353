//! Machine runtime.
//!
//! Owns the canonical snapshot and serializes every control message
//! (events and context updates) through a FIFO queue. A message is resolved,
//! committed, and its effects run before the next message is looked at, so
//! `dispatch` or `update` calls made from inside an effect are queued rather
//! than recursing.

use crate::config::Configuration;
use crate::core::{EventName, MachineState, StateHistory, StateTransition};
use crate::engine::channel::{ContextUpdater, Dispatcher};
use crate::engine::error::MachineError;
use crate::engine::message::Message;
use crate::engine::resolver::{resolve, Resolution};
use crate::engine::scheduler::EffectScheduler;
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use stillwater::validation::Validation;
use tracing::{debug, trace};

pub(crate) struct Shared<C> {
    config: Configuration<C>,
    state: RefCell<Rc<MachineState<C>>>,
    history: RefCell<Rc<StateHistory>>,
    scheduler: EffectScheduler<C>,
    queue: RefCell<VecDeque<Message<C>>>,
    draining: Cell<bool>,
    stopped: Cell<bool>,
}

/// Marks the queue as being drained; clears the mark on every exit path,
/// including unwinding out of a caller-supplied guard or effect.
struct DrainGuard<'a, C> {
    shared: &'a Shared<C>,
}

impl<'a, C> DrainGuard<'a, C> {
    fn enter(shared: &'a Shared<C>) -> Self {
        shared.draining.set(true);
        Self { shared }
    }
}

impl<C> Drop for DrainGuard<'_, C> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut queue) = self.shared.queue.try_borrow_mut() {
                queue.clear();
            }
        }
        self.shared.draining.set(false);
    }
}

impl<C: Clone + 'static> Shared<C> {
    fn updater(self: &Rc<Self>) -> ContextUpdater<C> {
        ContextUpdater::new(Rc::downgrade(self))
    }

    fn start(self: &Rc<Self>) -> Result<(), MachineError> {
        {
            let _guard = DrainGuard::enter(self);
            let initial = self.config.initial();
            self.scheduler
                .start(initial, self.config.state(initial), &self.updater());
        }
        self.drain()
    }

    /// Enqueue `message`; process the queue unless a drain is already running.
    pub(crate) fn submit(self: &Rc<Self>, message: Message<C>) -> Result<(), MachineError> {
        if self.stopped.get() {
            return Err(MachineError::Stopped);
        }

        self.queue.borrow_mut().push_back(message);
        if self.draining.get() {
            trace!("message queued behind running drain");
            return Ok(());
        }
        self.drain()
    }

    fn drain(self: &Rc<Self>) -> Result<(), MachineError> {
        let _guard = DrainGuard::enter(self);
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(message) = next else {
                return Ok(());
            };
            if let Err(err) = self.step(message) {
                let dropped = {
                    let mut queue = self.queue.borrow_mut();
                    let dropped = queue.len();
                    queue.clear();
                    dropped
                };
                debug!(error = %err, dropped, "drain aborted");
                return Err(err);
            }
        }
    }

    fn step(self: &Rc<Self>, message: Message<C>) -> Result<(), MachineError> {
        let previous = Rc::clone(&self.state.borrow());
        let event = message.event().map(str::to_owned);

        let next = match resolve(&previous, message, &self.config)? {
            Resolution::Unchanged => return Ok(()),
            Resolution::Next(next) => Rc::new(next),
        };
        *self.state.borrow_mut() = Rc::clone(&next);

        if next.value == previous.value {
            trace!(state = %next.value, "snapshot replaced, value unchanged");
            return Ok(());
        }

        debug!(from = %previous.value, to = %next.value, event = ?event, "transition");
        if let Some(event) = event {
            let record = StateTransition {
                from: previous.value.clone(),
                to: next.value.clone(),
                event,
                timestamp: Utc::now(),
            };
            Rc::make_mut(&mut *self.history.borrow_mut()).push(record);
        }

        self.scheduler
            .on_value_change(&next.value, self.config.state(&next.value), &self.updater());
        Ok(())
    }
}

/// A running state machine.
///
/// # Example
///
/// ```rust
/// use statekit::{Configuration, Machine, StateDefinition};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: u32,
/// }
///
/// let config = Configuration::<Counter>::builder()
///     .initial("inactive")
///     .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
///     .state(
///         "active",
///         StateDefinition::builder()
///             .on("TOGGLE", "inactive")
///             .entry(|ctx| ctx.update(|c: &Counter| Counter { count: c.count + 1 })),
///     )
///     .build()
///     .unwrap();
///
/// let machine = Machine::new(config, Counter { count: 0 }).unwrap();
/// machine.dispatch("TOGGLE").unwrap();
///
/// let snapshot = machine.snapshot();
/// assert_eq!(snapshot.value, "active");
/// assert_eq!(snapshot.context, Counter { count: 1 });
/// ```
pub struct Machine<C: Clone + 'static> {
    shared: Rc<Shared<C>>,
}

impl<C: Clone + 'static> Machine<C> {
    /// Validate `config`, build the initial snapshot and run the initial
    /// state's entry effect.
    pub fn new(config: Configuration<C>, context: C) -> Result<Self, MachineError> {
        if let Validation::Failure(issues) = config.validate() {
            return Err(MachineError::InvalidConfig(issues.iter().cloned().collect()));
        }

        let initial = MachineState {
            value: config.initial().to_string(),
            context,
            next_events: config.next_events(config.initial()),
        };
        debug!(initial = %initial.value, states = config.states.len(), "starting machine");

        let history_limit = config.history_limit();
        let shared = Rc::new(Shared {
            config,
            state: RefCell::new(Rc::new(initial)),
            history: RefCell::new(Rc::new(StateHistory::with_limit(history_limit))),
            scheduler: EffectScheduler::new(),
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            stopped: Cell::new(false),
        });
        shared.start()?;

        Ok(Machine { shared })
    }

    /// Send `event` to the machine.
    ///
    /// Unrecognized events and denied guards leave the snapshot unchanged
    /// and return `Ok(())`. Called from inside an effect, the event is
    /// queued and processed once the current message completes.
    pub fn dispatch(&self, event: impl Into<EventName>) -> Result<(), MachineError> {
        let event = event.into();
        trace!(event = %event, "dispatch");
        self.shared.submit(Message::Event(event))
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Rc<MachineState<C>> {
        Rc::clone(&self.shared.state.borrow())
    }

    /// Check whether the active state lists `event`.
    pub fn can(&self, event: &str) -> bool {
        self.snapshot().can(event)
    }

    /// Recorded state-value changes, bounded by
    /// [`Configuration::history_limit`].
    ///
    /// The returned history is a snapshot; later changes do not show up in it.
    pub fn history(&self) -> Rc<StateHistory> {
        Rc::clone(&self.shared.history.borrow())
    }

    pub fn config(&self) -> &Configuration<C> {
        &self.shared.config
    }

    /// Weak handle for dispatching from effects or callbacks.
    pub fn dispatcher(&self) -> Dispatcher<C> {
        Dispatcher::new(Rc::downgrade(&self.shared))
    }

    /// Stop the machine, releasing the active state's cleanup.
    ///
    /// Equivalent to dropping it.
    pub fn stop(self) {}
}

impl<C: Clone + 'static> Drop for Machine<C> {
    fn drop(&mut self) {
        self.shared.stopped.set(true);
        self.shared.queue.borrow_mut().clear();
        if self.shared.scheduler.has_pending() {
            debug!(state = %self.snapshot().value, "releasing cleanup on stop");
            self.shared.scheduler.release(&self.shared.updater());
        }
    }
}

impl<C: Clone + std::fmt::Debug + 'static> std::fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.snapshot())
            .finish()
    }
}
