//! Control messages flowing through the runtime queue.
//!
//! Context updates travel through the same queue as events. The enum is
//! crate-private, so callers can only ever produce `Event`.

use crate::core::EventName;
use std::fmt;

pub(crate) type ContextFn<C> = Box<dyn FnOnce(&C) -> C>;

pub(crate) enum Message<C> {
    Event(EventName),
    ContextUpdate(ContextFn<C>),
}

impl<C> Message<C> {
    pub(crate) fn event(&self) -> Option<&str> {
        match self {
            Message::Event(event) => Some(event),
            Message::ContextUpdate(_) => None,
        }
    }
}

impl<C> fmt::Debug for Message<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Message::ContextUpdate(_) => f.write_str("ContextUpdate(..)"),
        }
    }
}
