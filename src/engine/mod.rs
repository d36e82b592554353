//! The transition engine.
//!
//! - **Resolver**: pure mapping from snapshot and message to the next snapshot
//! - **Context channel**: [`ContextUpdater`], the only way effects change context
//! - **Scheduler**: runs exit cleanup then entry effect on value changes
//! - **Runtime**: [`Machine`], which owns the snapshot and the message queue

mod channel;
mod error;
mod message;
mod resolver;
mod runtime;
mod scheduler;

pub use channel::{ContextUpdater, Dispatcher};
pub use error::MachineError;
pub use resolver::{resolve_event, Resolution};
pub use runtime::Machine;
