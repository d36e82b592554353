//! Core machine types.
//!
//! This module holds the plain data of the runtime:
//! - Snapshots via [`MachineState`]
//! - Guard predicates for transition control
//! - Bounded history of state-value changes
//!
//! Nothing here performs side effects.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::{EventName, MachineState, StateName};
