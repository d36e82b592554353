//! Statekit: a small embeddable finite state machine runtime
//!
//! A machine is declared as a [`Configuration`]: an initial state and a set
//! of named states, each listing the events it accepts, the transition each
//! event takes (optionally behind a [`Guard`]), and an optional entry
//! [`Effect`] that may return a [`Cleanup`]. A [`Machine`] then owns the
//! current [`MachineState`] and is driven by dispatching event names.
//!
//! # Core Concepts
//!
//! - **Resolution**: pure; unknown events and denied guards are no-ops
//! - **Context**: auxiliary data changed only through [`ContextUpdater`]
//! - **Effects**: run on state-value changes only, exit before entry
//!
//! # Example
//!
//! ```rust
//! use statekit::{Configuration, Machine, StateDefinition, Transition};
//!
//! let config = Configuration::<()>::builder()
//!     .initial("inactive")
//!     .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
//!     .state(
//!         "active",
//!         StateDefinition::builder().on("TOGGLE", Transition::to("inactive").when(|_, _| true)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let machine = Machine::new(config, ()).unwrap();
//! machine.dispatch("TOGGLE").unwrap();
//! assert_eq!(machine.snapshot().value, "active");
//!
//! machine.dispatch("UNKNOWN").unwrap();
//! assert_eq!(machine.snapshot().value, "active");
//! ```

pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::config::{
    BuildError, Cleanup, ConfigIssue, Configuration, Effect, StateDefinition, Transition,
};
pub use crate::core::{
    EventName, Guard, MachineState, StateHistory, StateName, StateTransition, DEFAULT_HISTORY_LIMIT,
};
pub use crate::engine::{
    resolve_event, ContextUpdater, Dispatcher, Machine, MachineError, Resolution,
};
