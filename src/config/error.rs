//! Errors raised while assembling or validating a configuration.

use thiserror::Error;

/// Errors that can occur when building a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(name) before .build()")]
    MissingInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("State '{0}' is defined more than once")]
    DuplicateState(String),

    #[error("State '{state}' declares event '{event}' more than once")]
    DuplicateEvent { state: String, event: String },
}

/// A single problem found by [`Configuration::validate`](super::Configuration::validate).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error("initial state '{0}' is not defined")]
    UnknownInitial(String),

    #[error("transition '{event}' in state '{state}' targets undefined state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },
}
