//! Runtime errors.

use crate::config::ConfigIssue;
use thiserror::Error;

/// Errors surfaced by [`Machine`](super::Machine) construction and dispatch.
///
/// Unrecognized events and denied guards are not errors; they leave the
/// snapshot unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("Invalid configuration: {}", join_issues(.0))]
    InvalidConfig(Vec<ConfigIssue>),

    #[error("State '{0}' is not defined")]
    UnknownState(String),

    #[error("Transition '{event}' from '{from}' targets undefined state '{target}'")]
    UnknownTarget {
        from: String,
        event: String,
        target: String,
    },

    #[error("Machine has been stopped")]
    Stopped,
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
