//! Guard predicates for controlling transitions.
//!
//! A guard decides whether a transition may fire. It receives the current
//! state value and the event name, not the context.

use std::fmt;

/// Predicate that gates a transition.
///
/// # Example
///
/// ```rust
/// use statekit::Guard;
///
/// let only_toggle = Guard::new(|_value: &str, event: &str| event == "TOGGLE");
///
/// assert!(only_toggle.check("inactive", "TOGGLE"));
/// assert!(!only_toggle.check("inactive", "RESET"));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&str, &str) -> bool>,
}

impl Guard {
    /// Create a guard from a predicate over `(current_value, event)`.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard. `true` allows the transition.
    pub fn check(&self, value: &str, event: &str) -> bool {
        (self.predicate)(value, event)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
