//! Whole-configuration validation.
//!
//! Uses Stillwater's `Validation` so that every dangling reference is
//! reported in one pass instead of stopping at the first.

use crate::config::error::ConfigIssue;
use crate::config::Configuration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

impl<C> Configuration<C> {
    /// Check that the initial state and every transition target exist.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statekit::{ConfigIssue, Configuration, StateDefinition};
    /// use stillwater::validation::Validation;
    ///
    /// let config = Configuration::<()>::builder()
    ///     .initial("start")
    ///     .state("idle", StateDefinition::builder().on("GO", "gone"))
    ///     .build()
    ///     .unwrap();
    ///
    /// match config.validate() {
    ///     Validation::Failure(issues) => assert_eq!(issues.len(), 2),
    ///     Validation::Success(_) => panic!("expected issues"),
    /// }
    /// ```
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigIssue>>> = Vec::new();

        checks.push(if self.states.contains_key(&self.initial) {
            Validation::success(())
        } else {
            Validation::fail(ConfigIssue::UnknownInitial(self.initial.clone()))
        });

        for (state, definition) in &self.states {
            for (event, transition) in definition.transitions() {
                let target = transition.target();
                checks.push(if self.states.contains_key(target) {
                    Validation::success(())
                } else {
                    Validation::fail(ConfigIssue::UnknownTarget {
                        state: state.clone(),
                        event: event.to_string(),
                        target: target.to_string(),
                    })
                });
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}
