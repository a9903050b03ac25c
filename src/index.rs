//! # Index Module
//!
//! Groups the action catalog by the predicates each action produces, so the
//! search can look up the producers of a goal without scanning every action.

use crate::{Action, Value};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Actions able to produce a given state variable.
#[derive(Debug, Clone, Default)]
struct Producers {
    /// Actions whose effect pins the variable to a value
    by_value: IndexMap<Value, Vec<usize>>,
    /// Service actions whose effect accepts any value
    wildcard: Vec<usize>,
}

/// Lookup from `(variable, value)` to the actions whose effects produce it.
///
/// Candidate lists keep catalog order, which is the tie-break order of the
/// search. The index is only ever rebuilt as a whole from a new catalog.
///
/// # Examples
///
/// ```
/// use action_graph::{Action, ActionIndex, Value};
///
/// let rent = Action::new("rent_car", 30.0).unwrap().with_service_effect("has_car");
/// let borrow = Action::new("borrow_car", 5.0).unwrap().with_effect("has_car", "beetle");
/// let index = ActionIndex::build(vec![rent, borrow]);
///
/// let names = |key: &str, value: Value| -> Vec<String> {
///     index.candidates(key, &value).iter().map(|a| a.name.clone()).collect()
/// };
/// assert_eq!(names("has_car", Value::from("beetle")), ["borrow_car"]);
/// assert_eq!(names("has_car", Value::from("delorean")), ["rent_car"]);
/// assert!(names("has_boat", Value::Bool(true)).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionIndex {
    actions: Vec<Action>,
    producers: HashMap<String, Producers>,
}

impl ActionIndex {
    /// Builds the index from the full action catalog.
    pub fn build(actions: Vec<Action>) -> Self {
        let mut producers: HashMap<String, Producers> = HashMap::new();
        for (position, action) in actions.iter().enumerate() {
            for (key, value) in action.effects.iter() {
                let entry = producers.entry(key.to_string()).or_default();
                if value.is_wildcard() {
                    entry.wildcard.push(position);
                } else {
                    entry.by_value.entry(value.clone()).or_default().push(position);
                }
            }
        }
        Self { actions, producers }
    }

    /// Actions producing exactly `(key, value)`, falling back to the service
    /// actions for `key` when none pin that value.
    pub fn candidates(&self, key: &str, value: &Value) -> Vec<&Action> {
        let Some(producers) = self.producers.get(key) else {
            return Vec::new();
        };
        let positions = producers
            .by_value
            .get(value)
            .filter(|positions| !positions.is_empty())
            .unwrap_or(&producers.wildcard);
        positions.iter().map(|&i| &self.actions[i]).collect()
    }

    /// The catalog the index was built from, in its original order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of distinct state variables some action can produce.
    pub fn variable_count(&self) -> usize {
        self.producers.len()
    }
}
