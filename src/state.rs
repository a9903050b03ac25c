//! # State Module
//!
//! This module provides the `State` structure, which represents world states,
//! goals, preconditions and effects within the planner.
//!
//! ## What is State here?
//!
//! A state is a snapshot of facts about the world. The planner uses states in
//! several ways:
//!
//! - **Start State**: the facts that hold right now
//! - **Goal State**: the facts the caller wants to hold
//! - **Preconditions**: facts that must hold before an action can fire
//! - **Effects**: facts an action makes true
//!
//! Each fact is a *predicate*, a `(variable, value)` pair. Entries keep their
//! insertion order, which decides which predicate of a goal is solved first
//! and the order in which preconditions are expanded. Equality only looks at
//! the pairs themselves.
//!
//! ## Basic Usage
//!
//! ```
//! use action_graph::{State, Value};
//!
//! let mut current = State::new();
//! current.set("has_axe", true);
//! current.set("location", "forest");
//!
//! let mut goal = State::new();
//! goal.set("location", "forest");
//!
//! assert!(current.satisfies(&goal));
//! assert!(current.contains("has_axe", &Value::Bool(true)));
//! assert_eq!(current.first(), Some(("has_axe", &Value::Bool(true))));
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An insertion-ordered collection of `(variable, value)` predicates.
///
/// # Examples
///
/// ```
/// use action_graph::{State, Value};
///
/// let mut state = State::new();
/// state.set("player_has_key", "golden_key");
/// state.set("door_is_open", false);
///
/// assert_eq!(state.get("player_has_key"), Some(&Value::from("golden_key")));
/// assert_eq!(state.get("door_is_open"), Some(&Value::Bool(false)));
/// assert_eq!(state.get("non_existent_variable"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: IndexMap<String, Value>,
}

impl State {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Creates a state holding a single predicate.
    ///
    /// ```
    /// use action_graph::State;
    ///
    /// let goal = State::single("wood_chopped", true);
    /// assert_eq!(goal.len(), 1);
    /// ```
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut state = Self::new();
        state.set(key, value);
        state
    }

    /// Sets a state value for the specified key.
    ///
    /// Updating an existing key keeps its original position.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_graph::{State, Value};
    ///
    /// let mut state = State::new();
    /// state.set("has_ammo", 30);
    /// state.set("enemy_visible", false);
    /// state.set("has_ammo", 25);
    ///
    /// assert_eq!(state.get("has_ammo"), Some(&Value::Int(25)));
    /// assert_eq!(state.first().map(|(key, _)| key), Some("has_ammo"));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Gets the value for a state variable.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns `true` when the exact `(key, value)` predicate is present.
    pub fn contains(&self, key: &str, value: &Value) -> bool {
        self.values.get(key) == Some(value)
    }

    /// The first predicate in insertion order.
    pub fn first(&self) -> Option<(&str, &Value)> {
        self.get_index(0)
    }

    /// The predicate at position `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.values
            .get_index(index)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Checks if this state satisfies another state's requirements.
    ///
    /// A state satisfies another state if for every key-value pair in the other state,
    /// this state has the same key with the same value. This state may contain
    /// additional key-value pairs that are not present in the other state.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_graph::State;
    ///
    /// let mut world_state = State::new();
    /// world_state.set("has_key", true);
    /// world_state.set("door_open", false);
    ///
    /// let mut goal_state = State::new();
    /// goal_state.set("door_open", true);
    /// assert!(!world_state.satisfies(&goal_state));
    ///
    /// // An empty requirement is always met
    /// assert!(world_state.satisfies(&State::new()));
    /// ```
    pub fn satisfies(&self, other: &State) -> bool {
        other
            .values
            .iter()
            .all(|(key, value)| self.contains(key, value))
    }

    /// Applies the effects of another state to this state.
    ///
    /// Wildcard effects carry no concrete value and leave the variable untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_graph::{State, Value};
    ///
    /// let mut state = State::new();
    /// state.set("has_key", false);
    ///
    /// let mut effects = State::new();
    /// effects.set("has_key", true);
    /// effects.set("has_car", Value::Any);
    ///
    /// state.apply_effects(&effects);
    /// assert_eq!(state.get("has_key"), Some(&Value::Bool(true)));
    /// assert_eq!(state.get("has_car"), None);
    /// ```
    pub fn apply_effects(&mut self, effects: &Self) {
        for (key, value) in effects.iter() {
            if !value.is_wildcard() {
                self.set(key, value.clone());
            }
        }
    }

    /// Iterates the predicates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the state holds no predicates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets all the key-value pairs in the state.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }
}

// Equality ignores insertion order, so the hash must as well.
impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.values.iter().fold(0u64, |acc, (key, value)| {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            value.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.values.len().hash(state);
        combined.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        for (key, value) in iter {
            state.set(key, value);
        }
        state
    }
}
