//! # Action Module
//!
//! Actions are the building blocks the planner chains together. Each action has:
//!
//! * `preconditions`: predicates that must hold before the action can fire
//! * `effects`: predicates that hold once it has fired
//! * `cost`: a non-negative number, summed along a plan
//!
//! An effect whose value is [`Value::Any`] marks a *service* action: it can
//! produce whatever value a goal requests for that variable. Precondition values
//! may be indirect references such as `"$driving"`, which are bound to the value
//! the planner expects the action to produce (see [`crate::ReferenceResolver`]).
//!
//! ## Basic Usage
//!
//! ```
//! use action_graph::{Action, State, Value};
//!
//! let chop_wood = Action::new("chop_wood", 2.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("wood_chopped", true);
//!
//! let mut current_state = State::new();
//! current_state.set("has_axe", true);
//!
//! if chop_wood.can_perform(&current_state) {
//!     chop_wood.apply_effects(&mut current_state);
//!     assert_eq!(current_state.get("wood_chopped"), Some(&Value::Bool(true)));
//! }
//! ```
//!
//! ## Service Actions
//!
//! ```
//! use action_graph::Action;
//!
//! // Buying a car gives whichever car the goal asks for
//! let buy_car = Action::new("buy_car", 40.0).unwrap().with_service_effect("has_car");
//! assert!(buy_car.effects.get("has_car").unwrap().is_wildcard());
//! ```

use crate::{GoapError, Result, State, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

const IMPOSSIBLE_NAME: &str = "impossible";

/// Represents an action the planner can schedule.
///
/// Actions compare and hash by value, so the same step reached through two
/// different branches of a search is recognised as one step.
///
/// # Examples
///
/// ```
/// use action_graph::{Action, State};
///
/// let mut action = Action::new("move_to_target", 1.5).unwrap();
/// action.preconditions.set("has_map", true);
/// action.effects.set("at_target", true);
///
/// let mut state = State::new();
/// state.set("has_map", true);
/// assert!(action.can_perform(&state));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawAction")]
pub struct Action {
    /// The name of the action
    pub name: String,
    /// The cost of performing this action
    pub cost: f64,
    /// The preconditions that must be met to perform this action
    pub preconditions: State,
    /// The effects this action has on the world state
    pub effects: State,
}

impl Action {
    /// Creates a new action with the specified name and cost.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` if the cost is negative, NaN or infinite.
    /// A cost of `-0.0` is stored as `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_graph::Action;
    ///
    /// let action = Action::new("move", 1.0).unwrap();
    /// assert_eq!(action.name, "move");
    /// assert_eq!(action.cost, 1.0);
    ///
    /// assert!(Action::new("free", 0.0).is_ok());
    /// assert!(Action::new("invalid", -1.0).is_err());
    /// assert!(Action::new("invalid", f64::INFINITY).is_err());
    /// ```
    pub fn new(name: impl Into<String>, cost: f64) -> Result<Self> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(GoapError::InvalidActionCost);
        }

        Ok(Self {
            name: name.into(),
            cost: if cost == 0.0 { 0.0 } else { cost },
            preconditions: State::new(),
            effects: State::new(),
        })
    }

    /// The sentinel step standing in for "no action can satisfy this goal".
    ///
    /// It has no preconditions or effects and an infinite cost, so any path
    /// containing it loses every cost comparison.
    pub fn impossible() -> Self {
        Self {
            name: IMPOSSIBLE_NAME.to_string(),
            cost: f64::INFINITY,
            preconditions: State::new(),
            effects: State::new(),
        }
    }

    /// Returns `true` for the [`Action::impossible`] sentinel.
    pub fn is_impossible(&self) -> bool {
        self.cost == f64::INFINITY && self.name == IMPOSSIBLE_NAME
    }

    /// Adds a precondition and returns the action.
    pub fn with_precondition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.preconditions.set(key, value);
        self
    }

    /// Adds an effect and returns the action.
    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Adds a wildcard effect: the action can produce any value for `key`.
    pub fn with_service_effect(self, key: impl Into<String>) -> Self {
        self.with_effect(key, Value::Any)
    }

    /// Checks if this action can be performed in the given state.
    pub fn can_perform(&self, state: &State) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Applies this action's pinned effects to the given state.
    pub fn apply_effects(&self, state: &mut State) {
        state.apply_effects(&self.effects);
    }
}

// Costs compare by bit pattern, matching `Hash`.
impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.cost.to_bits() == other.cost.to_bits()
            && self.preconditions == other.preconditions
            && self.effects == other.effects
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.cost.to_bits().hash(state);
        self.preconditions.hash(state);
        self.effects.hash(state);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Deserialize)]
struct RawAction {
    name: String,
    #[serde(default = "default_cost")]
    cost: f64,
    #[serde(default)]
    preconditions: State,
    #[serde(default)]
    effects: State,
}

fn default_cost() -> f64 {
    1.0
}

impl TryFrom<RawAction> for Action {
    type Error = GoapError;

    fn try_from(raw: RawAction) -> Result<Self> {
        let mut action = Action::new(raw.name, raw.cost)?;
        action.preconditions = raw.preconditions;
        action.effects = raw.effects;
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_valid_action() {
        let action = Action::new("test_action", 1.0).unwrap();
        assert_eq!(action.name, "test_action");
        assert_eq!(action.cost, 1.0);
        assert!(action.preconditions.is_empty());
        assert!(action.effects.is_empty());
    }

    #[test]
    fn test_create_invalid_action() {
        let result = Action::new("test_action", -1.0);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));

        let result = Action::new("test_action", f64::NAN);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));

        let result = Action::new("test_action", f64::INFINITY);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));
    }

    #[test]
    fn test_impossible_sentinel() {
        let sentinel = Action::impossible();
        assert!(sentinel.is_impossible());
        assert!(sentinel.cost.is_infinite());
        assert!(sentinel.preconditions.is_empty());
        assert!(sentinel.effects.is_empty());

        let lookalike = Action::new("impossible", 1.0).unwrap();
        assert!(!lookalike.is_impossible());
    }

    #[test]
    fn test_value_equality_and_hashing() {
        let a = Action::new("open", 1.0).unwrap().with_effect("door", "open");
        let b = Action::new("open", 1.0).unwrap().with_effect("door", "open");
        let c = Action::new("open", 2.0).unwrap().with_effect("door", "open");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Action> = vec![a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_negative_zero_cost_is_normalized() {
        let positive = Action::new("noop", 0.0).unwrap();
        let negative = Action::new("noop", -0.0).unwrap();
        assert!(negative.cost.is_sign_positive());
        assert_eq!(positive, negative);

        let set: HashSet<Action> = vec![positive.clone(), negative].into_iter().collect();
        assert_eq!(set.len(), 1);

        // A cost written directly keeps equality and hashing in agreement
        let mut forced = positive.clone();
        forced.cost = -0.0;
        assert_ne!(positive, forced);
        let set: HashSet<Action> = vec![positive, forced].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_can_perform_with_empty_preconditions() {
        let action = Action::new("test_action", 1.0).unwrap();
        assert!(action.can_perform(&State::new()));
    }

    #[test]
    fn test_can_perform_with_unmatching_preconditions() {
        let action = Action::new("test_action", 1.0)
            .unwrap()
            .with_precondition("has_tool", true);

        let mut state = State::new();
        state.set("has_tool", false);
        assert!(!action.can_perform(&state));
        assert!(!action.can_perform(&State::new()));

        state.set("has_tool", true);
        assert!(action.can_perform(&state));
    }

    #[test]
    fn test_apply_effects_skips_wildcards() {
        let action = Action::new("rent_car", 1.0)
            .unwrap()
            .with_effect("paid", true)
            .with_service_effect("has_car");

        let mut state = State::new();
        action.apply_effects(&mut state);

        assert_eq!(state.get("paid"), Some(&Value::Bool(true)));
        assert_eq!(state.get("has_car"), None);
    }

    #[test]
    fn test_deserialize_validates_cost() {
        let action: Action = serde_json::from_str(
            r#"{"name": "drive", "preconditions": {"has_car": "$driving"}, "effects": {"driving": null}}"#,
        )
        .unwrap();
        assert_eq!(action.cost, 1.0);
        assert_eq!(action.preconditions.get("has_car"), Some(&Value::from("$driving")));
        assert!(action.effects.get("driving").unwrap().is_wildcard());

        let invalid = serde_json::from_str::<Action>(r#"{"name": "drive", "cost": -2.0}"#);
        assert!(invalid.is_err());
    }
}
