//! # Plan Module
//!
//! A [`Plan`] is the artifact handed back to callers: an ordered mapping from
//! each scheduled action to the state it is predicted to produce. Iteration
//! follows execution order and no action appears twice.
//!
//! ```
//! use action_graph::{Action, Planner, State};
//!
//! let get_axe = Action::new("get_axe", 1.0).unwrap().with_effect("has_axe", true);
//! let chop = Action::new("chop", 2.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("wood_chopped", true);
//!
//! let planner = Planner::new(vec![get_axe, chop]);
//! let plan = planner
//!     .find_plan(&State::new(), &State::single("wood_chopped", true))
//!     .unwrap();
//!
//! let names: Vec<_> = plan.actions().map(|a| a.name.as_str()).collect();
//! assert_eq!(names, ["get_axe", "chop"]);
//! assert_eq!(plan.total_cost(), 3.0);
//! println!("{}", plan);
//! ```

use crate::search::Step;
use crate::{Action, State};
use indexmap::IndexMap;
use std::fmt;

/// Ordered action to predicted-state mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: IndexMap<Action, State>,
}

impl Plan {
    /// Assembles a plan from a path.
    ///
    /// A repeated action keeps its first position and takes the later predicted state.
    pub fn from_path(path: impl IntoIterator<Item = Step>) -> Self {
        let mut steps = IndexMap::new();
        for step in path {
            steps.insert(step.action, step.outcome);
        }
        Self { steps }
    }

    /// Number of scheduled actions.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` when nothing needs doing.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Actions with their predicted states, in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&Action, &State)> {
        self.steps.iter()
    }

    /// Actions in execution order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.steps.keys()
    }

    /// Predicted state after `action`, if it is part of the plan.
    pub fn get(&self, action: &Action) -> Option<&State> {
        self.steps.get(action)
    }

    /// Position of `action` in execution order.
    pub fn position(&self, action: &Action) -> Option<usize> {
        self.steps.get_index_of(action)
    }

    /// Sum of the costs of the scheduled actions.
    pub fn total_cost(&self) -> f64 {
        self.steps.keys().map(|action| action.cost).sum()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PLAN:")?;
        for (i, (action, state)) in self.iter().enumerate() {
            writeln!(f, "{:02} {:.<25}{}", i + 1, action.name, state)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = (&'a Action, &'a State);
    type IntoIter = indexmap::map::Iter<'a, Action, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
