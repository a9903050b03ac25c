//! Trace hooks for the regression search.
//!
//! Observers receive a [`SearchEvent`] at every resolution and candidate
//! exploration point. They only watch: nothing they do feeds back into the
//! search.
//!
//! ```
//! use action_graph::{Action, Planner, SearchEvent, State};
//!
//! let planner = Planner::new(vec![
//!     Action::new("light_fire", 1.0).unwrap().with_effect("fire_lit", true),
//! ]);
//!
//! let mut explored = Vec::new();
//! let mut observer = |event: &SearchEvent<'_>| {
//!     if let SearchEvent::CandidateExplored { action, .. } = event {
//!         explored.push(action.name.clone());
//!     }
//! };
//! planner
//!     .find_plan_with(&State::new(), &State::single("fire_lit", true), &mut observer)
//!     .unwrap();
//! assert_eq!(explored, ["light_fire"]);
//! ```

use crate::{Action, Value};

/// Something the search did.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent<'a> {
    /// An indirect reference was replaced by a concrete value
    ReferenceResolved {
        reference: &'a Value,
        resolved: &'a Value,
    },
    /// A single-predicate goal is being solved
    GoalOpened {
        depth: usize,
        key: &'a str,
        value: &'a Value,
    },
    /// The goal already holds in the start state
    GoalSatisfied {
        depth: usize,
        key: &'a str,
        value: &'a Value,
    },
    /// No action, service actions included, produces the goal
    GoalUnreachable {
        depth: usize,
        key: &'a str,
        value: &'a Value,
    },
    /// The goal is already being expanded further up the stack
    CycleDetected {
        depth: usize,
        key: &'a str,
        value: &'a Value,
    },
    /// Expanding the goal would exceed the depth limit
    DepthLimitReached {
        depth: usize,
        key: &'a str,
        value: &'a Value,
    },
    /// A candidate action is about to have its preconditions expanded
    CandidateExplored { depth: usize, action: &'a Action },
    /// A candidate has been fully expanded
    CandidateCosted {
        depth: usize,
        action: &'a Action,
        cost: f64,
    },
}

pub trait SearchObserver {
    fn observe(&mut self, event: &SearchEvent<'_>);
}

impl<F> SearchObserver for F
where
    F: FnMut(&SearchEvent<'_>),
{
    fn observe(&mut self, event: &SearchEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn observe(&mut self, _event: &SearchEvent<'_>) {}
}

/// Forwards events to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn observe(&mut self, event: &SearchEvent<'_>) {
        match event {
            SearchEvent::ReferenceResolved {
                reference,
                resolved,
            } => log::trace!("resolved reference {} -> {}", reference, resolved),
            SearchEvent::GoalOpened { depth, key, value } => {
                log::trace!("[{}] solving {}: {}", depth, key, value)
            }
            SearchEvent::GoalSatisfied { depth, key, value } => {
                log::trace!("[{}] {}: {} already holds", depth, key, value)
            }
            SearchEvent::GoalUnreachable { depth, key, value } => {
                log::trace!("[{}] nothing produces {}: {}", depth, key, value)
            }
            SearchEvent::CycleDetected { depth, key, value } => {
                log::trace!("[{}] cycle on {}: {}", depth, key, value)
            }
            SearchEvent::DepthLimitReached { depth, key, value } => {
                log::trace!("[{}] depth limit reached at {}: {}", depth, key, value)
            }
            SearchEvent::CandidateExplored { depth, action } => {
                log::trace!("[{}] exploring {}", depth, action)
            }
            SearchEvent::CandidateCosted {
                depth,
                action,
                cost,
            } => log::trace!("[{}] {} costs {}", depth, action, cost),
        }
    }
}
