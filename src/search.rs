//! # Search Module
//!
//! The regression search behind [`crate::Planner`]. It turns a single-predicate
//! goal into a [`Path`]: the cheapest chain of [`Step`]s, in execution order,
//! that brings the goal about from a start state.

use crate::observer::{SearchEvent, SearchObserver};
use crate::{Action, ActionIndex, GoapError, ReferenceResolver, Result, State, Value};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// One step of a path: the action, the state it is expected to produce and its cost.
#[derive(Debug, Clone)]
pub struct Step {
    pub action: Action,
    pub outcome: State,
    pub cost: f64,
}

impl Step {
    /// A step scheduling `action` to produce `outcome`, at the action's cost.
    pub fn new(action: Action, outcome: State) -> Self {
        let cost = action.cost;
        Self {
            action,
            outcome,
            cost,
        }
    }

    /// The sentinel step of an unreachable goal.
    pub fn impossible() -> Self {
        Self::new(Action::impossible(), State::new())
    }
}

impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
            && self.outcome == other.outcome
            && self.cost.to_bits() == other.cost.to_bits()
    }
}

impl Eq for Step {}

impl Hash for Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.action.hash(state);
        self.outcome.hash(state);
        self.cost.to_bits().hash(state);
    }
}

/// Linear plan fragment in execution order.
pub type Path = Vec<Step>;

/// Total cost of a path.
pub fn path_cost(path: &[Step]) -> f64 {
    path.iter().map(|step| step.cost).sum()
}

/// Whether a cost stands for an unreachable goal.
pub fn is_unreachable(cost: f64) -> bool {
    cost.is_nan() || cost > f64::MAX
}

/// Keeps the first occurrence of every step, preserving order.
pub(crate) fn dedup(path: Path) -> Path {
    let mut seen = HashSet::new();
    path.into_iter()
        .filter(|step| seen.insert(step.clone()))
        .collect()
}

/// A goal being expanded, one candidate and one precondition at a time.
struct Frame<'a> {
    key: String,
    value: Value,
    expected: State,
    candidates: Vec<&'a Action>,
    candidate: usize,
    precondition: usize,
    action_path: Path,
    chosen: Option<(Path, f64)>,
}

enum Opened<'a> {
    /// The goal was settled without expansion
    Resolved(Path),
    /// Expanding the goal would exceed `max_depth`
    DepthLimited,
    Expanding(Frame<'a>),
}

/// Backward-chaining search over an [`ActionIndex`].
///
/// Each goal is solved by trying every action that produces it, expanding the
/// action's preconditions as single-predicate subgoals against the start state
/// and keeping the cheapest candidate (earliest on ties). Goals live on an
/// explicit work stack rather than the call stack: a subgoal already being
/// expanded further up counts as unreachable, and the stack never grows past
/// `max_depth` frames.
///
/// Unreachable subgoals do not fail the search. They contribute the
/// [`Action::impossible`] sentinel so the candidate needing them loses every
/// cost comparison; it is up to the caller to reject a final path whose cost
/// [`is_unreachable`]. A subgoal cut off by the depth limit is treated the same
/// way, and only fails the search when no other candidate reaches the goal.
pub struct RegressionSearch<'a> {
    index: &'a ActionIndex,
    resolver: ReferenceResolver,
    max_depth: usize,
}

impl<'a> RegressionSearch<'a> {
    /// A search over `index` expanding at most `max_depth` goals on top of each other.
    pub fn new(index: &'a ActionIndex, resolver: ReferenceResolver, max_depth: usize) -> Self {
        Self {
            index,
            resolver,
            max_depth,
        }
    }

    /// Solves the first predicate of `goal` from `start`.
    ///
    /// An empty goal needs no action. The returned path is deduplicated and
    /// may contain the impossible sentinel.
    ///
    /// # Errors
    ///
    /// * `GoapError::ReferenceResolution` if a reference value is malformed
    /// * `GoapError::SearchDepthExceeded` if the depth limit cut off every way to the goal
    pub fn solve(
        &self,
        goal: &State,
        start: &State,
        observer: &mut dyn SearchObserver,
    ) -> Result<Path> {
        let Some((key, value)) = goal.first() else {
            return Ok(Path::new());
        };

        let mut stack: Vec<Frame<'a>> = Vec::new();
        let mut depth_limited = false;
        let mut finished = match self.open(key, value, start, &stack, observer)? {
            Opened::Resolved(path) => return Ok(path),
            Opened::DepthLimited => return Err(GoapError::SearchDepthExceeded(self.max_depth)),
            Opened::Expanding(frame) => {
                stack.push(frame);
                None
            }
        };

        while let Some(frame) = stack.last_mut() {
            if let Some(path) = finished.take() {
                frame.action_path.extend(path);
                frame.precondition += 1;
            }

            let depth = stack.len() - 1;
            let frame = &mut stack[depth];
            let action = frame.candidates[frame.candidate];
            if frame.precondition == 0 {
                observer.observe(&SearchEvent::CandidateExplored { depth, action });
            }

            if let Some((pk, pv)) = action.preconditions.get_index(frame.precondition) {
                let pv = self.resolve(pv, &frame.expected, observer)?;
                match self.open(pk, &pv, start, &stack, observer)? {
                    Opened::Resolved(path) => finished = Some(path),
                    Opened::DepthLimited => {
                        depth_limited = true;
                        finished = Some(vec![Step::impossible()]);
                    }
                    Opened::Expanding(child) => stack.push(child),
                }
                continue;
            }

            let mut action_path = std::mem::take(&mut frame.action_path);
            action_path.push(Step::new(action.clone(), frame.expected.clone()));
            let cost = path_cost(&action_path);
            observer.observe(&SearchEvent::CandidateCosted {
                depth,
                action,
                cost,
            });
            // strictly cheaper only, so ties keep catalog order
            let better = frame
                .chosen
                .as_ref()
                .map_or(true, |(_, best)| cost < *best);
            if better {
                frame.chosen = Some((action_path, cost));
            }

            frame.candidate += 1;
            frame.precondition = 0;
            if frame.candidate < frame.candidates.len() {
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let path = dedup(done.chosen.map(|(path, _)| path).unwrap_or_default());
            if stack.is_empty() {
                if depth_limited && is_unreachable(path_cost(&path)) {
                    return Err(GoapError::SearchDepthExceeded(self.max_depth));
                }
                return Ok(path);
            }
            finished = Some(path);
        }

        Ok(Path::new())
    }

    fn resolve(
        &self,
        value: &Value,
        context: &State,
        observer: &mut dyn SearchObserver,
    ) -> Result<Value> {
        let resolved = self.resolver.resolve(value, context)?;
        if &resolved != value {
            observer.observe(&SearchEvent::ReferenceResolved {
                reference: value,
                resolved: &resolved,
            });
        }
        Ok(resolved)
    }

    /// Resolves a single-predicate goal and settles it or prepares its frame.
    fn open(
        &self,
        key: &str,
        value: &Value,
        start: &State,
        stack: &[Frame<'a>],
        observer: &mut dyn SearchObserver,
    ) -> Result<Opened<'a>> {
        let depth = stack.len();
        let value = self.resolve(value, start, observer)?;
        observer.observe(&SearchEvent::GoalOpened {
            depth,
            key,
            value: &value,
        });

        if start.contains(key, &value) {
            observer.observe(&SearchEvent::GoalSatisfied {
                depth,
                key,
                value: &value,
            });
            return Ok(Opened::Resolved(Path::new()));
        }

        if stack
            .iter()
            .any(|frame| frame.key == key && frame.value == value)
        {
            observer.observe(&SearchEvent::CycleDetected {
                depth,
                key,
                value: &value,
            });
            return Ok(Opened::Resolved(vec![Step::impossible()]));
        }

        let candidates = self.index.candidates(key, &value);
        if candidates.is_empty() {
            observer.observe(&SearchEvent::GoalUnreachable {
                depth,
                key,
                value: &value,
            });
            return Ok(Opened::Resolved(vec![Step::impossible()]));
        }

        if depth >= self.max_depth {
            observer.observe(&SearchEvent::DepthLimitReached {
                depth,
                key,
                value: &value,
            });
            return Ok(Opened::DepthLimited);
        }

        Ok(Opened::Expanding(Frame {
            key: key.to_string(),
            expected: State::single(key, value.clone()),
            value,
            candidates,
            candidate: 0,
            precondition: 0,
            action_path: Path::new(),
            chosen: None,
        }))
    }
}
