//! # Planner Module
//!
//! The planner is the entry point of the crate. It is responsible for:
//! - Indexing the action catalog by the predicates each action produces
//! - Running the regression search for a goal
//! - Turning the winning path into a [`Plan`]
//!
//! ## Overview
//!
//! Regression planning works backwards from the goal:
//! 1. Take the goal predicate and resolve any indirect reference in it
//! 2. If the start state already holds it, nothing needs doing
//! 3. Otherwise look up every action whose effects produce it
//! 4. Solve each candidate's preconditions the same way and keep the cheapest candidate
//!
//! Each call to [`Planner::find_plan`] is independent; the planner holds no
//! state between searches except the index of its current catalog.
//!
//! ## Basic Usage
//!
//! ```
//! use action_graph::{Action, Planner, State};
//!
//! // Two ways to open the door: force it, or fetch the key first
//! let force = Action::new("force_door", 5.0).unwrap().with_effect("door", "open");
//! let unlock = Action::new("unlock_door", 1.0)
//!     .unwrap()
//!     .with_precondition("has_key", true)
//!     .with_effect("door", "open");
//! let fetch = Action::new("fetch_key", 1.0).unwrap().with_effect("has_key", true);
//!
//! let planner = Planner::new(vec![force, unlock, fetch]);
//! let plan = planner
//!     .find_plan(&State::new(), &State::single("door", "open"))
//!     .unwrap();
//!
//! let names: Vec<_> = plan.actions().map(|a| a.name.as_str()).collect();
//! assert_eq!(names, ["fetch_key", "unlock_door"]);
//! ```
//!
//! ## Limitations
//!
//! [`Planner::find_plan`] only solves the first predicate of the target state;
//! use [`Planner::find_conjunctive_plan`] to require all of them. Subgoals are
//! not memoized, so a subgoal needed in several places is solved each time.

use crate::observer::{LogObserver, SearchObserver};
use crate::search::{dedup, is_unreachable, path_cost, Path, RegressionSearch};
use crate::{Action, ActionIndex, GoapError, Plan, ReferenceResolver, Result, State};
use serde::{Deserialize, Serialize};

/// Tunables for the planner.
///
/// # Examples
///
/// ```
/// use action_graph::PlannerConfig;
///
/// let config = PlannerConfig::default().with_reference_sigil('@').with_max_depth(32);
/// assert_eq!(config.reference_sigil, '@');
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Leading character marking a value as a reference to another state variable
    pub reference_sigil: char,
    /// Maximum number of goals expanded on top of each other
    pub max_depth: usize,
}

impl PlannerConfig {
    /// Sets the character that marks a reference value.
    pub fn with_reference_sigil(mut self, sigil: char) -> Self {
        self.reference_sigil = sigil;
        self
    }

    /// Sets how many goals may be expanded on top of each other.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            reference_sigil: crate::reference::DEFAULT_SIGIL,
            max_depth: 256,
        }
    }
}

/// The goal-regression planner.
///
/// Holds the [`ActionIndex`] of the current catalog. Replacing the catalog
/// with [`Planner::update_actions`] needs `&mut self`, so it can never overlap
/// a search running on the same planner.
///
/// # Examples
///
/// ```
/// use action_graph::{Action, GoapError, Planner, State};
///
/// let mut planner = Planner::new(vec![]);
/// let goal = State::single("fire_lit", true);
///
/// // Nothing can light the fire yet
/// assert!(matches!(
///     planner.find_plan(&State::new(), &goal),
///     Err(GoapError::GoalUnreachable(_))
/// ));
///
/// planner.update_actions(vec![
///     Action::new("light_fire", 1.0).unwrap().with_effect("fire_lit", true),
/// ]);
/// assert_eq!(planner.find_plan(&State::new(), &goal).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    index: ActionIndex,
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner over `actions` with the default configuration.
    pub fn new(actions: Vec<Action>) -> Self {
        Self::with_config(actions, PlannerConfig::default())
    }

    /// Creates a planner over `actions` with a custom configuration.
    ///
    /// ```
    /// use action_graph::{Action, Planner, PlannerConfig, State};
    ///
    /// let paint = Action::new("paint_red", 1.0).unwrap().with_effect("color", "red");
    /// let planner = Planner::with_config(
    ///     vec![paint],
    ///     PlannerConfig::default().with_reference_sigil('@'),
    /// );
    ///
    /// let start = State::single("base_color", "red");
    /// let plan = planner
    ///     .find_plan(&start, &State::single("color", "@base_color"))
    ///     .unwrap();
    /// assert_eq!(plan.actions().next().unwrap().name, "paint_red");
    /// ```
    pub fn with_config(actions: Vec<Action>, config: PlannerConfig) -> Self {
        log::debug!("indexing {} actions", actions.len());
        Self {
            index: ActionIndex::build(actions),
            config,
        }
    }

    /// Discards the current index and rebuilds it from `actions`.
    pub fn update_actions(&mut self, actions: Vec<Action>) {
        log::debug!("re-indexing {} actions", actions.len());
        self.index = ActionIndex::build(actions);
    }

    /// The current action catalog.
    pub fn actions(&self) -> &[Action] {
        self.index.actions()
    }

    /// The configuration searches run with.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Returns `true` when every predicate of `goal` already holds in `state`.
    ///
    /// An empty goal is always met.
    pub fn is_goal_met(&self, goal: &State, state: &State) -> bool {
        state.satisfies(goal)
    }

    /// Finds the cheapest plan for the first predicate of `target` from `start`.
    ///
    /// Search events are traced through the `log` facade.
    ///
    /// # Errors
    ///
    /// * `GoapError::GoalUnreachable` if no action sequence produces the goal
    /// * `GoapError::ReferenceResolution` if a reference value is malformed
    /// * `GoapError::SearchDepthExceeded` if every way to the goal is deeper than `max_depth`
    pub fn find_plan(&self, start: &State, target: &State) -> Result<Plan> {
        self.find_plan_with(start, target, &mut LogObserver)
    }

    /// Like [`Planner::find_plan`], reporting search events to `observer`.
    pub fn find_plan_with(
        &self,
        start: &State,
        target: &State,
        observer: &mut dyn SearchObserver,
    ) -> Result<Plan> {
        let path = self.solve_with(target, start, observer)?;
        let plan = Plan::from_path(path);
        log::debug!(
            "planned {} actions for {} (cost {})",
            plan.len(),
            target,
            plan.total_cost()
        );
        Ok(plan)
    }

    /// Finds a plan satisfying every predicate of `target`.
    ///
    /// Each predicate is solved independently from `start`, in target order,
    /// and the resulting paths are concatenated without repeating steps.
    ///
    /// ```
    /// use action_graph::{Action, Planner, State};
    ///
    /// let planner = Planner::new(vec![
    ///     Action::new("cook", 1.0).unwrap().with_effect("fed", true),
    ///     Action::new("sleep", 1.0).unwrap().with_effect("rested", true),
    /// ]);
    /// let goal: State = vec![("fed", true), ("rested", true)].into_iter().collect();
    ///
    /// assert_eq!(planner.find_plan(&State::new(), &goal).unwrap().len(), 1);
    /// assert_eq!(planner.find_conjunctive_plan(&State::new(), &goal).unwrap().len(), 2);
    /// ```
    pub fn find_conjunctive_plan(&self, start: &State, target: &State) -> Result<Plan> {
        let mut path = Path::new();
        for (key, value) in target.iter() {
            let goal = State::single(key, value.clone());
            path.extend(self.solve_with(&goal, start, &mut LogObserver)?);
        }
        Ok(Plan::from_path(dedup(path)))
    }

    /// The deduplicated path for the first predicate of `goal`, before plan assembly.
    pub fn solve(&self, goal: &State, start: &State) -> Result<Path> {
        self.solve_with(goal, start, &mut LogObserver)
    }

    fn solve_with(
        &self,
        goal: &State,
        start: &State,
        observer: &mut dyn SearchObserver,
    ) -> Result<Path> {
        let search = RegressionSearch::new(
            &self.index,
            ReferenceResolver::new(self.config.reference_sigil),
            self.config.max_depth,
        );
        let path = search.solve(goal, start, observer)?;
        if is_unreachable(path_cost(&path)) {
            log::warn!("no action available to satisfy goal {}", goal);
            return Err(GoapError::GoalUnreachable(goal.to_string()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::Value;

    fn make_action(
        name: &str,
        cost: f64,
        pre: Vec<(&str, bool)>,
        eff: Vec<(&str, bool)>,
    ) -> Action {
        let mut action = Action::new(name, cost).unwrap();
        for (k, v) in pre {
            action.preconditions.set(k, v);
        }
        for (k, v) in eff {
            action.effects.set(k, v);
        }
        action
    }

    fn names(plan: &Plan) -> Vec<&str> {
        plan.actions().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_simple_plan() {
        // a -> b -> c
        let a = make_action("a", 1.0, vec![("start", true)], vec![("mid", true)]);
        let b = make_action("b", 1.0, vec![("mid", true)], vec![("end", true)]);
        let c = make_action("c", 1.0, vec![("end", true)], vec![("goal", true)]);
        let planner = Planner::new(vec![a, b, c]);

        let mut initial = State::new();
        initial.set("start", true);
        initial.set("mid", false);
        initial.set("end", false);
        initial.set("goal", false);

        let plan = planner
            .find_plan(&initial, &State::single("goal", true))
            .unwrap();
        assert_eq!(names(&plan), ["a", "b", "c"]);
    }

    #[test]
    fn test_no_plan_found() {
        let a = make_action("a", 1.0, vec![("foo", true)], vec![("bar", true)]);
        let planner = Planner::new(vec![a]);
        let initial = State::single("foo", false);
        let result = planner.find_plan(&initial, &State::single("bar", true));
        assert_eq!(
            result,
            Err(GoapError::GoalUnreachable("{bar: true}".to_string()))
        );
    }

    #[test]
    fn test_plan_with_multiple_paths() {
        let a = make_action("a", 1.0, vec![("start", true)], vec![("goal", true)]);
        let b = make_action("b", 5.0, vec![("start", true)], vec![("goal", true)]);
        let planner = Planner::new(vec![b, a]);
        let plan = planner
            .find_plan(&State::single("start", true), &State::single("goal", true))
            .unwrap();
        assert_eq!(names(&plan), ["a"]);
    }

    #[test]
    fn test_only_first_target_predicate_is_planned() {
        let a = make_action("a", 1.0, vec![], vec![("x", true)]);
        let planner = Planner::new(vec![a]);
        let target: State = vec![("x", true), ("unreachable", true)].into_iter().collect();

        let plan = planner.find_plan(&State::new(), &target).unwrap();
        assert_eq!(names(&plan), ["a"]);

        let result = planner.find_conjunctive_plan(&State::new(), &target);
        assert!(matches!(result, Err(GoapError::GoalUnreachable(_))));
    }

    #[test]
    fn test_conjunctive_plan_shares_steps() {
        let tools = make_action("tools", 1.0, vec![], vec![("has_tools", true)]);
        let fence = make_action("fence", 2.0, vec![("has_tools", true)], vec![("fenced", true)]);
        let shed = make_action("shed", 3.0, vec![("has_tools", true)], vec![("shed", true)]);
        let planner = Planner::new(vec![tools, fence, shed]);
        let target: State = vec![("fenced", true), ("shed", true)].into_iter().collect();

        let plan = planner.find_conjunctive_plan(&State::new(), &target).unwrap();
        assert_eq!(names(&plan), ["tools", "fence", "shed"]);
        assert_eq!(plan.total_cost(), 6.0);
    }

    #[test]
    fn test_empty_target_gives_empty_plan() {
        let planner = Planner::new(vec![]);
        assert!(planner.find_plan(&State::new(), &State::new()).unwrap().is_empty());
        assert!(planner
            .find_conjunctive_plan(&State::new(), &State::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_is_goal_met() {
        let planner = Planner::new(vec![]);
        let state: State = vec![("a", true), ("b", false)].into_iter().collect();
        assert!(planner.is_goal_met(&State::new(), &state));
        assert!(planner.is_goal_met(&State::single("b", false), &state));
        assert!(!planner.is_goal_met(&State::single("b", true), &state));
        assert!(!planner.is_goal_met(&State::single("c", true), &state));
    }

    #[test]
    fn test_update_actions_replaces_catalog() {
        let mut planner = Planner::new(vec![make_action("old", 1.0, vec![], vec![("x", true)])]);
        planner.update_actions(vec![make_action("new", 1.0, vec![], vec![("y", true)])]);

        assert_eq!(planner.actions().len(), 1);
        assert!(planner
            .find_plan(&State::new(), &State::single("x", true))
            .is_err());
        let plan = planner
            .find_plan(&State::new(), &State::single("y", true))
            .unwrap();
        assert_eq!(names(&plan), ["new"]);
    }

    #[test]
    fn test_depth_limit_from_config() {
        let a = make_action("a", 1.0, vec![("p", true)], vec![("q", true)]);
        let b = make_action("b", 1.0, vec![], vec![("p", true)]);
        let planner = Planner::with_config(vec![a, b], PlannerConfig::default().with_max_depth(1));
        let result = planner.find_plan(&State::new(), &State::single("q", true));
        assert_eq!(result, Err(GoapError::SearchDepthExceeded(1)));
    }

    #[test]
    fn test_depth_limit_falls_back_to_shallow_alternative() {
        let deep = make_action("deep", 1.0, vec![("a", true)], vec![("goal", true)]);
        let a = make_action("make_a", 1.0, vec![("b", true)], vec![("a", true)]);
        let b = make_action("make_b", 1.0, vec![], vec![("b", true)]);
        let direct = make_action("direct", 5.0, vec![], vec![("goal", true)]);
        let catalog = vec![deep, a, b, direct];
        let goal = State::single("goal", true);

        let limited =
            Planner::with_config(catalog.clone(), PlannerConfig::default().with_max_depth(2));
        let plan = limited.find_plan(&State::new(), &goal).unwrap();
        assert_eq!(names(&plan), ["direct"]);

        let plan = Planner::new(catalog).find_plan(&State::new(), &goal).unwrap();
        assert_eq!(names(&plan), ["make_b", "make_a", "deep"]);
    }

    #[test]
    fn test_malformed_reference_is_reported() {
        let mut action = Action::new("a", 1.0).unwrap();
        action.preconditions.set("target", "$");
        action.effects.set("done", true);
        let planner = Planner::new(vec![action]);
        let result = planner.find_plan(&State::new(), &State::single("done", true));
        assert!(matches!(result, Err(GoapError::ReferenceResolution(_))));
    }

    #[test]
    fn test_find_plan_with_noop_observer() {
        let planner = Planner::new(vec![make_action("a", 1.0, vec![], vec![("x", true)])]);
        let plan = planner
            .find_plan_with(&State::new(), &State::single("x", true), &mut NoopObserver)
            .unwrap();
        assert_eq!(plan.get(&planner.actions()[0]), Some(&State::single("x", Value::Bool(true))));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"reference_sigil": "@"}"#).unwrap();
        assert_eq!(config.reference_sigil, '@');
        assert_eq!(config.max_depth, PlannerConfig::default().max_depth);
    }

    #[test]
    fn test_complex_planning_scenario() {
        let mut actions = Vec::new();

        let mut gather_resources = Action::new("gather_resources", 1.0).unwrap();
        gather_resources.preconditions.set("has_tools", true);
        gather_resources.preconditions.set("has_energy", true);
        gather_resources.effects.set("has_wood", true);
        gather_resources.effects.set("has_stone", true);
        actions.push(gather_resources);

        let mut process_materials = Action::new("process_materials", 2.0).unwrap();
        process_materials.preconditions.set("has_wood", true);
        process_materials.preconditions.set("has_stone", true);
        process_materials.preconditions.set("has_workshop", true);
        process_materials.effects.set("has_processed_wood", true);
        process_materials.effects.set("has_processed_stone", true);
        actions.push(process_materials);

        let mut build_foundation = Action::new("build_foundation", 3.0).unwrap();
        build_foundation.preconditions.set("has_processed_stone", true);
        build_foundation.preconditions.set("has_blueprint", true);
        build_foundation.effects.set("has_foundation", true);
        actions.push(build_foundation);

        let mut build_walls = Action::new("build_walls", 4.0).unwrap();
        build_walls.preconditions.set("has_foundation", true);
        build_walls.preconditions.set("has_processed_wood", true);
        build_walls.effects.set("has_walls", true);
        actions.push(build_walls);

        let mut install_roof = Action::new("install_roof", 5.0).unwrap();
        install_roof.preconditions.set("has_walls", true);
        install_roof.preconditions.set("has_processed_wood", true);
        install_roof.effects.set("has_roof", true);
        actions.push(install_roof);

        let mut final_inspection = Action::new("final_inspection", 1.0).unwrap();
        final_inspection.preconditions.set("has_roof", true);
        final_inspection.preconditions.set("has_walls", true);
        final_inspection.effects.set("has_completed_house", true);
        actions.push(final_inspection);

        let planner = Planner::new(actions);

        let mut current_state = State::new();
        current_state.set("has_tools", true);
        current_state.set("has_energy", true);
        current_state.set("has_workshop", true);
        current_state.set("has_blueprint", true);

        let plan = planner
            .find_plan(&current_state, &State::single("has_completed_house", true))
            .unwrap();
        assert_eq!(
            names(&plan),
            [
                "gather_resources",
                "process_materials",
                "build_foundation",
                "build_walls",
                "install_roof",
                "final_inspection",
            ]
        );

        // Every action's preconditions hold by the time it runs
        let mut state = current_state.clone();
        for action in plan.actions() {
            assert!(
                action.can_perform(&state),
                "Precondition not met for action {}",
                action.name
            );
            action.apply_effects(&mut state);
        }
        assert_eq!(state.get("has_completed_house"), Some(&Value::Bool(true)));
    }
}
