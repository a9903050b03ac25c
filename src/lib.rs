mod action;
mod error;
mod index;
mod observer;
mod plan;
mod planner;
mod reference;
mod search;
mod state;
mod value;

pub use action::Action;
pub use error::{GoapError, Result};
pub use index::ActionIndex;
pub use observer::{LogObserver, NoopObserver, SearchEvent, SearchObserver};
pub use plan::Plan;
pub use planner::{Planner, PlannerConfig};
pub use reference::{ReferenceResolver, DEFAULT_SIGIL};
pub use search::{is_unreachable, path_cost, Path, RegressionSearch, Step};
pub use state::State;
pub use value::Value;
