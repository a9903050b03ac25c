use thiserror::Error;

/// Errors produced while building actions or searching for a plan.
///
/// # Examples
///
/// ```
/// use action_graph::GoapError;
///
/// let error = GoapError::GoalUnreachable("{teleported: true}".to_string());
/// assert_eq!(
///     format!("{}", error),
///     "No action available to satisfy goal: {teleported: true}"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoapError {
    /// No action sequence, service actions included, can produce the goal
    #[error("No action available to satisfy goal: {0}")]
    GoalUnreachable(String),

    /// An indirect reference value could not be turned into a concrete value
    #[error("Error accessing referred state: {0}")]
    ReferenceResolution(String),

    /// Action cost is negative, NaN or infinite
    #[error("Action cost must be a finite, non-negative number")]
    InvalidActionCost,

    /// The search stack grew past the configured maximum depth
    #[error("Search exceeded the maximum depth of {0} goals")]
    SearchDepthExceeded(usize),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, GoapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_goal_unreachable_display() {
        let err = GoapError::GoalUnreachable("{wood_chopped: true}".to_string());
        assert_eq!(
            format!("{}", err),
            "No action available to satisfy goal: {wood_chopped: true}"
        );
    }

    #[test]
    fn test_reference_resolution_display() {
        let err = GoapError::ReferenceResolution("$".to_string());
        assert_eq!(format!("{}", err), "Error accessing referred state: $");
    }

    #[test]
    fn test_invalid_action_cost_display() {
        let err = GoapError::InvalidActionCost;
        assert_eq!(
            format!("{}", err),
            "Action cost must be a finite, non-negative number"
        );
    }

    #[test]
    fn test_search_depth_exceeded_display() {
        let err = GoapError::SearchDepthExceeded(8);
        assert_eq!(
            format!("{}", err),
            "Search exceeded the maximum depth of 8 goals"
        );
    }

    #[test]
    fn test_error_trait() {
        let err = GoapError::InvalidActionCost;
        assert!(err.source().is_none());
    }
}
