use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("start is {start}x{start} but goal is {goal}x{goal}")]
    SizeMismatch { start: usize, goal: usize },

    /// The frontier ran dry on an instance that passed the solvability check.
    #[error("frontier exhausted after {expanded} expansions without reaching the goal")]
    InvariantViolation { expanded: u64 },
}

impl SearchError {
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
