use thiserror::Error;

/// Result type for every search and solver operation
pub type SolveResult<T> = Result<T, ProblemError>;

#[derive(Error, Debug)]
pub enum ProblemError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("search cancelled after testing {tested} candidates")]
    Cancelled { tested: u64 },
    #[error("search exceeded bound of {max_digits} digits after testing {tested} candidates")]
    BoundExceeded { max_digits: usize, tested: u64 },
    #[error("search exceeded budget of {max_candidates} candidates")]
    CandidateBudgetExceeded { max_candidates: u64 },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProblemError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ProblemError::InvalidInput(msg.into())
    }

    /// True for outcomes where the search stopped before reaching an answer.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            ProblemError::Cancelled { .. }
                | ProblemError::BoundExceeded { .. }
                | ProblemError::CandidateBudgetExceeded { .. }
        )
    }
}
