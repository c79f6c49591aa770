use thiserror::Error;

/// Errors that can occur in the SokoZero system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SokoZeroError {
    #[error("Malformed level: {0}")]
    MalformedLevel(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Policy has no probability mass on any legal action")]
    DegenerateMask,

    #[error("Estimator failure: {0}")]
    EstimatorFailure(String),

    #[error("No legal actions available")]
    NoLegalActions,
}

/// Convenience Result type for SokoZero operations
pub type Result<T> = std::result::Result<T, SokoZeroError>;
