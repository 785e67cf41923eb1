use thiserror::Error;

/// Result type for deepq operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the deepq crate
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Missing or malformed configuration
    #[error("Invalid configuration '{name}': {reason}")]
    Config {
        name: String,
        reason: String,
    },

    /// Action index outside the environment's action set
    #[error("Invalid action {action}: must be less than {action_count}")]
    InvalidAction {
        action: usize,
        action_count: usize,
    },

    /// A minibatch was requested from a buffer holding fewer transitions
    #[error("Cannot sample {requested} transitions from a buffer holding {available}")]
    InsufficientSamples {
        requested: usize,
        available: usize,
    },

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Environment collaborator failure
    #[error("Environment error: {0}")]
    Environment(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model file encoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Configuration and statistics encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl Error {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        Error::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn config<S: Into<String>>(name: S, reason: S) -> Self {
        Error::Config {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
