// Error types shared across the simulator crates

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while building or controlling a simulation
#[derive(Error, Debug)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value `{value}` for parameter `{key}`")]
    InvalidParameter { key: String, value: String },

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("operation requires a stopped simulation")]
    SimulationRunning,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Shorthand for a malformed parameter value
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.into(),
            value: value.into(),
        }
    }
}
