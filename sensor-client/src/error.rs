//! Error types for the sensor driver

use thiserror::Error;

/// Sensor error types
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    /// Finger did not match any stored template
    #[error("No matching fingerprint")]
    NoMatch,

    /// Sensor did not answer within the client timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Sensor answered with a failure status
    #[error("Sensor rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Connection could not be established or broke mid-request
    #[error("Transport error: {0}")]
    Transport(String),

    /// Sensor answered 2xx with a body we cannot read
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid sensor configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for SensorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SensorError::Timeout(err.to_string())
        } else if err.is_decode() {
            SensorError::InvalidResponse(err.to_string())
        } else {
            SensorError::Transport(err.to_string())
        }
    }
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;
