use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuccessionError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SuccessionError {
    fn from(e: serde_json::Error) -> Self {
        SuccessionError::SerializationError(e.to_string())
    }
}
