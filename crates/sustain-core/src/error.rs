use thiserror::Error;

#[derive(Debug, Error)]
pub enum SustainError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Scenario not found: no {model} scenario with id {id}")]
    ScenarioNotFound { model: String, id: i64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SustainError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SustainError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for SustainError {
    fn from(e: serde_json::Error) -> Self {
        SustainError::SerializationError(e.to_string())
    }
}
