use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentBuyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentBuyError {
    fn from(e: serde_json::Error) -> Self {
        RentBuyError::SerializationError(e.to_string())
    }
}
