use thiserror::Error;

#[derive(Debug, Error)]
pub enum RebalanceError {
    #[error("Invalid cash amount ('{value}'): {reason}")]
    InvalidCash { value: String, reason: String },

    #[error("Invalid share price at position {position} ('{value}'): {reason}")]
    InvalidSharePrice {
        position: usize,
        value: String,
        reason: String,
    },

    #[error("Invalid current price at position {position} ('{value}'): {reason}")]
    InvalidCurrentPrice {
        position: usize,
        value: String,
        reason: String,
    },

    #[error("Length of Current Price ({current_prices}) must equal Share Price ({share_prices})")]
    LengthMismatch {
        share_prices: usize,
        current_prices: usize,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RebalanceError {
    fn from(e: serde_json::Error) -> Self {
        RebalanceError::Serialization(e.to_string())
    }
}
