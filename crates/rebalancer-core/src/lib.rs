pub mod allocation;
pub mod error;
pub mod types;

pub use error::RebalanceError;
pub use types::*;

/// Standard result type for all rebalancer operations
pub type RebalanceResult<T> = Result<T, RebalanceError>;
