pub mod error;
pub mod loan;
pub mod model;
pub mod params;
pub mod policy;
pub mod scenarios;
pub mod simulation;
pub mod time_value;
pub mod types;

pub use error::RentBuyError;
pub use model::{calculate_model, calculate_model_raw, ModelOutput};
pub use types::*;

/// Standard result type for all rent-vs-buy operations
pub type RentBuyResult<T> = Result<T, RentBuyError>;
