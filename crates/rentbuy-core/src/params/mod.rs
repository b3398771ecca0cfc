//! Input boundary: the loosely-typed parameter map, its typed record, and
//! the ordered normalization pass that resolves every default.

pub mod bounds;
pub mod coerce;
mod inputs;
mod normalize;

pub use inputs::{ModelInputs, RawInput};
pub use normalize::{normalize, Fidelity, ModelParams, MAX_HORIZON_YEARS};
