pub mod amortize;
pub mod grid;
pub mod model;
pub mod policy;
