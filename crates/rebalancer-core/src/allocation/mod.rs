//! Equal-weight allocation and mark-to-market evaluation.

pub mod equal_weight;

pub use equal_weight::*;
