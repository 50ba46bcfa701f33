//! Mathematical utilities: least squares and population statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
