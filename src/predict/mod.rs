//! Grade forecasting: turns a student's grade history into one predicted score.

pub mod features;
pub mod model;

pub use features::*;
pub use model::*;
