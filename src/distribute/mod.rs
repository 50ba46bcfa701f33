//! Balanced assignment of students to class sections.
//!
//! - `bands`: quantile labelling of predicted scores (annotation only)
//! - `engine`: the seeded greedy placement pass

pub mod bands;
pub mod engine;

pub use bands::*;
pub use engine::*;
