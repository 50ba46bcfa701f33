//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - stored records (`StudentRecord`, `Section`, `GradeRecord`)
//! - scored students and their quantile `Band`
//! - the `Assignment` and the metrics derived from it

pub mod types;

pub use types::*;
