//! Metrics tracking for distribution runs.

pub mod tracker;

pub use tracker::*;
