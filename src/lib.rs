//! `roster-balance` library crate.
//!
//! Assigns a roster of students to capacity-bounded class sections so that
//! section averages of predicted score stay close together.
//!
//! The binary (`roster`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the engine can be embedded with a different store or predictor

pub mod app;
pub mod cli;
pub mod distribute;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod metrics;
pub mod plot;
pub mod predict;
pub mod report;
