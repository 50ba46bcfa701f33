//! Reporting utilities: formatted terminal output for runs and saved results.
//!
//! We keep formatting code in one place so:
//! - the engine and predictor stay clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;
