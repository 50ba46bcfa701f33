//! Input/output helpers.
//!
//! - CSV table readers + validation (`ingest`)
//! - the flat-file data directory (`store`)
//! - distribution exports (`export`)
//! - predictor JSON read/write (`model_file`)

pub mod export;
pub mod ingest;
pub mod model_file;
pub mod store;

pub use export::*;
pub use ingest::*;
pub use model_file::*;
pub use store::*;
