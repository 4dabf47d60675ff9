//! Batch loader that turns economic-indicator CSV releases into JSON Lines
//! ready for warehouse ingestion.

pub mod fetch;
pub mod history;
pub mod process;
pub mod transform;
