//! Utility modules
//!
//! Logging helpers and the shared test fixtures.

pub mod logging;
pub mod test;
