//! Test utilities
//!
//! Shared by the unit tests and the integration tests under `tests/`.


pub use fixtures::{sample_dataset, sample_exports, sample_order};
