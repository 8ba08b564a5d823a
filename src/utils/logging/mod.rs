//! Logging helpers for file operations
//!
//! Derivation steps log through the `log` macros directly; these helpers give
//! the loader and exporter one consistent format for file-level messages.

pub mod log;

pub use self::log::{log_operation_complete, log_operation_start, log_warning};
