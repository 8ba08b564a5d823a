//! Standardized messages for reading and writing files

use std::path::Path;
use std::time::Duration;

/// Log the start of an operation on a file or directory
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of an operation
///
/// # Arguments
/// * `operation` - Past-tense verb, e.g. `"loaded"`
/// * `path` - File or directory operated on
/// * `items` - Number of records or rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {operation} {items} records at {} in {duration:?}",
            path.display()
        ),
        None => log::info!("Successfully {operation} {items} records at {}", path.display()),
    }
}

/// Log a warning, optionally naming the file it concerns
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
