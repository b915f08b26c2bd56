//! Logging utilities
//!
//! Standardized messages for loading reference data and snapshots.

use std::path::Path;
use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file that was operated on
/// * `items` - Number of items processed
/// * `elapsed` - Elapsed time
pub fn log_operation_complete(operation: &str, path: &Path, items: usize, elapsed: Duration) {
    log::info!(
        "Successfully {} {} items from {} in {:?}",
        operation,
        items,
        path.display(),
        elapsed
    );
}
