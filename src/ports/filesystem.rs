//! Filesystem port for output-directory management.

use std::path::Path;

use super::PortError;

/// Filesystem operations needed by the artifact store and the extractor adapter.
///
/// Everything that creates, deletes, lists or chmods goes through this
/// trait so that tests can observe or refuse those operations.
pub trait FileSystem: Send + Sync {
    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Recursively deletes a directory and everything inside it.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Creates a directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if creation is denied.
    fn create_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Lists the entry names directly inside a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError>;

    /// Marks a file as executable (mode `0o755`). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or its permissions cannot be changed.
    fn set_executable(&self, path: &Path) -> Result<(), PortError>;
}
