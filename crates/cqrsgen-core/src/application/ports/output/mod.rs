//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::application::ApplicationError;
use crate::domain::ArtifactKind;

/// Result type of every port method.
pub type PortResult<T> = Result<T, ApplicationError>;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `cqrsgen_adapters::filesystem::LocalFilesystem` (production)
/// - `cqrsgen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Writes must be whole-file: a reader never observes partial content.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a UTF-8 file; `None` when it does not exist.
    fn read_to_string(&self, path: &Path) -> PortResult<Option<String>>;

    /// Create a file that must not exist yet. Fails with
    /// `ApplicationError::FileExists` if something is already there.
    fn write_new(&self, path: &Path, content: &str) -> PortResult<()>;

    /// Replace an existing file's content.
    fn write_replace(&self, path: &Path, content: &str) -> PortResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PortResult<()>;
}

/// A replacement template body for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOverride {
    pub kind: ArtifactKind,
    pub body: String,
    /// Where the body came from, for `list` output.
    pub origin: String,
}

/// Port for template bodies supplied at runtime.
///
/// Implemented by `cqrsgen_adapters::template_loader::FilesystemTemplateLoader`.
pub trait TemplateOverrides: Send + Sync {
    fn load(&self) -> PortResult<Vec<TemplateOverride>>;
}
