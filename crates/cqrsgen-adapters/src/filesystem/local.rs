//! Local filesystem adapter using `std::fs` and `tempfile`.
//!
//! Every write goes to a temporary file in the target's directory and is
//! renamed into place, so a crash or Ctrl-C never leaves a truncated file.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use cqrsgen_core::application::{ApplicationError, ports::Filesystem, ports::PortResult};

/// Production filesystem implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` into a temp file next to `path`.
    fn stage(path: &Path, content: &str) -> PortResult<NamedTempFile> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, &e, "create temp file"))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(path, &e, "write temp file"))?;
        Ok(tmp)
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> PortResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, &e, "read file")),
        }
    }

    fn write_new(&self, path: &Path, content: &str) -> PortResult<()> {
        let tmp = Self::stage(path, content)?;
        tmp.persist_noclobber(path).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                ApplicationError::FileExists {
                    path: path.to_path_buf(),
                }
            } else {
                map_io_error(path, &e.error, "create file")
            }
        })?;
        trace!(path = %path.display(), "write_new");
        Ok(())
    }

    fn write_replace(&self, path: &Path, content: &str) -> PortResult<()> {
        let tmp = Self::stage(path, content)?;
        tmp.persist(path)
            .map_err(|e| map_io_error(path, &e.error, "replace file"))?;
        trace!(path = %path.display(), "write_replace");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> PortResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, &e, "create directory"))
    }
}

fn map_io_error(path: &Path, e: &io::Error, operation: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
}
