//! Filesystem-based template overrides.
//!
//! A project can replace any built-in artifact body by dropping a
//! `<kind>.tmpl` file into its templates directory:
//!
//! ```text
//! .cqrsgen/templates/
//! ├── command-handler.tmpl
//! └── sagas/
//!     └── saga.tmpl
//! ```
//!
//! Nested directories are walked too. Files whose stem is not an artifact
//! kind are skipped with a warning; empty files are passed through and
//! rejected by the registry.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use cqrsgen_core::{
    application::{
        ApplicationError,
        ports::{PortResult, TemplateOverride, TemplateOverrides},
    },
    domain::ArtifactKind,
};

const EXTENSION: &str = "tmpl";

/// Loads `<kind>.tmpl` overrides from a directory tree.
///
/// ```no_run
/// use cqrsgen_adapters::template_loader::FilesystemTemplateLoader;
/// use cqrsgen_core::application::ports::TemplateOverrides;
///
/// let loader = FilesystemTemplateLoader::new(".cqrsgen/templates");
/// let overrides = loader.load()?;
/// println!("Loaded {} overrides", overrides.len());
/// # Ok::<(), cqrsgen_core::application::ApplicationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    fn read_override(&self, path: &Path, kind: ArtifactKind) -> PortResult<TemplateOverride> {
        let body = fs::read_to_string(path).map_err(|e| ApplicationError::io(path, &e))?;
        Ok(TemplateOverride {
            kind,
            body,
            origin: path.display().to_string(),
        })
    }
}

impl TemplateOverrides for FilesystemTemplateLoader {
    /// Collect overrides in path order.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::FilesystemError`] if the directory is
    /// missing or any entry cannot be read.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    fn load(&self) -> PortResult<Vec<TemplateOverride>> {
        if !self.templates_dir.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: self.templates_dir.clone(),
                reason: "templates directory not found".into(),
            });
        }

        let mut overrides: Vec<TemplateOverride> = Vec::new();

        for entry in WalkDir::new(&self.templates_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.templates_dir.clone(),
                reason: format!("directory walk error: {e}"),
            })?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION)
            {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let kind = match stem.parse::<ArtifactKind>() {
                Ok(kind) => kind,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping template override");
                    continue;
                }
            };

            if let Some(previous) = overrides.iter().find(|o| o.kind == kind) {
                warn!(
                    file = %path.display(),
                    kept = %previous.origin,
                    "duplicate override for {kind}, ignoring"
                );
                continue;
            }

            debug!(%kind, file = %path.display(), "found template override");
            overrides.push(self.read_override(path, kind)?);
        }

        debug!(count = overrides.len(), "finished loading overrides");
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let full = temp.path().join(rel);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        temp
    }

    #[test]
    fn loads_known_kinds_recursively() {
        let temp = dir_with(&[
            ("command-handler.tmpl", "// custom handler\n"),
            ("nested/saga.tmpl", "// custom saga\n"),
            ("README.md", "not a template"),
        ]);

        let overrides = FilesystemTemplateLoader::new(temp.path()).load().unwrap();
        let kinds: Vec<_> = overrides.iter().map(|o| o.kind).collect();

        assert_eq!(kinds, vec![ArtifactKind::CommandHandler, ArtifactKind::Saga]);
        assert_eq!(overrides[0].body, "// custom handler\n");
        assert!(overrides[1].origin.ends_with("saga.tmpl"));
    }

    #[test]
    fn unknown_stems_are_skipped() {
        let temp = dir_with(&[("widget.tmpl", "x"), ("event.tmpl", "y")]);
        let overrides = FilesystemTemplateLoader::new(temp.path()).load().unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].kind, ArtifactKind::Event);
    }

    #[test]
    fn empty_file_is_returned_for_the_registry_to_reject() {
        let temp = dir_with(&[("query.tmpl", "")]);
        let overrides = FilesystemTemplateLoader::new(temp.path()).load().unwrap();
        assert_eq!(overrides.len(), 1);
        assert!(overrides[0].body.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = FilesystemTemplateLoader::new(temp.path().join("absent"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ApplicationError::FilesystemError { .. }));
    }
}
