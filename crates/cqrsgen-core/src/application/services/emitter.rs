//! Plan executor.
//!
//! Applies actions strictly in plan order. Files are written whole through
//! the `Filesystem` port (no-clobber for new files, replace for merges). The
//! first failure stops the run; entries already applied stay in the report
//! and on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        ActionType, ApplyEntry, ApplyReport, ArtifactKind, GenerationPlan, MergeSpec, Outcome,
        PlannedAction, barrel,
    },
};

/// Result of one pass over a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub report: ApplyReport,
    /// The error that stopped the pass, if any. Also recorded in `report`.
    pub failure: Option<ApplicationError>,
}

pub struct Emitter<'a> {
    filesystem: &'a dyn Filesystem,
    root: PathBuf,
}

impl<'a> Emitter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, root: impl AsRef<Path>) -> Self {
        Self {
            filesystem,
            root: root.as_ref().to_path_buf(),
        }
    }

    #[instrument(skip_all, fields(run_id = %plan.run_id(), actions = plan.len()))]
    pub fn apply(&self, plan: &GenerationPlan) -> Emission {
        let mut report = ApplyReport::new(plan.run_id());

        for action in plan.actions() {
            let Some(path) = action.primary_path().cloned() else {
                continue;
            };

            let result = match action.action {
                ActionType::SkipExisting => Ok(Outcome::Skipped),
                ActionType::CreateNew => self.create(action),
                ActionType::MergeAppend => self.merge_all(action),
            };

            match result {
                Ok(outcome) => {
                    info!(kind = %action.kind, path = %path, outcome = %outcome, "Applied");
                    report.push(ApplyEntry {
                        kind: action.kind,
                        path,
                        action: action.action,
                        outcome,
                    });
                }
                Err(err) => {
                    warn!(kind = %action.kind, path = %path, error = %err, "Apply failed");
                    report.push(ApplyEntry {
                        kind: action.kind,
                        path,
                        action: action.action,
                        outcome: Outcome::Failed {
                            reason: err.to_string(),
                        },
                    });
                    return Emission {
                        report,
                        failure: Some(err),
                    };
                }
            }
        }

        Emission {
            report,
            failure: None,
        }
    }

    fn create(&self, action: &PlannedAction) -> Result<Outcome, ApplicationError> {
        for file in &action.files {
            let path = file.path.to_path(&self.root);
            self.ensure_parent(&path)?;
            self.write_new(action.kind, &path, &file.content)?;
            debug!(path = %file.path, bytes = file.content.len(), "Created file");
        }
        for companion in &action.merges {
            self.merge(action.kind, companion)?;
        }
        Ok(Outcome::Created)
    }

    /// Applies every merge of an aggregation action; the outcome is the
    /// first merge's.
    fn merge_all(&self, action: &PlannedAction) -> Result<Outcome, ApplicationError> {
        let mut first = None;
        for spec in &action.merges {
            let outcome = self.merge(action.kind, spec)?;
            first.get_or_insert(outcome);
        }
        Ok(first.unwrap_or(Outcome::Merged { added: 0 }))
    }

    fn merge(&self, kind: ArtifactKind, spec: &MergeSpec) -> Result<Outcome, ApplicationError> {
        let path = spec.path.to_path(&self.root);

        let Some(current) = self.filesystem.read_to_string(&path)? else {
            self.ensure_parent(&path)?;
            self.write_new(kind, &path, &spec.fallback)?;
            debug!(path = %spec.path, "Created aggregation file");
            return Ok(Outcome::Created);
        };

        let merged = barrel::merge(&current, &spec.style, &spec.entries).map_err(|e| {
            ApplicationError::MergeAnchorNotFound {
                kind: kind.to_string(),
                path: path.clone(),
                anchor: e.anchor,
            }
        })?;

        if !merged.added.is_empty() {
            self.filesystem.write_replace(&path, &merged.content)?;
            debug!(path = %spec.path, added = ?merged.added, "Merged entries");
        }

        Ok(Outcome::Merged {
            added: merged.added.len(),
        })
    }

    fn write_new(&self, kind: ArtifactKind, path: &Path, content: &str) -> Result<(), ApplicationError> {
        self.filesystem
            .write_new(path, content)
            .map_err(|err| match err {
                ApplicationError::FileExists { path } => ApplicationError::WriteConflict {
                    kind: kind.to_string(),
                    path,
                },
                other => other,
            })
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), ApplicationError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.filesystem.create_dir_all(parent),
            _ => Ok(()),
        }
    }
}
