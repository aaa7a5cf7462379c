//! Existing-structure scanner.
//!
//! Read-only: probes every path any variant of any kind could occupy and
//! snapshots the aggregation files. A missing domain directory is simply a
//! new domain.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{
        AggregateSnapshot, ArtifactKind, ArtifactVariant, BarrelStyle, DomainName, ExistingState, RelativePath,
        TemplateRegistry, barrel,
    },
    error::CqrsgenResult,
};

pub struct Scanner<'a> {
    filesystem: &'a dyn Filesystem,
    registry: &'a TemplateRegistry,
    root: PathBuf,
}

impl<'a> Scanner<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        registry: &'a TemplateRegistry,
        root: impl AsRef<Path>,
    ) -> Self {
        Self {
            filesystem,
            registry,
            root: root.as_ref().to_path_buf(),
        }
    }

    #[instrument(skip_all, fields(domain = %domain, root = %self.root.display()))]
    pub fn scan(&self, domain: &DomainName) -> CqrsgenResult<ExistingState> {
        let mut state = ExistingState::empty(domain.clone());

        for kind in ArtifactKind::ALL {
            match self.registry.style_for(kind, domain) {
                Some(style) => {
                    let path = self.registry.path_for(kind, ArtifactVariant::Single, domain)?;
                    if self.snapshot(&mut state, &path, &style)? {
                        state.record_file(kind, path);
                    }
                }
                None => {
                    for (_, path) in self.registry.all_paths(kind, domain)? {
                        if self.filesystem.exists(&path.to_path(&self.root)) {
                            state.record_file(kind, path);
                        }
                    }
                }
            }
        }

        let actions_barrel = self.registry.actions_barrel_path(domain)?;
        self.snapshot(&mut state, &actions_barrel, &BarrelStyle::ReExport)?;

        debug!(
            files = state.file_count(),
            new_domain = state.is_new_domain(),
            "Scan complete"
        );
        Ok(state)
    }

    /// Snapshot an aggregation file if it exists; returns whether it did.
    fn snapshot(
        &self,
        state: &mut ExistingState,
        path: &RelativePath,
        style: &BarrelStyle,
    ) -> CqrsgenResult<bool> {
        let Some(content) = self.filesystem.read_to_string(&path.to_path(&self.root))? else {
            return Ok(false);
        };

        let registered = barrel::registered_identifiers(&content, style);
        debug!(path = %path, registered = registered.len(), "Aggregation file found");
        state.record_snapshot(AggregateSnapshot {
            path: path.clone(),
            content,
            registered,
        });
        Ok(true)
    }
}
