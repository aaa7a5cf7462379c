//! Template Service - template listing and customisation.
//!
//! Separated from ScaffoldService for single responsibility.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::ports::TemplateOverrides,
    domain::{ArtifactKind, TemplateRegistry},
    error::CqrsgenResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub kind: ArtifactKind,
    pub path_pattern: String,
    pub description: String,
    pub source: String,
}

/// Service for template operations.
pub struct TemplateService {
    registry: TemplateRegistry,
}

impl TemplateService {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    /// Apply every override supplied by `overrides`, returning how many
    /// templates were replaced.
    #[instrument(skip_all)]
    pub fn apply_overrides(&mut self, overrides: &dyn TemplateOverrides) -> CqrsgenResult<usize> {
        let loaded = overrides.load()?;
        let count = loaded.len();
        for o in loaded {
            debug!(kind = %o.kind, origin = %o.origin, "Applying template override");
            self.registry.override_template(o.kind, o.body, o.origin)?;
        }
        if count > 0 {
            info!(count, "Template overrides applied");
        }
        Ok(count)
    }

    /// All templates in plan order.
    pub fn list(&self) -> Vec<TemplateInfo> {
        self.registry
            .entries()
            .map(|t| TemplateInfo {
                kind: t.kind,
                path_pattern: t.path_pattern.clone(),
                description: t.description.clone(),
                source: t.source.to_string(),
            })
            .collect()
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TemplateRegistry {
        self.registry
    }
}
