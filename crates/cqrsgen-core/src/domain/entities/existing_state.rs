//! Observed state of a domain directory, produced by the scanner.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::RelativePath,
    value_objects::{ArtifactKind, DomainName},
};

/// Content and registrations of an aggregation file that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub path: RelativePath,
    pub content: String,
    pub registered: BTreeSet<String>,
}

/// What already exists for one domain.
///
/// Built fresh by every scan and never cached between runs, so a re-plan
/// after a write race always sees the latest tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingState {
    domain: DomainName,
    present: BTreeMap<ArtifactKind, BTreeSet<RelativePath>>,
    snapshots: BTreeMap<RelativePath, AggregateSnapshot>,
}

impl ExistingState {
    /// An all-absent state: nothing of the domain exists yet.
    pub fn empty(domain: DomainName) -> Self {
        Self {
            domain,
            present: BTreeMap::new(),
            snapshots: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    /// Record that `path`, a file of `kind`, exists.
    pub fn record_file(&mut self, kind: ArtifactKind, path: RelativePath) {
        self.present.entry(kind).or_default().insert(path);
    }

    /// Record an aggregation file's content. The actions barrel has no kind
    /// of its own, so kinds are recorded separately with `record_file`.
    pub fn record_snapshot(&mut self, snapshot: AggregateSnapshot) {
        self.snapshots.insert(snapshot.path.clone(), snapshot);
    }

    /// True when any file of `kind` exists.
    pub fn is_present(&self, kind: ArtifactKind) -> bool {
        self.present.get(&kind).is_some_and(|files| !files.is_empty())
    }

    pub fn has_file(&self, path: &RelativePath) -> bool {
        self.present.values().any(|files| files.contains(path))
            || self.snapshots.contains_key(path)
    }

    pub fn files(&self, kind: ArtifactKind) -> impl Iterator<Item = &RelativePath> {
        self.present.get(&kind).into_iter().flatten()
    }

    pub fn snapshot(&self, path: &RelativePath) -> Option<&AggregateSnapshot> {
        self.snapshots.get(path)
    }

    /// Identifiers already registered in the aggregation file at `path`;
    /// empty when the file does not exist.
    pub fn registered(&self, path: &RelativePath) -> BTreeSet<String> {
        self.snapshots
            .get(path)
            .map(|s| s.registered.clone())
            .unwrap_or_default()
    }

    /// A domain is new until its module file exists.
    pub fn is_new_domain(&self) -> bool {
        !self.is_present(ArtifactKind::DomainModule)
    }

    /// Number of files observed across all kinds.
    pub fn file_count(&self) -> usize {
        self.present.values().map(BTreeSet::len).sum()
    }
}
