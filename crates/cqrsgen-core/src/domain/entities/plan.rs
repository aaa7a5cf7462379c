//! The generation plan: what the emitter will do, decided before any write.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    barrel::{BarrelEntry, BarrelStyle},
    entities::common::RelativePath,
    value_objects::ArtifactKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    CreateNew,
    SkipExisting,
    MergeAppend,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateNew => "create",
            Self::SkipExisting => "skip",
            Self::MergeAppend => "merge",
        })
    }
}

/// A file the plan touches. `content` is empty for skipped files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFile {
    pub path: RelativePath,
    pub content: String,
}

/// Entries to merge into an aggregation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSpec {
    pub path: RelativePath,
    pub style: BarrelStyle,
    pub entries: Vec<BarrelEntry>,
    /// Full content written when the file does not exist at apply time.
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub kind: ArtifactKind,
    pub action: ActionType,
    pub files: Vec<PlannedFile>,
    pub merges: Vec<MergeSpec>,
}

impl PlannedAction {
    pub fn create(kind: ArtifactKind, files: Vec<PlannedFile>) -> Self {
        Self {
            kind,
            action: ActionType::CreateNew,
            files,
            merges: Vec::new(),
        }
    }

    pub fn skip(kind: ArtifactKind, paths: Vec<RelativePath>) -> Self {
        Self {
            kind,
            action: ActionType::SkipExisting,
            files: paths
                .into_iter()
                .map(|path| PlannedFile {
                    path,
                    content: String::new(),
                })
                .collect(),
            merges: Vec::new(),
        }
    }

    pub fn merge(kind: ArtifactKind, spec: MergeSpec) -> Self {
        Self {
            kind,
            action: ActionType::MergeAppend,
            files: Vec::new(),
            merges: vec![spec],
        }
    }

    /// Attach a merge that runs after this action's files are written.
    pub fn with_companion(mut self, spec: MergeSpec) -> Self {
        self.merges.push(spec);
        self
    }

    /// The path reported for this action: its first file, else its first
    /// merge target.
    pub fn primary_path(&self) -> Option<&RelativePath> {
        self.files
            .first()
            .map(|f| &f.path)
            .or_else(|| self.merges.first().map(|m| &m.path))
    }

    /// True when applying this action may write to disk.
    pub const fn writes(&self) -> bool {
        !matches!(self.action, ActionType::SkipExisting)
    }
}

/// Ordered actions for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPlan {
    run_id: Uuid,
    actions: Vec<PlannedAction>,
}

impl GenerationPlan {
    /// Build a plan, sorting actions into kind order.
    pub fn new(run_id: Uuid, mut actions: Vec<PlannedAction>) -> Self {
        actions.sort_by_key(|a| a.kind);
        Self { run_id, actions }
    }

    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn actions(&self) -> &[PlannedAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn action(&self, kind: ArtifactKind) -> Option<&PlannedAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.actions.iter().map(|a| a.kind)
    }

    /// This plan minus the actions for `done`, keeping the run id.
    pub fn without_kinds(self, done: &BTreeSet<ArtifactKind>) -> Self {
        Self {
            run_id: self.run_id,
            actions: self
                .actions
                .into_iter()
                .filter(|a| !done.contains(&a.kind))
                .collect(),
        }
    }

    /// Number of files the plan creates outright, not counting merges.
    pub fn files_to_create(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.action == ActionType::CreateNew)
            .map(|a| a.files.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(p: &str) -> PlannedFile {
        PlannedFile {
            path: RelativePath::try_new(p).unwrap(),
            content: "x".into(),
        }
    }

    #[test]
    fn actions_are_sorted_by_kind() {
        let plan = GenerationPlan::new(
            Uuid::new_v4(),
            vec![
                PlannedAction::create(ArtifactKind::Saga, vec![file("a/saga.ts")]),
                PlannedAction::create(ArtifactKind::Event, vec![file("a/e.ts")]),
            ],
        );
        let kinds: Vec<_> = plan.kinds().collect();
        assert_eq!(kinds, vec![ArtifactKind::Event, ArtifactKind::Saga]);
    }

    #[test]
    fn without_kinds_drops_completed_actions() {
        let run_id = Uuid::new_v4();
        let plan = GenerationPlan::new(
            run_id,
            vec![
                PlannedAction::create(ArtifactKind::Command, vec![file("a/c.ts")]),
                PlannedAction::create(ArtifactKind::Query, vec![file("a/q.ts")]),
            ],
        );
        let rest = plan.without_kinds(&[ArtifactKind::Command].into());
        assert_eq!(rest.run_id(), run_id);
        assert_eq!(rest.kinds().collect::<Vec<_>>(), vec![ArtifactKind::Query]);
    }

    #[test]
    fn skip_carries_paths_and_does_not_write() {
        let action = PlannedAction::skip(
            ArtifactKind::Command,
            vec![RelativePath::try_new("a/c.ts").unwrap()],
        );
        assert!(!action.writes());
        assert_eq!(action.primary_path().unwrap().as_str(), "a/c.ts");
    }
}
