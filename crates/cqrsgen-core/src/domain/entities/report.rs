//! Outcome of applying a plan.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{common::RelativePath, plan::ActionType},
    value_objects::ArtifactKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "status")]
pub enum Outcome {
    Created,
    Skipped,
    Merged { added: usize },
    Failed { reason: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Skipped => f.write_str("skipped"),
            Self::Merged { added } => write!(f, "merged (+{added})"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One line of the report: one planned action and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyEntry {
    pub kind: ArtifactKind,
    pub path: RelativePath,
    pub action: ActionType,
    pub outcome: Outcome,
}

impl ApplyEntry {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    run_id: Uuid,
    entries: Vec<ApplyEntry>,
}

impl ApplyReport {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            entries: Vec::new(),
        }
    }

    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn entries(&self) -> &[ApplyEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: ApplyEntry) {
        self.entries.push(entry);
    }

    /// Append another report's entries, dropping any failure already
    /// recorded here. Used when a retry supersedes a failed attempt.
    pub fn absorb_retry(&mut self, retry: ApplyReport) {
        self.entries.retain(|e| !e.is_failure());
        self.entries.extend(retry.entries);
    }

    /// Replace the reason of the recorded failure.
    pub fn reword_failure(&mut self, reason: impl Into<String>) {
        if let Some(entry) = self.entries.iter_mut().rev().find(|e| e.is_failure()) {
            entry.outcome = Outcome::Failed {
                reason: reason.into(),
            };
        }
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn merged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Merged { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Kinds whose actions finished without failure.
    pub fn completed_kinds(&self) -> BTreeSet<ArtifactKind> {
        self.entries
            .iter()
            .filter(|e| !e.is_failure())
            .map(|e| e.kind)
            .collect()
    }

    pub fn outcome(&self, kind: ArtifactKind) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| &e.outcome)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}
