//! Domain value objects: DomainName, ArtifactKind, ArtifactVariant, GenerationMode.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! type owns its string representation and its `FromStr` parser so the CLI
//! and the template loader agree on spelling.
//!
//! # Adding New Kinds
//!
//! 1. Add the enum variant to `ArtifactKind` at its plan position
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Register a template in `registry::builtin`
//! 4. Teach the planner which modes request it

use crate::domain::{
    error::DomainError,
    naming::{self, camel_case, constant_case, kebab_case, pascal_case, pluralize, split_words},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DomainName ───────────────────────────────────────────────────────────────

/// A validated domain identifier with all derived casing forms.
///
/// Invariant: the raw input matches `[A-Za-z][A-Za-z0-9]*`. Derivations are
/// computed once at construction and never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName {
    raw: String,
    file: String,
    pascal: String,
    camel: String,
    constant: String,
    plural: String,
    plural_pascal: String,
}

impl DomainName {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(DomainError::InvalidDomainName {
                name: input.into(),
                reason: "name cannot be empty".into(),
            });
        }
        if !naming::is_identifier(input) {
            return Err(DomainError::InvalidDomainName {
                name: input.into(),
                reason: "must start with a letter and contain only letters and digits".into(),
            });
        }

        let words = split_words(input);
        let mut plural_words = words.clone();
        if let Some(last) = plural_words.last_mut() {
            *last = pluralize(last);
        }

        Ok(Self {
            raw: input.to_string(),
            file: kebab_case(&words),
            pascal: pascal_case(&words),
            camel: camel_case(&words),
            constant: constant_case(&words),
            plural: kebab_case(&plural_words),
            plural_pascal: pascal_case(&plural_words),
        })
    }

    /// File and directory form: `invoice`, `purchase-order`.
    pub fn as_str(&self) -> &str {
        &self.file
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    pub fn camel(&self) -> &str {
        &self.camel
    }

    pub fn constant(&self) -> &str {
        &self.constant
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn plural_pascal(&self) -> &str {
        &self.plural_pascal
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file)
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DomainName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DomainName> for String {
    fn from(name: DomainName) -> Self {
        name.raw
    }
}

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// One generated or edited unit of a domain.
///
/// Variant order is plan order: producers, then handlers, then the
/// aggregation points, with the parent registration always last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Command,
    Query,
    Event,
    CommandHandler,
    QueryHandler,
    EventHandler,
    Saga,
    HandlersIndex,
    ExternalHandlersIndex,
    DomainModule,
    ParentModuleEdit,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 11] = [
        Self::Command,
        Self::Query,
        Self::Event,
        Self::CommandHandler,
        Self::QueryHandler,
        Self::EventHandler,
        Self::Saga,
        Self::HandlersIndex,
        Self::ExternalHandlersIndex,
        Self::DomainModule,
        Self::ParentModuleEdit,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
            Self::Event => "event",
            Self::CommandHandler => "command-handler",
            Self::QueryHandler => "query-handler",
            Self::EventHandler => "event-handler",
            Self::Saga => "saga",
            Self::HandlersIndex => "handlers-index",
            Self::ExternalHandlersIndex => "external-handlers-index",
            Self::DomainModule => "domain-module",
            Self::ParentModuleEdit => "parent-module-edit",
        }
    }

    /// Aggregation points are merged, never created-or-skipped.
    pub const fn is_aggregation(&self) -> bool {
        matches!(self, Self::HandlersIndex | Self::ParentModuleEdit)
    }

    pub const fn is_single_file(&self) -> bool {
        !self.is_aggregation()
    }

    /// Kinds whose generated code imports this kind's output.
    pub const fn references(&self) -> &'static [ArtifactKind] {
        match self {
            Self::CommandHandler => &[Self::Command],
            Self::QueryHandler => &[Self::Query],
            Self::EventHandler | Self::Saga => &[Self::Event],
            Self::DomainModule => &[Self::HandlersIndex, Self::ExternalHandlersIndex],
            Self::ParentModuleEdit => &[Self::DomainModule],
            _ => &[],
        }
    }

    /// Every variant a kind can take, in render order.
    pub fn all_variants(&self) -> Vec<ArtifactVariant> {
        match self {
            Self::CommandHandler => CommandOp::ALL
                .iter()
                .map(|op| ArtifactVariant::Command(*op))
                .collect(),
            Self::QueryHandler => QueryOp::ALL
                .iter()
                .map(|op| ArtifactVariant::Query(*op))
                .collect(),
            _ => vec![ArtifactVariant::Single],
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownArtifactKind { kind: s.into() })
    }
}

// ── CommandOp / QueryOp ──────────────────────────────────────────────────────

/// The write operations a domain exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandOp {
    Create,
    Update,
    Delete,
}

impl CommandOp {
    pub const ALL: [CommandOp; 3] = [Self::Create, Self::Update, Self::Delete];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub const fn pascal(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    /// Past tense used in event names: `InvoiceCreatedEvent`.
    pub const fn past(&self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
        }
    }
}

impl fmt::Display for CommandOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The read operations a domain exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryOp {
    GetById,
    List,
}

impl QueryOp {
    pub const ALL: [QueryOp; 2] = [Self::GetById, Self::List];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GetById => "getById",
            Self::List => "list",
        }
    }
}

impl fmt::Display for QueryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ArtifactVariant ──────────────────────────────────────────────────────────

/// Which file of a multi-file kind is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactVariant {
    Single,
    Command(CommandOp),
    Query(QueryOp),
}

impl fmt::Display for ArtifactVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Command(op) => write!(f, "command:{op}"),
            Self::Query(op) => write!(f, "query:{op}"),
        }
    }
}

// ── GenerationMode ───────────────────────────────────────────────────────────

/// What a single invocation asks the generator to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    Crud,
    SingleCommand(CommandOp),
    SingleQuery,
    SingleEvent,
    Saga,
    /// Placeholder until the caller has collected the real mode.
    Interactive,
}

impl GenerationMode {
    /// The CLI spelling of this mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crud => "crud",
            Self::SingleCommand(op) => op.as_str(),
            Self::SingleQuery => "query",
            Self::SingleEvent => "event",
            Self::Saga => "saga",
            Self::Interactive => "interactive",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crud" => Ok(Self::Crud),
            "create" => Ok(Self::SingleCommand(CommandOp::Create)),
            "update" => Ok(Self::SingleCommand(CommandOp::Update)),
            "delete" => Ok(Self::SingleCommand(CommandOp::Delete)),
            "query" => Ok(Self::SingleQuery),
            "event" => Ok(Self::SingleEvent),
            "saga" => Ok(Self::Saga),
            "interactive" => Ok(Self::Interactive),
            other => Err(DomainError::UnknownGenerationMode {
                value: other.into(),
            }),
        }
    }
}
