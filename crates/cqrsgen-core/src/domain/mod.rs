// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for cqrsgen.
//!
//! Pure generation logic: naming, templates, barrel merging and planning.
//! All filesystem access goes through the ports defined in the application
//! layer; nothing in here performs I/O or logs.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: the planner works on an `ExistingState` snapshot
//! - **Deterministic**: identical inputs render byte-identical files
//! - **Immutable values**: requests and plans are `Clone + PartialEq`
//! - **Fail early**: every `DomainError` is raised before the first write

pub mod barrel;
pub mod entities;
pub mod error;
pub mod planner;
pub mod registry;
pub mod value_objects;

mod naming;
mod validation;

pub use barrel::{BarrelEntry, BarrelStyle};
pub use entities::{
    ActionType, AggregateSnapshot, ApplyEntry, ApplyReport, ExistingState, GenerationPlan,
    GenerationRequest, GenerationRequestBuilder, MergeSpec, Outcome, PlannedAction, PlannedFile,
    RelativePath, SagaStep,
};
pub use error::{DomainError, ErrorCategory};
pub use planner::Planner;
pub use registry::{
    ArtifactTemplate, Layout, RenderContext, RenderParams, RenderedFile, TemplateRegistry,
    TemplateSource,
};
pub use validation::DomainValidator;
pub use value_objects::{
    ArtifactKind, ArtifactVariant, CommandOp, DomainName, GenerationMode, QueryOp,
};
