pub mod common;
pub mod existing_state;
pub mod plan;
pub mod report;
pub mod request;

pub use common::RelativePath;
pub use existing_state::{AggregateSnapshot, ExistingState};
pub use plan::{ActionType, GenerationPlan, MergeSpec, PlannedAction, PlannedFile};
pub use report::{ApplyEntry, ApplyReport, Outcome};
pub use request::{GenerationRequest, GenerationRequestBuilder, SagaStep};
