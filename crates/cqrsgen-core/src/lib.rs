//! cqrsgen Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers of the cqrsgen CQRS scaffolding generator.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           cqrsgen-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  ScaffoldService: scan → plan → apply   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │    Filesystem, TemplateOverrides        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    cqrsgen-adapters (Infrastructure)    │
//! │  LocalFilesystem, MemoryFilesystem, ... │
//! └─────────────────────────────────────────┘
//!
//!   Domain layer (pure): DomainName, TemplateRegistry, Planner, barrel
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cqrsgen_core::prelude::*;
//!
//! # fn demo(filesystem: Box<dyn Filesystem>) -> CqrsgenResult<()> {
//! let request = GenerationRequest::builder(DomainName::parse("invoice")?, GenerationMode::Crud)
//!     .security_right("invoice.manage")
//!     .build()?;
//!
//! let service = ScaffoldService::new(filesystem, TemplateRegistry::builtin(), "src/domains");
//! let report = service.scaffold(&request)?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        ScaffoldService, TemplateService,
        ports::{Filesystem, TemplateOverrides},
    };
    pub use crate::domain::{
        ApplyReport, ArtifactKind, CommandOp, DomainName, GenerationMode, GenerationPlan,
        GenerationRequest, Outcome, SagaStep, TemplateRegistry,
    };
    pub use crate::error::{CqrsgenError, CqrsgenResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
