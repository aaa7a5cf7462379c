//! Application layer for cqrsgen.
//!
//! This layer contains:
//! - **Services**: scan, plan and apply orchestration (`ScaffoldService`)
//! - **Ports**: the `Filesystem` and `TemplateOverrides` traits adapters implement
//! - **Errors**: emission and I/O failures
//!
//! The application layer coordinates the domain layer but holds no
//! generation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{Emission, Emitter, ScaffoldService, Scanner, TemplateInfo, TemplateService};

pub use ports::{Filesystem, PortResult, TemplateOverride, TemplateOverrides};

pub use error::ApplicationError;
