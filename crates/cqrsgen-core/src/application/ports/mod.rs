//! Application ports (traits) for external dependencies.
//!
//! - **Driven (Output) Ports**: called by services, implemented in `cqrsgen-adapters`
//!   - `Filesystem`: reads and atomic writes under the domains root
//!   - `TemplateOverrides`: template bodies supplied from outside the binary

pub mod output;

pub use output::{Filesystem, PortResult, TemplateOverride, TemplateOverrides};

#[cfg(test)]
pub use output::MockFilesystem;
