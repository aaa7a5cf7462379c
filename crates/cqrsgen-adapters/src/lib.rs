//! Infrastructure adapters for cqrsgen.
//!
//! This crate implements the ports defined in `cqrsgen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod template_loader;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use template_loader::FilesystemTemplateLoader;
