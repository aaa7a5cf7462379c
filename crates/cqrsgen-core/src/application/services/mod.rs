//! Application services - orchestrate use cases.
//!
//! `ScaffoldService` drives the scan → plan → apply flow, delegating to the
//! `Scanner` and `Emitter`. `TemplateService` lists and customises templates.

pub mod emitter;
pub mod scaffold_service;
pub mod scanner;
pub mod template_service;

pub use emitter::{Emission, Emitter};
pub use scaffold_service::ScaffoldService;
pub use scanner::Scanner;
pub use template_service::{TemplateInfo, TemplateService};
