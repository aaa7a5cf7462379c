//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the generation workflow:
//! 1. Scan the domain directory
//! 2. Build a plan (pure, may reject the request)
//! 3. Apply the plan, re-planning once if another writer raced us

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::{Emission, Emitter, Scanner},
    },
    domain::{
        ApplyReport, DomainName, ExistingState, GenerationPlan, GenerationRequest, Planner,
        TemplateRegistry,
    },
    error::CqrsgenResult,
};

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    registry: TemplateRegistry,
    root: PathBuf,
}

impl ScaffoldService {
    /// Create a new scaffold service writing under `root`, the domains root.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use cqrsgen_core::application::{ScaffoldService, ports::Filesystem};
    /// use cqrsgen_core::domain::TemplateRegistry;
    ///
    /// # fn demo(filesystem: Box<dyn Filesystem>) {
    /// let service = ScaffoldService::new(filesystem, TemplateRegistry::builtin(), "src/domains");
    /// # }
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        registry: TemplateRegistry,
        root: impl AsRef<Path>,
    ) -> Self {
        Self {
            filesystem,
            registry,
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Inspect what already exists for `domain`.
    pub fn scan(&self, domain: &DomainName) -> CqrsgenResult<ExistingState> {
        Scanner::new(self.filesystem.as_ref(), &self.registry, &self.root).scan(domain)
    }

    /// Scan and plan without writing anything.
    #[instrument(skip_all, fields(domain = %request.domain(), mode = %request.mode()))]
    pub fn plan(&self, request: &GenerationRequest) -> CqrsgenResult<GenerationPlan> {
        let state = self.scan(request.domain())?;
        let plan = Planner::new(&self.registry).plan(request, &state)?;
        info!(run_id = %plan.run_id(), actions = plan.len(), "Plan built");
        Ok(plan)
    }

    /// Apply a plan once. No retry.
    pub fn apply(&self, plan: &GenerationPlan) -> Emission {
        Emitter::new(self.filesystem.as_ref(), &self.root).apply(plan)
    }

    /// Scan, plan and apply.
    ///
    /// Request and structural errors are returned before any write. Errors
    /// during emission are recorded in the report, which is still returned.
    /// A `WriteConflict` triggers one re-scan and re-plan of the actions that
    /// did not complete; a second conflict is recorded as
    /// `ConcurrentModification`.
    #[instrument(skip_all, fields(domain = %request.domain(), mode = %request.mode()))]
    pub fn scaffold(&self, request: &GenerationRequest) -> CqrsgenResult<ApplyReport> {
        let plan = self.plan(request)?;
        let Emission {
            mut report,
            failure,
        } = self.apply(&plan);

        let Some(ApplicationError::WriteConflict { kind, path }) = failure else {
            log_summary(&report);
            return Ok(report);
        };

        warn!(%kind, path = %path.display(), "Write race detected, re-planning once");

        let done = report.completed_kinds();
        let state = self.scan(request.domain())?;
        let replan = Planner::new(&self.registry)
            .plan_with_run_id(request, &state, plan.run_id())?
            .without_kinds(&done);

        let Emission {
            report: mut retry,
            failure,
        } = self.apply(&replan);

        if let Some(ApplicationError::WriteConflict { kind, path }) = failure {
            let err = ApplicationError::ConcurrentModification { kind, path };
            warn!(error = %err, "Write race repeated");
            retry.reword_failure(err.to_string());
        }

        report.absorb_retry(retry);
        log_summary(&report);
        Ok(report)
    }
}

fn log_summary(report: &ApplyReport) {
    info!(
        run_id = %report.run_id(),
        created = report.created(),
        skipped = report.skipped(),
        merged = report.merged(),
        failed = report.failed(),
        "Scaffold finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{CommandOp, DomainError, GenerationMode, Outcome, SagaStep};
    use crate::error::CqrsgenError;

    fn invoice() -> DomainName {
        DomainName::parse("invoice").unwrap()
    }

    /// A mock that reports an empty tree and panics on any write.
    fn read_only_mock() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_read_to_string().returning(|_| Ok(None));
        fs.expect_write_new().never();
        fs.expect_write_replace().never();
        fs.expect_create_dir_all().never();
        fs
    }

    #[test]
    fn rejected_saga_request_performs_no_writes() {
        let service = ScaffoldService::new(
            Box::new(read_only_mock()),
            TemplateRegistry::builtin(),
            "domains",
        );
        let request = GenerationRequest::builder(invoice(), GenerationMode::Saga)
            .saga_steps(vec![])
            .build()
            .unwrap();

        let err = service.scaffold(&request).unwrap_err();
        assert!(matches!(
            err,
            CqrsgenError::Domain(DomainError::MissingRequiredParam {
                param: "sagaSteps",
                ..
            })
        ));
    }

    #[test]
    fn dangling_reference_performs_no_writes() {
        let service = ScaffoldService::new(
            Box::new(read_only_mock()),
            TemplateRegistry::builtin(),
            "domains",
        );
        let request = GenerationRequest::builder(invoice(), GenerationMode::Saga)
            .saga_steps(vec![SagaStep::new("notify", false).unwrap()])
            .build()
            .unwrap();

        let err = service.scaffold(&request).unwrap_err();
        assert!(matches!(
            err,
            CqrsgenError::Domain(DomainError::DanglingEventReference { .. })
        ));
    }

    #[test]
    fn plan_never_writes() {
        let service = ScaffoldService::new(
            Box::new(read_only_mock()),
            TemplateRegistry::builtin(),
            "domains",
        );
        let request =
            GenerationRequest::builder(invoice(), GenerationMode::SingleCommand(CommandOp::Create))
                .build()
                .unwrap();

        let plan = service.plan(&request).unwrap();
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn io_failure_is_recorded_and_stops_the_run() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_read_to_string().returning(|_| Ok(None));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_new().times(1).returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            })
        });
        fs.expect_write_replace().never();

        let service = ScaffoldService::new(Box::new(fs), TemplateRegistry::builtin(), "domains");
        let request = GenerationRequest::builder(invoice(), GenerationMode::Crud)
            .build()
            .unwrap();

        let report = service.scaffold(&request).unwrap();
        assert_eq!(report.entries().len(), 1);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            &report.entries()[0].outcome,
            Outcome::Failed { reason } if reason.contains("disk full")
        ));
    }

    #[test]
    fn repeated_conflict_becomes_concurrent_modification() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_read_to_string().returning(|_| Ok(None));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_new()
            .times(2)
            .returning(|path, _| Err(ApplicationError::FileExists {
                path: path.to_path_buf(),
            }));

        let service = ScaffoldService::new(Box::new(fs), TemplateRegistry::builtin(), "domains");
        let request = GenerationRequest::builder(invoice(), GenerationMode::Crud)
            .build()
            .unwrap();

        let report = service.scaffold(&request).unwrap();
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            &report.entries()[0].outcome,
            Outcome::Failed { reason } if reason.contains("modified concurrently")
        ));
    }
}
