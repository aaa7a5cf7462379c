//! Plan builder: decides, without touching the filesystem, what a request
//! will create, skip and merge given what already exists.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::domain::{
    barrel::{BarrelEntry, BarrelStyle},
    entities::{
        ExistingState, GenerationPlan, GenerationRequest, MergeSpec, PlannedAction, PlannedFile,
        RelativePath,
    },
    error::DomainError,
    registry::{RenderParams, TemplateRegistry},
    validation::DomainValidator,
    value_objects::{ArtifactKind, ArtifactVariant, CommandOp, DomainName, GenerationMode, QueryOp},
};

/// Kinds and operations a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    kinds: BTreeSet<ArtifactKind>,
    command_ops: Vec<CommandOp>,
    query_ops: Vec<QueryOp>,
}

impl Selection {
    fn resolve(mode: GenerationMode, new_domain: bool) -> Self {
        use ArtifactKind::*;

        let (kinds, command_ops, query_ops): (Vec<ArtifactKind>, Vec<CommandOp>, Vec<QueryOp>) =
            match mode {
                GenerationMode::Crud => (
                    ArtifactKind::ALL.to_vec(),
                    CommandOp::ALL.to_vec(),
                    QueryOp::ALL.to_vec(),
                ),
                GenerationMode::SingleCommand(op) => {
                    (vec![Command, CommandHandler, HandlersIndex], vec![op], vec![])
                }
                GenerationMode::SingleQuery => (
                    vec![Query, QueryHandler, HandlersIndex],
                    vec![],
                    QueryOp::ALL.to_vec(),
                ),
                GenerationMode::SingleEvent => (vec![Event, EventHandler, HandlersIndex], vec![], vec![]),
                GenerationMode::Saga => (vec![Saga, HandlersIndex], vec![], vec![]),
                GenerationMode::Interactive => (vec![], vec![], vec![]),
            };

        let mut kinds: BTreeSet<_> = kinds.into_iter().collect();
        if new_domain && mode != GenerationMode::Crud {
            kinds.extend([ExternalHandlersIndex, DomainModule, ParentModuleEdit]);
        }

        Self {
            kinds,
            command_ops,
            query_ops,
        }
    }

    fn variants(&self, kind: ArtifactKind) -> Vec<ArtifactVariant> {
        match kind {
            ArtifactKind::CommandHandler => self
                .command_ops
                .iter()
                .map(|op| ArtifactVariant::Command(*op))
                .collect(),
            ArtifactKind::QueryHandler => self
                .query_ops
                .iter()
                .map(|op| ArtifactVariant::Query(*op))
                .collect(),
            _ => vec![ArtifactVariant::Single],
        }
    }
}

/// Pure planning over a [`TemplateRegistry`].
pub struct Planner<'a> {
    registry: &'a TemplateRegistry,
}

impl<'a> Planner<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn plan(
        &self,
        request: &GenerationRequest,
        state: &ExistingState,
    ) -> Result<GenerationPlan, DomainError> {
        self.plan_with_run_id(request, state, Uuid::new_v4())
    }

    /// As [`Planner::plan`], reusing `run_id` (re-plans after a write race
    /// keep the id of the original run).
    pub fn plan_with_run_id(
        &self,
        request: &GenerationRequest,
        state: &ExistingState,
        run_id: Uuid,
    ) -> Result<GenerationPlan, DomainError> {
        let saga_steps = DomainValidator::validate_request(request)?;
        let selection = Selection::resolve(request.mode(), state.is_new_domain());
        let domain = request.domain();

        let params = RenderParams::from_request(request)
            .with_saga_steps(saga_steps)
            .with_command_ops(selection.command_ops.iter().copied())
            .with_query_ops(selection.query_ops.iter().copied());

        let mut actions = Vec::with_capacity(selection.kinds.len());
        for &kind in &selection.kinds {
            let action = match kind {
                ArtifactKind::HandlersIndex => self.plan_handler_barrel(&selection, domain, state, &params)?,
                ArtifactKind::ParentModuleEdit => self.plan_parent_edit(domain, state, &params)?,
                _ => self.plan_files(kind, &selection, domain, state, &params)?,
            };
            actions.push(action);
        }

        let plan = GenerationPlan::new(run_id, actions);
        self.check_references(&plan, domain, state)?;
        Ok(plan)
    }

    /// Create the missing files of a single-file kind, or skip it entirely.
    fn plan_files(
        &self,
        kind: ArtifactKind,
        selection: &Selection,
        domain: &DomainName,
        state: &ExistingState,
        params: &RenderParams,
    ) -> Result<PlannedAction, DomainError> {
        let mut existing = Vec::new();
        let mut missing = Vec::new();
        for variant in selection.variants(kind) {
            let path = self.registry.path_for(kind, variant, domain)?;
            if state.has_file(&path) {
                existing.push(path);
            } else {
                missing.push(variant);
            }
        }

        if missing.is_empty() {
            return Ok(PlannedAction::skip(kind, existing));
        }

        let files = missing
            .into_iter()
            .map(|variant| {
                self.registry
                    .render_variant(kind, variant, domain, params)
                    .map(|f| PlannedFile {
                        path: f.path,
                        content: f.content,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut action = PlannedAction::create(kind, files);

        if matches!(
            kind,
            ArtifactKind::Command | ArtifactKind::Query | ArtifactKind::Event
        ) {
            if let Some(companion) = self.actions_barrel_merge(kind, domain, state)? {
                action = action.with_companion(companion);
            }
        }

        Ok(action)
    }

    /// Re-export of a newly created action file from `actions/index.ts`.
    fn actions_barrel_merge(
        &self,
        kind: ArtifactKind,
        domain: &DomainName,
        state: &ExistingState,
    ) -> Result<Option<MergeSpec>, DomainError> {
        let Some(entry) = self
            .registry
            .barrel_entry(kind, ArtifactVariant::Single, domain)
        else {
            return Ok(None);
        };

        let path = self.registry.actions_barrel_path(domain)?;
        if state.registered(&path).contains(&entry.module) {
            return Ok(None);
        }

        let entries = vec![entry];
        Ok(Some(MergeSpec {
            fallback: self.registry.render_actions_barrel(&entries),
            path,
            style: BarrelStyle::ReExport,
            entries,
        }))
    }

    fn plan_handler_barrel(
        &self,
        selection: &Selection,
        domain: &DomainName,
        state: &ExistingState,
        params: &RenderParams,
    ) -> Result<PlannedAction, DomainError> {
        let contributed: Vec<BarrelEntry> = [
            ArtifactKind::CommandHandler,
            ArtifactKind::QueryHandler,
            ArtifactKind::EventHandler,
            ArtifactKind::Saga,
        ]
        .into_iter()
        .filter(|k| selection.kinds.contains(k))
        .flat_map(|k| {
            selection
                .variants(k)
                .into_iter()
                .filter_map(move |v| self.registry.barrel_entry(k, v, domain))
        })
        .collect();

        self.plan_merge(ArtifactKind::HandlersIndex, contributed, domain, state, params)
    }

    fn plan_parent_edit(
        &self,
        domain: &DomainName,
        state: &ExistingState,
        params: &RenderParams,
    ) -> Result<PlannedAction, DomainError> {
        let contributed: Vec<BarrelEntry> = self
            .registry
            .barrel_entry(ArtifactKind::DomainModule, ArtifactVariant::Single, domain)
            .into_iter()
            .collect();

        self.plan_merge(ArtifactKind::ParentModuleEdit, contributed, domain, state, params)
    }

    /// Always a merge; entries already registered are subtracted, and the
    /// remainder may be empty.
    fn plan_merge(
        &self,
        kind: ArtifactKind,
        contributed: Vec<BarrelEntry>,
        domain: &DomainName,
        state: &ExistingState,
        params: &RenderParams,
    ) -> Result<PlannedAction, DomainError> {
        let path = self.registry.path_for(kind, ArtifactVariant::Single, domain)?;
        let style = self
            .registry
            .style_for(kind, domain)
            .ok_or_else(|| DomainError::UnknownArtifactKind {
                kind: kind.to_string(),
            })?;

        let registered = state.registered(&path);
        let entries: Vec<BarrelEntry> = contributed
            .iter()
            .filter(|e| !registered.contains(style.key(e)))
            .cloned()
            .collect();

        let fallback = self
            .registry
            .render_variant(
                kind,
                ArtifactVariant::Single,
                domain,
                &params.clone().with_entries(contributed),
            )?
            .content;

        Ok(PlannedAction::merge(
            kind,
            MergeSpec {
                path,
                style,
                entries,
                fallback,
            },
        ))
    }

    /// Every generating action's referenced kinds must exist or be planned.
    fn check_references(
        &self,
        plan: &GenerationPlan,
        domain: &DomainName,
        state: &ExistingState,
    ) -> Result<(), DomainError> {
        let planned: BTreeMap<ArtifactKind, &PlannedAction> =
            plan.actions().iter().map(|a| (a.kind, a)).collect();

        for action in plan.actions().iter().filter(|a| a.writes()) {
            for &referenced in action.kind.references() {
                if planned.contains_key(&referenced) || state.is_present(referenced) {
                    continue;
                }

                let dependent = action.kind.to_string();
                let path = action
                    .primary_path()
                    .map(RelativePath::to_string)
                    .unwrap_or_default();

                return Err(if referenced == ArtifactKind::Event {
                    DomainError::DanglingEventReference {
                        dependent,
                        path,
                        event: format!("{}CreatedEvent", domain.pascal()),
                    }
                } else {
                    DomainError::DanglingReference {
                        dependent,
                        path,
                        referenced: self
                            .registry
                            .path_for(referenced, ArtifactVariant::Single, domain)
                            .map(|p| p.to_string())
                            .unwrap_or_else(|_| referenced.to_string()),
                    }
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        barrel::registered_identifiers,
        entities::{ActionType, AggregateSnapshot, SagaStep},
    };

    fn invoice() -> DomainName {
        DomainName::parse("invoice").unwrap()
    }

    fn request(mode: GenerationMode) -> GenerationRequest {
        GenerationRequest::builder(invoice(), mode).build().unwrap()
    }

    /// State as if every file of `plan` had been written.
    fn state_after(plan: &GenerationPlan) -> ExistingState {
        let mut state = ExistingState::empty(invoice());
        for action in plan.actions() {
            for file in &action.files {
                state.record_file(action.kind, file.path.clone());
            }
            for merge in &action.merges {
                if action.kind.is_aggregation() {
                    state.record_file(action.kind, merge.path.clone());
                }
                state.record_snapshot(AggregateSnapshot {
                    path: merge.path.clone(),
                    content: merge.fallback.clone(),
                    registered: registered_identifiers(&merge.fallback, &merge.style),
                });
            }
        }
        state
    }

    #[test]
    fn crud_on_fresh_domain_creates_everything() {
        let registry = TemplateRegistry::builtin();
        let plan = Planner::new(&registry)
            .plan(&request(GenerationMode::Crud), &ExistingState::empty(invoice()))
            .unwrap();

        assert_eq!(plan.len(), 11);
        let kinds: Vec<_> = plan.kinds().collect();
        assert_eq!(kinds, ArtifactKind::ALL.to_vec());
        assert_eq!(
            plan.action(ArtifactKind::CommandHandler).unwrap().files.len(),
            3
        );
        assert_eq!(plan.action(ArtifactKind::QueryHandler).unwrap().files.len(), 2);
        assert_eq!(
            plan.action(ArtifactKind::ParentModuleEdit).unwrap().action,
            ActionType::MergeAppend
        );
        assert_eq!(plan.kinds().last(), Some(ArtifactKind::ParentModuleEdit));
    }

    #[test]
    fn crud_saga_gets_default_step() {
        let registry = TemplateRegistry::builtin();
        let plan = Planner::new(&registry)
            .plan(&request(GenerationMode::Crud), &ExistingState::empty(invoice()))
            .unwrap();
        let saga = &plan.action(ArtifactKind::Saga).unwrap().files[0];
        assert!(saga.content.contains("compensateProcessInvoice"));
    }

    #[test]
    fn handler_barrel_fallback_lists_all_handlers_in_rank_order() {
        let registry = TemplateRegistry::builtin();
        let plan = Planner::new(&registry)
            .plan(&request(GenerationMode::Crud), &ExistingState::empty(invoice()))
            .unwrap();
        let merge = &plan.action(ArtifactKind::HandlersIndex).unwrap().merges[0];
        let order: Vec<&str> = merge
            .fallback
            .lines()
            .filter(|l| l.starts_with("  "))
            .map(|l| l.trim().trim_end_matches(','))
            .collect();
        assert_eq!(
            order,
            vec![
                "InvoiceProcessingSaga",
                "CreateInvoiceCommandHandler",
                "UpdateInvoiceCommandHandler",
                "DeleteInvoiceCommandHandler",
                "GetInvoiceByIdQueryHandler",
                "ListInvoicesQueryHandler",
                "InvoiceCreatedActivityHandler",
            ]
        );
    }

    #[test]
    fn rerun_skips_files_and_merges_nothing() {
        let registry = TemplateRegistry::builtin();
        let planner = Planner::new(&registry);
        let first = planner
            .plan(&request(GenerationMode::Crud), &ExistingState::empty(invoice()))
            .unwrap();
        let second = planner
            .plan(&request(GenerationMode::Crud), &state_after(&first))
            .unwrap();

        let skipped = second
            .actions()
            .iter()
            .filter(|a| a.action == ActionType::SkipExisting)
            .count();
        assert_eq!(skipped, 9);
        for action in second.actions().iter().filter(|a| a.kind.is_aggregation()) {
            assert_eq!(action.action, ActionType::MergeAppend);
            assert!(action.merges[0].entries.is_empty());
        }
    }

    #[test]
    fn single_command_on_new_domain_adds_module_wiring() {
        let registry = TemplateRegistry::builtin();
        let plan = Planner::new(&registry)
            .plan(
                &request(GenerationMode::SingleCommand(CommandOp::Create)),
                &ExistingState::empty(invoice()),
            )
            .unwrap();
        let kinds: Vec<_> = plan.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                ArtifactKind::Command,
                ArtifactKind::CommandHandler,
                ArtifactKind::HandlersIndex,
                ArtifactKind::ExternalHandlersIndex,
                ArtifactKind::DomainModule,
                ArtifactKind::ParentModuleEdit,
            ]
        );
        assert_eq!(plan.action(ArtifactKind::CommandHandler).unwrap().files.len(), 1);
    }

    #[test]
    fn partial_handlers_create_only_missing_files() {
        let registry = TemplateRegistry::builtin();
        let planner = Planner::new(&registry);
        let first = planner
            .plan(
                &request(GenerationMode::SingleCommand(CommandOp::Create)),
                &ExistingState::empty(invoice()),
            )
            .unwrap();
        let state = state_after(&first);

        let plan = planner
            .plan(&request(GenerationMode::SingleCommand(CommandOp::Update)), &state)
            .unwrap();
        assert_eq!(
            plan.action(ArtifactKind::Command).unwrap().action,
            ActionType::SkipExisting
        );
        let handler = plan.action(ArtifactKind::CommandHandler).unwrap();
        assert_eq!(handler.action, ActionType::CreateNew);
        assert_eq!(
            handler.files[0].path.as_str(),
            "invoice/handlers/handler.command.invoice.update.ts"
        );
        let barrel = &plan.action(ArtifactKind::HandlersIndex).unwrap().merges[0];
        assert_eq!(barrel.entries.len(), 1);
        assert_eq!(barrel.entries[0].identifier, "UpdateInvoiceCommandHandler");
        // Existing domain: no module wiring this time.
        assert!(plan.action(ArtifactKind::DomainModule).is_none());
    }

    #[test]
    fn saga_without_events_is_dangling() {
        let registry = TemplateRegistry::builtin();
        let req = GenerationRequest::builder(invoice(), GenerationMode::Saga)
            .saga_steps(vec![SagaStep::new("notify", false).unwrap()])
            .build()
            .unwrap();
        let err = Planner::new(&registry)
            .plan(&req, &ExistingState::empty(invoice()))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::DanglingEventReference {
                dependent: "saga".into(),
                path: "invoice/handlers/saga.invoice.processing.ts".into(),
                event: "InvoiceCreatedEvent".into(),
            }
        );
    }

    #[test]
    fn saga_with_empty_steps_is_rejected_before_planning() {
        let registry = TemplateRegistry::builtin();
        let req = GenerationRequest::builder(invoice(), GenerationMode::Saga)
            .saga_steps(vec![])
            .build()
            .unwrap();
        let err = Planner::new(&registry)
            .plan(&req, &ExistingState::empty(invoice()))
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingRequiredParam {
                param: "sagaSteps",
                ..
            }
        ));
    }

    #[test]
    fn action_files_register_in_actions_barrel() {
        let registry = TemplateRegistry::builtin();
        let plan = Planner::new(&registry)
            .plan(&request(GenerationMode::Crud), &ExistingState::empty(invoice()))
            .unwrap();
        let companion = &plan.action(ArtifactKind::Query).unwrap().merges[0];
        assert_eq!(companion.path.as_str(), "invoice/actions/index.ts");
        assert_eq!(companion.entries[0].module, "./invoice.queries");
    }

    #[test]
    fn plan_with_run_id_keeps_id() {
        let registry = TemplateRegistry::builtin();
        let id = Uuid::new_v4();
        let plan = Planner::new(&registry)
            .plan_with_run_id(&request(GenerationMode::Crud), &ExistingState::empty(invoice()), id)
            .unwrap();
        assert_eq!(plan.run_id(), id);
    }
}
