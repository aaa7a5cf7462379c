//! Template registry: one body and one target path pattern per artifact kind.
//!
//! The registry is the leaf of the generator. It knows how to name and
//! render every artifact but nothing about what already exists on disk.
//! Rendering is deterministic: identical inputs produce byte-identical
//! output, which is what lets a second run recognise its own files.

mod builtin;
mod context;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use context::RenderContext;

use crate::domain::{
    barrel::{self, BarrelEntry, BarrelStyle},
    entities::{RelativePath, SagaStep, request::GenerationRequest},
    error::DomainError,
    naming,
    value_objects::{ArtifactKind, ArtifactVariant, CommandOp, DomainName, QueryOp},
};

/// Where a template body came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "origin")]
pub enum TemplateSource {
    Builtin,
    /// Loaded from disk; `origin` names the file.
    Override(String),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("builtin"),
            Self::Override(origin) => write!(f, "override ({origin})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactTemplate {
    pub kind: ArtifactKind,
    pub path_pattern: String,
    pub description: String,
    #[serde(skip)]
    pub body: String,
    pub source: TemplateSource,
}

/// Placement of files outside the domain directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    parent_module: RelativePath,
}

impl Layout {
    pub const DEFAULT_PARENT_MODULE: &'static str = "domains.module.ts";

    pub fn new(parent_module: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            parent_module: RelativePath::try_new(parent_module)?,
        })
    }

    pub fn parent_module(&self) -> &RelativePath {
        &self.parent_module
    }

    /// Module specifier from the parent file's directory to `target`
    /// (both relative to the domains root, `target` without extension).
    fn import_from_parent(&self, target: &str) -> String {
        let depth = self.parent_module.as_str().matches('/').count();
        if depth == 0 {
            format!("./{target}")
        } else {
            format!("{}{target}", "../".repeat(depth))
        }
    }

    /// Class name for a freshly created parent file: `domains.module.ts`
    /// becomes `DomainsModule`.
    fn parent_class(&self) -> String {
        let stem = self
            .parent_module
            .file_name()
            .split('.')
            .next()
            .unwrap_or_default();
        let words = naming::split_words(stem);
        if words.is_empty() {
            "RootModule".into()
        } else {
            format!("{}Module", naming::pascal_case(&words))
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            parent_module: RelativePath::trusted(Self::DEFAULT_PARENT_MODULE),
        }
    }
}

/// Everything a template may need beyond the domain name.
///
/// Built from a request, then narrowed per kind by the planner (which ops to
/// render, which barrel entries to list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderParams {
    pub security_right: Option<String>,
    pub entity_type_tag: Option<String>,
    pub repository_token: Option<String>,
    pub saga_steps: Vec<SagaStep>,
    pub services: Vec<String>,
    pub command_ops: Vec<CommandOp>,
    pub query_ops: Vec<QueryOp>,
    pub entries: Vec<BarrelEntry>,
}

impl RenderParams {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            security_right: request.security_right().map(str::to_string),
            entity_type_tag: request.entity_type_tag().map(str::to_string),
            repository_token: request.repository_token().map(str::to_string),
            saga_steps: request.saga_steps().map(<[_]>::to_vec).unwrap_or_default(),
            services: request.service_dependencies().iter().cloned().collect(),
            ..Self::default()
        }
    }

    pub fn with_command_ops(mut self, ops: impl IntoIterator<Item = CommandOp>) -> Self {
        self.command_ops = ops.into_iter().collect();
        self
    }

    pub fn with_query_ops(mut self, ops: impl IntoIterator<Item = QueryOp>) -> Self {
        self.query_ops = ops.into_iter().collect();
        self
    }

    pub fn with_saga_steps(mut self, steps: Vec<SagaStep>) -> Self {
        self.saga_steps = steps;
        self
    }

    pub fn with_entries(mut self, entries: Vec<BarrelEntry>) -> Self {
        self.entries = entries;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: RelativePath,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    layout: Layout,
    templates: BTreeMap<ArtifactKind, ArtifactTemplate>,
}

impl TemplateRegistry {
    /// A registry with no templates.
    pub fn empty(layout: Layout) -> Self {
        Self {
            layout,
            templates: BTreeMap::new(),
        }
    }

    /// All eleven kinds with their built-in bodies and the default layout.
    pub fn builtin() -> Self {
        let mut registry = Self::empty(Layout::default());
        for kind in ArtifactKind::ALL {
            registry.register(ArtifactTemplate {
                kind,
                path_pattern: builtin::path_pattern(kind).into(),
                description: builtin::description(kind).into(),
                body: builtin::body(kind).into(),
                source: TemplateSource::Builtin,
            });
        }
        registry
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn register(&mut self, template: ArtifactTemplate) {
        self.templates.insert(template.kind, template);
    }

    /// Replace the body of `kind`, keeping its path pattern.
    pub fn override_template(
        &mut self,
        kind: ArtifactKind,
        body: impl Into<String>,
        origin: impl Into<String>,
    ) -> Result<(), DomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(DomainError::EmptyTemplate {
                kind: kind.to_string(),
            });
        }
        let template = self.get(kind)?;
        let replaced = ArtifactTemplate {
            body,
            source: TemplateSource::Override(origin.into()),
            ..template.clone()
        };
        self.register(replaced);
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ArtifactTemplate> {
        self.templates.values()
    }

    pub fn get(&self, kind: ArtifactKind) -> Result<&ArtifactTemplate, DomainError> {
        self.templates
            .get(&kind)
            .ok_or_else(|| DomainError::UnknownArtifactKind {
                kind: kind.to_string(),
            })
    }

    // ── Paths ────────────────────────────────────────────────────────────────

    pub fn path_for(
        &self,
        kind: ArtifactKind,
        variant: ArtifactVariant,
        domain: &DomainName,
    ) -> Result<RelativePath, DomainError> {
        check_variant(kind, variant)?;
        let template = self.get(kind)?;
        let ctx = self.base_context(domain).with_variable("OP", op_name(variant));
        RelativePath::try_new(ctx.render(&template.path_pattern))
    }

    /// Every path any variant of `kind` may occupy.
    pub fn all_paths(
        &self,
        kind: ArtifactKind,
        domain: &DomainName,
    ) -> Result<Vec<(ArtifactVariant, RelativePath)>, DomainError> {
        kind.all_variants()
            .into_iter()
            .map(|v| Ok((v, self.path_for(kind, v, domain)?)))
            .collect()
    }

    pub fn actions_barrel_path(&self, domain: &DomainName) -> Result<RelativePath, DomainError> {
        RelativePath::try_new(self.base_context(domain).render(builtin::ACTIONS_BARREL))
    }

    /// Style of an aggregation kind's file.
    pub fn style_for(&self, kind: ArtifactKind, domain: &DomainName) -> Option<BarrelStyle> {
        match kind {
            ArtifactKind::HandlersIndex => Some(BarrelStyle::HandlerList {
                constant: format!("{}_HANDLERS", domain.constant()),
            }),
            ArtifactKind::ParentModuleEdit => Some(BarrelStyle::ModuleImports),
            _ => None,
        }
    }

    // ── Barrel entries ───────────────────────────────────────────────────────

    /// What one variant of `kind` contributes to an aggregation file.
    ///
    /// Handlers and the saga contribute to the handler barrel, the domain
    /// module to the parent file, and the action files to the actions
    /// re-export barrel. Aggregation kinds contribute nothing.
    pub fn barrel_entry(
        &self,
        kind: ArtifactKind,
        variant: ArtifactVariant,
        domain: &DomainName,
    ) -> Option<BarrelEntry> {
        let d = domain.as_str();
        let p = domain.pascal();
        match (kind, variant) {
            (ArtifactKind::Command | ArtifactKind::Query | ArtifactKind::Event, _) => {
                let stem = match kind {
                    ArtifactKind::Command => format!("{d}.commands"),
                    ArtifactKind::Query => format!("{d}.queries"),
                    _ => format!("{d}.events"),
                };
                Some(BarrelEntry::new(stem.clone(), format!("./{stem}")))
            }
            (ArtifactKind::CommandHandler, ArtifactVariant::Command(op)) => Some(BarrelEntry::new(
                command_handler_class(op, domain),
                format!("./handler.command.{d}.{}", op.as_str()),
            )),
            (ArtifactKind::QueryHandler, ArtifactVariant::Query(op)) => Some(BarrelEntry::new(
                query_handler_class(op, domain),
                format!("./handler.query.{d}.{}", op.as_str()),
            )),
            (ArtifactKind::EventHandler, _) => Some(BarrelEntry::new(
                format!("{p}CreatedActivityHandler"),
                format!("./handler.event.{d}.created.activity"),
            )),
            (ArtifactKind::Saga, _) => Some(BarrelEntry::new(
                format!("{p}ProcessingSaga"),
                format!("./saga.{d}.processing"),
            )),
            (ArtifactKind::DomainModule, _) => Some(BarrelEntry::new(
                format!("{p}DomainModule"),
                self.layout
                    .import_from_parent(&format!("{d}/{d}.domain.module")),
            )),
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Render every variant of `kind` requested by `params`.
    pub fn render(
        &self,
        kind: ArtifactKind,
        domain: &DomainName,
        params: &RenderParams,
    ) -> Result<Vec<RenderedFile>, DomainError> {
        requested_variants(kind, params)?
            .into_iter()
            .map(|v| self.render_variant(kind, v, domain, params))
            .collect()
    }

    pub fn render_variant(
        &self,
        kind: ArtifactKind,
        variant: ArtifactVariant,
        domain: &DomainName,
        params: &RenderParams,
    ) -> Result<RenderedFile, DomainError> {
        let path = self.path_for(kind, variant, domain)?;
        let template = self.get(kind)?;
        let ctx = self.context_for(kind, variant, domain, params)?;
        Ok(RenderedFile {
            path,
            content: ctx.render(&template.body),
        })
    }

    /// Fresh content of the actions re-export barrel.
    pub fn render_actions_barrel(&self, entries: &[BarrelEntry]) -> String {
        let mut out = barrel::render_imports(&BarrelStyle::ReExport, entries);
        out.push('\n');
        out
    }

    fn base_context(&self, domain: &DomainName) -> RenderContext {
        RenderContext::new(domain)
            .with_variable("PARENT_MODULE", self.layout.parent_module.as_str())
            .with_variable("PARENT_CLASS", self.layout.parent_class())
    }

    fn context_for(
        &self,
        kind: ArtifactKind,
        variant: ArtifactVariant,
        domain: &DomainName,
        params: &RenderParams,
    ) -> Result<RenderContext, DomainError> {
        let entity_type = params
            .entity_type_tag
            .clone()
            .unwrap_or_else(|| domain.constant().to_string());
        let repository_token = params
            .repository_token
            .clone()
            .unwrap_or_else(|| format!("{}_REPOSITORY", domain.constant()));

        let ctx = self
            .base_context(domain)
            .with_variable("OP", op_name(variant))
            .with_variable("ENTITY_TYPE", entity_type)
            .with_variable("REPOSITORY_TOKEN", repository_token);

        let ctx = match (kind, variant) {
            (ArtifactKind::CommandHandler, ArtifactVariant::Command(op)) => {
                let command = format!("{}{}Command", op.pascal(), domain.pascal());
                let body = match op {
                    CommandOp::Create => {
                        "await this.repository.create(command.entityType, command.payload);"
                    }
                    CommandOp::Update => {
                        "await this.repository.update(command.entityType, command.id, command.payload);"
                    }
                    CommandOp::Delete => {
                        "await this.repository.delete(command.entityType, command.id);"
                    }
                };
                with_handler_vars(ctx, params)
                    .with_variable("COMMAND_CLASS", command)
                    .with_variable("HANDLER_CLASS", command_handler_class(op, domain))
                    .with_variable("OP_BODY", body)
            }
            (ArtifactKind::QueryHandler, ArtifactVariant::Query(op)) => {
                let (query, body) = match op {
                    QueryOp::GetById => (
                        format!("Get{}ByIdQuery", domain.pascal()),
                        "return this.repository.findById(query.entityType, query.id);",
                    ),
                    QueryOp::List => (
                        format!("List{}Query", domain.plural_pascal()),
                        "return this.repository.findAll(query.entityType, query.filter);",
                    ),
                };
                with_handler_vars(ctx, params)
                    .with_variable("QUERY_CLASS", query)
                    .with_variable("HANDLER_CLASS", query_handler_class(op, domain))
                    .with_variable("OP_BODY", body)
            }
            (ArtifactKind::Saga, _) => {
                if params.saga_steps.is_empty() {
                    return Err(DomainError::MissingRequiredParam {
                        kind: kind.to_string(),
                        param: "sagaSteps",
                    });
                }
                let event = format!("{}CreatedEvent", domain.pascal());
                ctx.with_variable("SAGA_STEP_LIST", saga_step_list(&params.saga_steps))
                    .with_variable(
                        "SAGA_STEP_METHODS",
                        saga_step_methods(&params.saga_steps, &event),
                    )
            }
            (ArtifactKind::HandlersIndex, _) => {
                let style = BarrelStyle::HandlerList {
                    constant: format!("{}_HANDLERS", domain.constant()),
                };
                let imports = barrel::render_imports(&style, &params.entries);
                let imports = if imports.is_empty() {
                    imports
                } else {
                    format!("{imports}\n\n")
                };
                ctx.with_variable("IMPORTS", imports)
                    .with_variable("ENTRIES", barrel::render_items(&style, &params.entries, "  "))
            }
            (ArtifactKind::ParentModuleEdit, _) => {
                let style = BarrelStyle::ModuleImports;
                let imports: String = barrel::render_imports(&style, &params.entries)
                    .lines()
                    .map(|l| format!("{l}\n"))
                    .collect();
                ctx.with_variable("IMPORTS", format!("{imports}\n"))
                    .with_variable(
                        "ENTRIES",
                        barrel::render_items(&style, &params.entries, "    "),
                    )
            }
            _ => ctx,
        };

        Ok(ctx)
    }
}

fn check_variant(kind: ArtifactKind, variant: ArtifactVariant) -> Result<(), DomainError> {
    let ok = match kind {
        ArtifactKind::CommandHandler => matches!(variant, ArtifactVariant::Command(_)),
        ArtifactKind::QueryHandler => matches!(variant, ArtifactVariant::Query(_)),
        _ => matches!(variant, ArtifactVariant::Single),
    };
    if ok {
        Ok(())
    } else {
        Err(DomainError::InvalidArtifactVariant {
            kind: kind.to_string(),
            variant: variant.to_string(),
        })
    }
}

fn requested_variants(
    kind: ArtifactKind,
    params: &RenderParams,
) -> Result<Vec<ArtifactVariant>, DomainError> {
    let variants: Vec<_> = match kind {
        ArtifactKind::CommandHandler => params
            .command_ops
            .iter()
            .map(|op| ArtifactVariant::Command(*op))
            .collect(),
        ArtifactKind::QueryHandler => params
            .query_ops
            .iter()
            .map(|op| ArtifactVariant::Query(*op))
            .collect(),
        _ => vec![ArtifactVariant::Single],
    };

    if variants.is_empty() {
        let param = if kind == ArtifactKind::CommandHandler {
            "commandOps"
        } else {
            "queryOps"
        };
        return Err(DomainError::MissingRequiredParam {
            kind: kind.to_string(),
            param,
        });
    }
    Ok(variants)
}

fn op_name(variant: ArtifactVariant) -> &'static str {
    match variant {
        ArtifactVariant::Command(op) => op.as_str(),
        ArtifactVariant::Query(op) => op.as_str(),
        ArtifactVariant::Single => "",
    }
}

fn command_handler_class(op: CommandOp, domain: &DomainName) -> String {
    format!("{}{}CommandHandler", op.pascal(), domain.pascal())
}

fn query_handler_class(op: QueryOp, domain: &DomainName) -> String {
    match op {
        QueryOp::GetById => format!("Get{}ByIdQueryHandler", domain.pascal()),
        QueryOp::List => format!("List{}QueryHandler", domain.plural_pascal()),
    }
}

/// Security and service injection lines shared by command and query handlers.
fn with_handler_vars(ctx: RenderContext, params: &RenderParams) -> RenderContext {
    let (security_import, security_decorator) = match &params.security_right {
        Some(right) => (
            "import { RequiresRight } from '@cqrs/security';\n".to_string(),
            format!("@RequiresRight('{right}')\n"),
        ),
        None => (String::new(), String::new()),
    };

    let service_imports = if params.services.is_empty() {
        String::new()
    } else {
        format!(
            "import {{ {} }} from '@app/services';\n",
            params.services.join(", ")
        )
    };

    let service_injections: String = params
        .services
        .iter()
        .map(|svc| {
            let field = naming::camel_case(&naming::split_words(svc));
            format!("    private readonly {field}: {svc},\n")
        })
        .collect();

    ctx.with_variable("SECURITY_IMPORT", security_import)
        .with_variable("SECURITY_DECORATOR", security_decorator)
        .with_variable("SERVICE_IMPORTS", service_imports)
        .with_variable("SERVICE_INJECTIONS", service_injections)
}

fn compensation_name(step: &SagaStep) -> String {
    format!("compensate{}", naming::capitalize(step.name()))
}

fn saga_step_list(steps: &[SagaStep]) -> String {
    steps
        .iter()
        .map(|step| {
            let name = step.name();
            if step.has_compensation() {
                format!(
                    "    {{ name: '{name}', run: this.{name}, compensate: this.{} }},\n",
                    compensation_name(step)
                )
            } else {
                format!("    {{ name: '{name}', run: this.{name} }},\n")
            }
        })
        .collect()
}

fn saga_step_methods(steps: &[SagaStep], event: &str) -> String {
    let method = |name: &str| {
        format!(
            "\n  async {name}(event: {event}): Promise<void> {{\n    throw new Error('Not implemented: {name}');\n  }}\n"
        )
    };

    steps
        .iter()
        .flat_map(|step| {
            let mut out = vec![method(step.name())];
            if step.has_compensation() {
                out.push(method(&compensation_name(step)));
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> DomainName {
        DomainName::parse("invoice").unwrap()
    }

    fn params() -> RenderParams {
        RenderParams::default()
            .with_command_ops(CommandOp::ALL)
            .with_query_ops(QueryOp::ALL)
    }

    #[test]
    fn builtin_registers_every_kind() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.entries().count(), ArtifactKind::ALL.len());
        assert!(registry.entries().all(|t| t.source == TemplateSource::Builtin));
    }

    #[test]
    fn paths_follow_layout() {
        let registry = TemplateRegistry::builtin();
        let d = DomainName::parse("purchaseOrder").unwrap();
        let path = |kind, variant| registry.path_for(kind, variant, &d).unwrap().to_string();

        assert_eq!(
            path(ArtifactKind::Command, ArtifactVariant::Single),
            "purchase-order/actions/purchase-order.commands.ts"
        );
        assert_eq!(
            path(
                ArtifactKind::QueryHandler,
                ArtifactVariant::Query(QueryOp::GetById)
            ),
            "purchase-order/handlers/handler.query.purchase-order.getById.ts"
        );
        assert_eq!(
            path(ArtifactKind::ExternalHandlersIndex, ArtifactVariant::Single),
            "purchase-order/external.handlers/index.ts"
        );
        assert_eq!(
            path(ArtifactKind::ParentModuleEdit, ArtifactVariant::Single),
            "domains.module.ts"
        );
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let err = TemplateRegistry::builtin()
            .path_for(ArtifactKind::Command, ArtifactVariant::Query(QueryOp::List), &invoice())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArtifactVariant { .. }));
    }

    #[test]
    fn render_is_deterministic() {
        let registry = TemplateRegistry::builtin();
        let a = registry
            .render(ArtifactKind::CommandHandler, &invoice(), &params())
            .unwrap();
        let b = registry
            .render(ArtifactKind::CommandHandler, &invoice(), &params())
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn command_handler_defaults() {
        let file = TemplateRegistry::builtin()
            .render_variant(
                ArtifactKind::CommandHandler,
                ArtifactVariant::Command(CommandOp::Create),
                &invoice(),
                &params(),
            )
            .unwrap();
        assert!(file.content.contains("@Inject('INVOICE_REPOSITORY')"));
        assert!(file.content.contains("export class CreateInvoiceCommandHandler"));
        assert!(!file.content.contains("RequiresRight"));
        assert!(!file.content.contains("{{"));
    }

    #[test]
    fn security_right_and_services_are_injected() {
        let params = RenderParams {
            security_right: Some("invoice.write".into()),
            services: vec!["AuditService".into()],
            ..params()
        };
        let file = TemplateRegistry::builtin()
            .render_variant(
                ArtifactKind::CommandHandler,
                ArtifactVariant::Command(CommandOp::Delete),
                &invoice(),
                &params,
            )
            .unwrap();
        assert!(file.content.contains("@RequiresRight('invoice.write')\nexport class"));
        assert!(file.content.contains("import { AuditService } from '@app/services';"));
        assert!(file.content.contains("    private readonly auditService: AuditService,\n"));
    }

    #[test]
    fn entity_type_defaults_to_constant() {
        let file = TemplateRegistry::builtin()
            .render_variant(ArtifactKind::Command, ArtifactVariant::Single, &invoice(), &params())
            .unwrap();
        assert!(file.content.contains("INVOICE_ENTITY_TYPE = 'INVOICE'"));
    }

    #[test]
    fn saga_without_steps_is_rejected() {
        let err = TemplateRegistry::builtin()
            .render(ArtifactKind::Saga, &invoice(), &RenderParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredParam {
                kind: "saga".into(),
                param: "sagaSteps"
            }
        );
    }

    #[test]
    fn saga_renders_steps_and_compensations() {
        let params = RenderParams::default().with_saga_steps(vec![
            SagaStep::new("reserveStock", true).unwrap(),
            SagaStep::new("notify", false).unwrap(),
        ]);
        let file = TemplateRegistry::builtin()
            .render_variant(ArtifactKind::Saga, ArtifactVariant::Single, &invoice(), &params)
            .unwrap();
        assert!(file.content.contains(
            "{ name: 'reserveStock', run: this.reserveStock, compensate: this.compensateReserveStock },"
        ));
        assert!(file.content.contains("async compensateReserveStock(event: InvoiceCreatedEvent)"));
        assert!(file.content.contains("{ name: 'notify', run: this.notify },"));
        assert!(!file.content.contains("compensateNotify"));
    }

    #[test]
    fn handler_barrel_lists_entries_in_rank_order() {
        let registry = TemplateRegistry::builtin();
        let d = invoice();
        let entries = vec![
            registry
                .barrel_entry(
                    ArtifactKind::QueryHandler,
                    ArtifactVariant::Query(QueryOp::List),
                    &d,
                )
                .unwrap(),
            registry
                .barrel_entry(ArtifactKind::Saga, ArtifactVariant::Single, &d)
                .unwrap(),
        ];
        let file = registry
            .render_variant(
                ArtifactKind::HandlersIndex,
                ArtifactVariant::Single,
                &d,
                &RenderParams::default().with_entries(entries),
            )
            .unwrap();
        let style = registry.style_for(ArtifactKind::HandlersIndex, &d).unwrap();
        let registered = barrel::registered_identifiers(&file.content, &style);
        assert_eq!(registered.len(), 2);
        assert!(file.content.find("  InvoiceProcessingSaga,").unwrap()
            < file.content.find("  ListInvoicesQueryHandler,").unwrap());
    }

    #[test]
    fn parent_module_imports_are_relative_to_parent_file() {
        let registry = TemplateRegistry::builtin()
            .with_layout(Layout::new("app/domains.module.ts").unwrap());
        let entry = registry
            .barrel_entry(ArtifactKind::DomainModule, ArtifactVariant::Single, &invoice())
            .unwrap();
        assert_eq!(entry.module, "../invoice/invoice.domain.module");

        let file = registry
            .render_variant(
                ArtifactKind::ParentModuleEdit,
                ArtifactVariant::Single,
                &invoice(),
                &RenderParams::default().with_entries(vec![entry]),
            )
            .unwrap();
        assert_eq!(file.path.as_str(), "app/domains.module.ts");
        assert!(file.content.contains("export class DomainsModule {}"));
        assert!(barrel::registered_identifiers(&file.content, &BarrelStyle::ModuleImports)
            .contains("InvoiceDomainModule"));
    }

    #[test]
    fn override_replaces_body_but_not_path() {
        let mut registry = TemplateRegistry::builtin();
        registry
            .override_template(ArtifactKind::Event, "// {{DOMAIN_PASCAL}} events\n", "event.tmpl")
            .unwrap();
        let file = registry
            .render_variant(ArtifactKind::Event, ArtifactVariant::Single, &invoice(), &params())
            .unwrap();
        assert_eq!(file.content, "// Invoice events\n");
        assert_eq!(file.path.as_str(), "invoice/actions/invoice.events.ts");
    }

    #[test]
    fn empty_override_is_rejected() {
        let err = TemplateRegistry::builtin()
            .override_template(ArtifactKind::Event, "  \n", "event.tmpl")
            .unwrap_err();
        assert!(matches!(err, DomainError::EmptyTemplate { .. }));
    }

    #[test]
    fn unregistered_kind_is_unknown() {
        let registry = TemplateRegistry::empty(Layout::default());
        let err = registry
            .path_for(ArtifactKind::Saga, ArtifactVariant::Single, &invoice())
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownArtifactKind { .. }));
    }
}
