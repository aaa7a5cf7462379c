//! Implementation of the `cqrsgen scaffold` command.
//!
//! Responsibility: turn CLI arguments and config defaults into a
//! `GenerationRequest`, call the core scaffold service, and display the
//! report. No planning logic lives here.

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info, instrument};

use cqrsgen_adapters::{FilesystemTemplateLoader, LocalFilesystem};
use cqrsgen_core::{
    application::{ScaffoldService, TemplateService},
    domain::{DomainName, GenerationMode, GenerationRequest, Layout, SagaStep, TemplateRegistry},
    error::CqrsgenError,
};

use crate::{
    cli::{ScaffoldArgs, ScaffoldType, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `cqrsgen scaffold` command.
///
/// 1. Resolve domain and type, prompting when either is missing
/// 2. Build the request, filling gaps from config defaults
/// 3. Build the template registry (layout + disk overrides)
/// 4. `--dry-run`: print the plan and stop
/// 5. Confirm unless `--yes`, `--quiet` or non-interactive stdin
/// 6. Scaffold and print the report
#[instrument(skip_all)]
pub fn execute(
    args: ScaffoldArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let args = resolve_interactive(args, &config)?;
    let request = build_request(&args, &config)?;
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| config.layout.domains_dir.clone());
    let registry = build_registry(&args, &config)?;

    debug!(
        domain = %request.domain(),
        mode = %request.mode(),
        root = %root.display(),
        "Request resolved"
    );

    let service = ScaffoldService::new(Box::new(LocalFilesystem::new()), registry, &root);

    if args.dry_run {
        let plan = service.plan(&request)?;
        output.plan(&plan)?;
        return Ok(());
    }

    let interactive_stdin = std::io::stdin().is_terminal();
    if !global.quiet && !args.yes && interactive_stdin {
        show_configuration(&request, &root, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    info!(domain = %request.domain(), mode = %request.mode(), "Scaffold started");
    let report = service.scaffold(&request)?;
    output.report(&report)?;

    if !report.is_success() {
        return Err(CliError::ScaffoldIncomplete {
            failed: report.failed(),
        });
    }
    Ok(())
}

// ── Request construction ──────────────────────────────────────────────────────

fn build_request(args: &ScaffoldArgs, config: &AppConfig) -> CliResult<GenerationRequest> {
    let (Some(domain), Some(kind)) = (&args.domain, args.kind) else {
        return Err(CliError::InvalidInput {
            message: "both DOMAIN and TYPE are required".into(),
            source: None,
        });
    };

    let domain = DomainName::parse(domain).map_err(core)?;
    let mode = GenerationMode::from(kind);

    let mut builder = GenerationRequest::builder(domain, mode);

    if let Some(right) = args.right.as_ref().or(config.defaults.security_right.as_ref()) {
        builder = builder.security_right(right.as_str());
    }
    if let Some(tag) = &args.entity_type {
        builder = builder.entity_type_tag(tag.as_str());
    }
    if let Some(token) = args
        .repository_token
        .as_ref()
        .or(config.defaults.repository_token.as_ref())
    {
        builder = builder.repository_token(token.as_str());
    }

    let services = if args.services.is_empty() {
        &config.defaults.services
    } else {
        &args.services
    };
    builder = builder.services(services.iter().map(String::as_str));

    if !args.saga_steps.is_empty() {
        let steps = args
            .saga_steps
            .iter()
            .map(|s| SagaStep::from_str(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(core)?;
        builder = builder.saga_steps(steps);
    }

    builder.build().map_err(core)
}

fn build_registry(args: &ScaffoldArgs, config: &AppConfig) -> CliResult<TemplateRegistry> {
    let parent = args
        .parent_module
        .clone()
        .unwrap_or_else(|| config.layout.parent_module.clone());
    let layout = Layout::new(parent).map_err(core)?;

    let mut templates = TemplateService::new(TemplateRegistry::builtin().with_layout(layout));
    if let Some(dir) = templates_dir(args.templates.as_ref(), config) {
        let applied = templates.apply_overrides(&FilesystemTemplateLoader::new(&dir))?;
        debug!(dir = %dir.display(), applied, "Template overrides loaded");
    }
    Ok(templates.into_registry())
}

/// `--templates` (or `CQRSGEN_TEMPLATES_DIR`) first, then config.
pub fn templates_dir(flag: Option<&PathBuf>, config: &AppConfig) -> Option<PathBuf> {
    flag.cloned().or_else(|| config.templates.local_path.clone())
}

fn core(err: impl Into<CqrsgenError>) -> CliError {
    CliError::Core(err.into())
}

// ── Interactive mode ──────────────────────────────────────────────────────────

/// Prompt for whatever the command line left out.
///
/// Domain and type are mandatory. The optional fields are asked only when
/// the flag was not given; an empty answer keeps the config default.
#[cfg(feature = "interactive")]
fn resolve_interactive(mut args: ScaffoldArgs, config: &AppConfig) -> CliResult<ScaffoldArgs> {
    use dialoguer::{Input, Select, theme::ColorfulTheme};

    if args.domain.is_some() && args.kind.is_some() {
        return Ok(args);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::InvalidInput {
            message: "DOMAIN and TYPE are required when stdin is not a terminal".into(),
            source: None,
        });
    }

    let theme = ColorfulTheme::default();

    if args.domain.is_none() {
        let domain: String = Input::with_theme(&theme)
            .with_prompt("Domain name")
            .validate_with(|input: &String| {
                DomainName::parse(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(prompt_error)?;
        args.domain = Some(domain);
    }

    if args.kind.is_none() {
        let labels: Vec<String> = ScaffoldType::ALL.iter().map(ToString::to_string).collect();
        let picked = Select::with_theme(&theme)
            .with_prompt("What should be generated?")
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or(CliError::Cancelled)?;
        args.kind = Some(ScaffoldType::ALL[picked]);
    }

    if args.kind == Some(ScaffoldType::Saga) && args.saga_steps.is_empty() {
        let steps: String = Input::with_theme(&theme)
            .with_prompt("Saga steps (comma separated, NAME or NAME:compensate)")
            .interact_text()
            .map_err(prompt_error)?;
        args.saga_steps = split_list(&steps);
    }

    let optional = |label: &str, default: Option<&str>| -> CliResult<Option<String>> {
        let prompt = match default {
            Some(d) => format!("{label} (empty keeps '{d}')"),
            None => format!("{label} (empty for none)"),
        };
        let answer: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(non_empty(&answer))
    };

    if args.right.is_none() {
        args.right = optional("Security right", config.defaults.security_right.as_deref())?;
    }
    if args.entity_type.is_none() {
        args.entity_type = optional("Entity type tag", None)?;
    }
    if args.repository_token.is_none() {
        args.repository_token = optional(
            "Repository token",
            config.defaults.repository_token.as_deref(),
        )?;
    }
    if args.services.is_empty() {
        let configured = config.defaults.services.join(", ");
        let default = (!configured.is_empty()).then_some(configured.as_str());
        if let Some(answer) = optional("Services to inject (comma separated)", default)? {
            args.services = split_list(&answer);
        }
    }

    Ok(args)
}

/// Trimmed answer, `None` when blank.
#[cfg_attr(not(feature = "interactive"), allow(dead_code))]
fn non_empty(answer: &str) -> Option<String> {
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

#[cfg_attr(not(feature = "interactive"), allow(dead_code))]
fn split_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(feature = "interactive")]
fn prompt_error(err: dialoguer::Error) -> CliError {
    #[allow(unreachable_patterns)]
    match err {
        dialoguer::Error::IO(source) => CliError::IoError {
            message: "interactive prompt failed".into(),
            source,
        },
        other => CliError::InvalidInput {
            message: other.to_string(),
            source: None,
        },
    }
}

#[cfg(not(feature = "interactive"))]
fn resolve_interactive(args: ScaffoldArgs, _config: &AppConfig) -> CliResult<ScaffoldArgs> {
    if args.domain.is_some() && args.kind.is_some() {
        Ok(args)
    } else {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    request: &GenerationRequest,
    root: &std::path::Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Scaffold")?;
    out.print(&format!("  Domain:   {}", request.domain()))?;
    out.print(&format!("  Type:     {}", request.mode()))?;
    out.print(&format!("  Root:     {}", root.display()))?;
    if let Some(right) = request.security_right() {
        out.print(&format!("  Right:    {right}"))?;
    }
    if let Some(steps) = request.saga_steps() {
        let steps: Vec<String> = steps.iter().map(ToString::to_string).collect();
        out.print(&format!("  Steps:    {}", steps.join(", ")))?;
    }
    out.print("")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
