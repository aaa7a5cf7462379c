//! Implementation of the `cqrsgen list` command.

use cqrsgen_adapters::FilesystemTemplateLoader;
use cqrsgen_core::{
    application::{TemplateInfo, TemplateService},
    domain::TemplateRegistry,
};

use crate::{
    cli::{ListArgs, ListFormat},
    commands::scaffold::templates_dir,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut service = TemplateService::new(TemplateRegistry::builtin());
    if let Some(dir) = templates_dir(args.templates.as_ref(), &config) {
        service.apply_overrides(&FilesystemTemplateLoader::new(dir))?;
    }
    let templates = service.list();

    match args.format {
        ListFormat::Table => {
            output.header("Artifact templates:")?;
            for line in table_rows(&templates) {
                output.print(&line)?;
            }
        }
        // JSON and CSV bypass quiet mode: they are meant for pipes.
        ListFormat::Json => output.json(&templates)?,
        ListFormat::List => {
            for t in &templates {
                println!("{}", t.kind);
            }
        }
        ListFormat::Csv => {
            for line in csv_rows(&templates) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn table_rows(templates: &[TemplateInfo]) -> Vec<String> {
    templates
        .iter()
        .map(|t| {
            format!(
                "  {:<24} {:<62} {}",
                t.kind.to_string(),
                t.path_pattern,
                t.source
            )
        })
        .collect()
}

fn csv_rows(templates: &[TemplateInfo]) -> Vec<String> {
    std::iter::once("kind,path_pattern,source,description".to_string())
        .chain(templates.iter().map(|t| {
            format!(
                "{},{},{},{}",
                t.kind,
                csv_field(&t.path_pattern),
                csv_field(&t.source),
                csv_field(&t.description)
            )
        }))
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Vec<TemplateInfo> {
        TemplateService::new(TemplateRegistry::builtin()).list()
    }

    #[test]
    fn csv_has_header_and_one_row_per_kind() {
        let rows = csv_rows(&builtin());
        assert_eq!(rows[0], "kind,path_pattern,source,description");
        assert_eq!(rows.len(), 12);
        assert!(rows[1].starts_with("command,"));
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\", ok"), "\"say \"\"hi\"\", ok\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn table_lists_every_kind() {
        let rows = table_rows(&builtin());
        assert_eq!(rows.len(), 11);
        assert!(rows.iter().any(|r| r.contains("parent-module-edit")));
    }
}
