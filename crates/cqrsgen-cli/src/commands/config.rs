//! `cqrsgen config`: read and write configuration values.

use std::path::{Path, PathBuf};

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, lookup},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Keys whose values are comma-separated lists.
const LIST_KEYS: &[&str] = &["defaults.services"];

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(config_file);
            set_config_value(&path, &key, &value)?;
            output.success(&format!("{key} = {value}  ({})", path.display()))?;
        }

        ConfigCommands::List => {
            let serialised = toml::to_string_pretty(&config)
                .with_cli_context(|| "Failed to serialise config")?;
            output.header("Current Configuration:")?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(config_file).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let table = config
        .to_table()
        .with_cli_context(|| "Failed to serialise config")?;
    match lookup(&table, key) {
        Some(toml::Value::String(s)) => Ok(s.clone()),
        Some(toml::Value::Table(_)) => Err(config_error(format!(
            "'{key}' is a section; use a full key such as '{key}.<name>'"
        ))),
        Some(other) => Ok(other.to_string()),
        // Unset optional values are valid keys with no value.
        None if is_known_key(key) => Ok(String::new()),
        None => Err(config_error(format!("Unknown config key: '{key}'"))),
    }
}

fn set_config_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    if !is_known_key(key) {
        return Err(config_error(format!("Unknown config key: '{key}'")));
    }

    let mut table: toml::Table = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str(&text).map_err(|e| CliError::ConfigError {
            message: format!("'{}' is not valid TOML", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    insert_dotted(&mut table, key, parse_value(key, raw))?;

    // Reject values that would make the file unloadable.
    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::ConfigError {
            message: format!("invalid value for '{key}'"),
            source: Some(Box::new(e)),
        })?;

    let text = toml::to_string_pretty(&table).with_cli_context(|| "Failed to serialise config")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_cli_context(|| format!("Failed to write '{}'", path.display()))
}

fn is_known_key(key: &str) -> bool {
    const OPTIONAL: &[&str] = &[
        "defaults.security_right",
        "defaults.repository_token",
        "templates.local_path",
    ];
    OPTIONAL.contains(&key)
        || AppConfig::default()
            .to_table()
            .ok()
            .is_some_and(|t| matches!(lookup(&t, key), Some(v) if !v.is_table()))
}

fn parse_value(key: &str, raw: &str) -> toml::Value {
    if LIST_KEYS.contains(&key) {
        return toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.into()))
                .collect(),
        );
    }
    match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        other => toml::Value::String(other.into()),
    }
}

fn insert_dotted(table: &mut toml::Table, key: &str, value: toml::Value) -> CliResult<()> {
    let Some((section, name)) = key.split_once('.') else {
        return Err(config_error(format!("Unknown config key: '{key}'")));
    };
    let entry = table
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let Some(section_table) = entry.as_table_mut() else {
        return Err(config_error(format!("'{section}' is not a section")));
    };
    section_table.insert(name.to_string(), value);
    Ok(())
}

fn config_error(message: String) -> CliError {
    CliError::ConfigError {
        message,
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(
            get_config_value(&cfg, "layout.domains_dir").unwrap(),
            "src/domains"
        );
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "defaults.security_right").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(get_config_value(&cfg, "layout").is_err());
    }

    #[test]
    fn set_creates_file_and_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[layout]\ndomains_dir = \"app\"\n").unwrap();

        set_config_value(&path, "defaults.security_right", "admin").unwrap();
        set_config_value(&path, "defaults.services", "mailer, audit").unwrap();
        set_config_value(&path, "output.no_color", "true").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.layout.domains_dir, PathBuf::from("app"));
        assert_eq!(cfg.defaults.security_right.as_deref(), Some("admin"));
        assert_eq!(cfg.defaults.services, vec!["mailer", "audit"]);
        assert!(cfg.output.no_color);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        assert!(set_config_value(&path, "layout.nope", "x").is_err());
        assert!(set_config_value(&path, "output.no_color", "sometimes").is_err());
        assert!(!path.exists());
    }
}
