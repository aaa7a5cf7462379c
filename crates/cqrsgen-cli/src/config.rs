//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `CQRSGEN__LAYOUT__DOMAINS_DIR=src/app`
//! 3. Config file: `--config FILE`, else [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "CQRSGEN";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where domains live.
    pub layout: LayoutConfig,
    /// Values applied to every scaffold request unless overridden by flags.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub domains_dir: PathBuf,
    /// Relative to `domains_dir`.
    pub parent_module: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            domains_dir: PathBuf::from("src/domains"),
            parent_module: cqrsgen_core::domain::Layout::DEFAULT_PARENT_MODULE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub security_right: Option<String>,
    pub repository_token: Option<String>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file, then environment.
    ///
    /// A missing file is not an error, so `init` can point `--config` at a
    /// path that does not exist yet.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(
            &Self::active_path(config_file),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    fn load_from(path: &Path, env: Environment) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to seed default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                env.prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("defaults.services")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.cqrsgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "cqrsgen", "cqrsgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".cqrsgen.toml"))
    }

    /// The file `init`, `config set` and `config path` operate on.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }

    /// Serialise as a TOML table for dotted-key lookups.
    pub fn to_table(&self) -> Result<toml::Table, toml::ser::Error> {
        let text = toml::to_string(self)?;
        // Round-trips by construction.
        Ok(toml::from_str(&text).unwrap_or_default())
    }
}

/// Look up a dotted key in a TOML table.
pub fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a toml::Value> {
    let mut parts = key.split('.');
    let mut current = table.get(parts.next()?)?;
    for part in parts {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("none.toml"), env(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.layout.domains_dir, PathBuf::from("src/domains"));
        assert_eq!(cfg.layout.parent_module, "domains.module.ts");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[layout\n").unwrap();
        assert!(AppConfig::load_from(&path, env(&[])).is_err());
    }

    #[test]
    fn file_overrides_defaults_and_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[layout]\ndomains_dir = \"app/domains\"\n[defaults]\nsecurity_right = \"admin\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(
            &path,
            env(&[
                ("CQRSGEN__DEFAULTS__SECURITY_RIGHT", "owner"),
                ("CQRSGEN__DEFAULTS__SERVICES", "mailer,audit"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.layout.domains_dir, PathBuf::from("app/domains"));
        assert_eq!(cfg.defaults.security_right.as_deref(), Some("owner"));
        assert_eq!(cfg.defaults.services, vec!["mailer", "audit"]);
        assert_eq!(cfg.output.format, "human");
    }

    #[test]
    fn dotted_lookup() {
        let table = AppConfig::default().to_table().unwrap();
        assert_eq!(
            lookup(&table, "layout.parent_module").and_then(|v| v.as_str()),
            Some("domains.module.ts")
        );
        assert!(lookup(&table, "layout.nope").is_none());
    }
}
