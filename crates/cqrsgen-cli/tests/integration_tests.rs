//! Integration tests for the cqrsgen binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command running inside `temp`, isolated from the user's config.
fn cqrsgen(temp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cqrsgen").unwrap();
    cmd.current_dir(temp)
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CQRSGEN_TEMPLATES_DIR");
    cmd
}

fn domains(temp: &TempDir) -> std::path::PathBuf {
    temp.path().join("src").join("domains")
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scaffold"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn scaffold_crud_creates_the_domain() {
    let temp = TempDir::new().unwrap();

    cqrsgen(temp.path())
        .args(["scaffold", "invoice", "crud", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("11 created, 0 skipped, 0 merged, 0 failed"));

    let root = domains(&temp);
    assert!(root.join("invoice/actions/invoice.commands.ts").is_file());
    assert!(root.join("invoice/handlers/saga.invoice.processing.ts").is_file());
    assert!(root.join("invoice/invoice.domain.module.ts").is_file());

    let parent = std::fs::read_to_string(root.join("domains.module.ts")).unwrap();
    assert!(parent.contains("InvoiceDomainModule"));
}

#[test]
fn rerun_changes_nothing() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .args(["scaffold", "invoice", "crud", "-y"])
        .assert()
        .success();
    let barrel = domains(&temp).join("invoice/handlers/index.ts");
    let before = std::fs::read_to_string(&barrel).unwrap();

    cqrsgen(temp.path())
        .args(["scaffold", "invoice", "crud", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 created, 9 skipped, 2 merged, 0 failed"))
        .stdout(predicate::str::contains("merged (+0)"));

    assert_eq!(std::fs::read_to_string(&barrel).unwrap(), before);
}

#[test]
fn root_and_parent_module_flags() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .args([
            "s",
            "customer",
            "event",
            "-y",
            "--root",
            "app",
            "--parent-module",
            "app.module.ts",
        ])
        .assert()
        .success();

    let root = temp.path().join("app");
    assert!(root.join("customer/actions/customer.events.ts").is_file());
    let parent = std::fs::read_to_string(root.join("app.module.ts")).unwrap();
    assert!(parent.contains("export class AppModule"));
    assert!(parent.contains("CustomerDomainModule,"));
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .args(["scaffold", "invoice", "crud", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"))
        .stdout(predicate::str::contains("invoice/actions/invoice.commands.ts"));

    assert!(!temp.path().join("src").exists());
}

#[test]
fn json_report_is_machine_readable() {
    let temp = TempDir::new().unwrap();
    let out = cqrsgen(temp.path())
        .args(["--output-format", "json", "scaffold", "invoice", "query", "-y"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["summary"]["failed"], 0);
    assert!(value["run_id"].is_string());
    assert!(value["generated_at"].is_string());
    assert_eq!(value["entries"][0]["kind"], "query");
}

#[test]
fn saga_with_steps_after_crud() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .args(["scaffold", "invoice", "event", "-y"])
        .assert()
        .success();

    cqrsgen(temp.path())
        .args([
            "scaffold",
            "invoice",
            "saga",
            "-y",
            "--saga-step",
            "reserve:compensate",
            "--saga-step",
            "notify",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("merged (+1)"));

    let saga =
        std::fs::read_to_string(domains(&temp).join("invoice/handlers/saga.invoice.processing.ts"))
            .unwrap();
    assert!(saga.contains("reserve"));
    assert!(saga.contains("notify"));
}

#[test]
fn overrides_from_templates_dir() {
    let temp = TempDir::new().unwrap();
    let templates = temp.path().join("tmpl");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(
        templates.join("events.tmpl"),
        "ignored because the stem is not a kind",
    )
    .unwrap();
    std::fs::write(templates.join("event.tmpl"), "// {{DOMAIN_PASCAL}} events\n").unwrap();

    cqrsgen(temp.path())
        .args(["scaffold", "invoice", "event", "-y", "--templates"])
        .arg(&templates)
        .assert()
        .success();

    let events =
        std::fs::read_to_string(domains(&temp).join("invoice/actions/invoice.events.ts")).unwrap();
    assert_eq!(events, "// Invoice events\n");
}

#[test]
fn list_formats() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .args(["list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kind,path_pattern,source,description"))
        .stdout(predicate::str::contains("saga,"));

    let out = cqrsgen(temp.path())
        .args(["ls", "--format", "json"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(11));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cqrsgen"));
}

#[test]
fn init_then_config_set_and_get() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("cqrsgen.toml");

    cqrsgen(temp.path())
        .arg("-c")
        .arg(&config)
        .arg("init")
        .assert()
        .success();
    assert!(config.is_file());

    cqrsgen(temp.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "layout.domains_dir", "lib/domains"])
        .assert()
        .success();

    cqrsgen(temp.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "layout.domains_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lib/domains"));

    cqrsgen(temp.path())
        .arg("-c")
        .arg(&config)
        .args(["scaffold", "invoice", "create", "-y"])
        .assert()
        .success();
    assert!(
        temp.path()
            .join("lib/domains/invoice/actions/invoice.commands.ts")
            .is_file()
    );
}

#[test]
fn environment_overrides_config() {
    let temp = TempDir::new().unwrap();
    cqrsgen(temp.path())
        .env("CQRSGEN__LAYOUT__DOMAINS_DIR", "env/domains")
        .args(["scaffold", "invoice", "query", "-y"])
        .assert()
        .success();
    assert!(temp.path().join("env/domains/invoice").is_dir());
}

#[test]
fn log_file_receives_events() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("logs").join("cqrsgen.log");
    cqrsgen(temp.path())
        .arg("-v")
        .arg("--log-file")
        .arg(&log)
        .args(["scaffold", "invoice", "event", "-y"])
        .assert()
        .success();

    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("Scaffold finished"));
}

#[test]
fn no_color_accepts_conventional_values() {
    let temp = TempDir::new().unwrap();
    for value in ["1", "true", "yes", "0", ""] {
        cqrsgen(temp.path())
            .env("NO_COLOR", value)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("command-handler"));
    }
}

#[test]
fn json_log_format_writes_one_object_per_line() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("cqrsgen.jsonl");
    cqrsgen(temp.path())
        .args(["-v", "--log-format", "json", "--log-file"])
        .arg(&log)
        .args(["scaffold", "invoice", "event", "-y"])
        .assert()
        .success();

    let text = std::fs::read_to_string(&log).unwrap();
    let events: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(
        events
            .iter()
            .any(|e| e["fields"]["message"] == "Scaffold finished")
    );
}
