//! Tests for error reporting and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cqrsgen(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cqrsgen").unwrap();
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CQRSGEN_TEMPLATES_DIR");
    cmd
}

#[test]
fn saga_without_steps_exits_2_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    cqrsgen(&temp)
        .args(["scaffold", "invoice", "saga", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sagaSteps"))
        .stderr(predicate::str::contains("--saga-step"));

    assert!(!temp.path().join("src").exists());
}

#[test]
fn saga_on_empty_domain_reports_dangling_event() {
    let temp = TempDir::new().unwrap();
    cqrsgen(&temp)
        .args(["scaffold", "invoice", "saga", "-y", "--saga-step", "notify"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("InvoiceCreatedEvent"));

    assert!(!temp.path().join("src").exists());
}

#[test]
fn invalid_domain_name() {
    let temp = TempDir::new().unwrap();
    cqrsgen(&temp)
        .args(["scaffold", "2fast", "crud", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid domain name"));
}

#[test]
fn unknown_type_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    cqrsgen(&temp)
        .args(["scaffold", "invoice", "widget"])
        .assert()
        .code(2);
}

#[test]
fn missing_type_without_terminal_is_rejected() {
    let temp = TempDir::new().unwrap();
    cqrsgen(&temp)
        .args(["scaffold", "invoice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TYPE"));
}

#[test]
fn missing_anchor_keeps_earlier_files_and_exits_1() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src").join("domains");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("domains.module.ts"), "export class DomainsModule {}\n").unwrap();

    cqrsgen(&temp)
        .args(["scaffold", "invoice", "crud", "-y"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed: "))
        .stdout(predicate::str::contains("10 created"))
        .stderr(predicate::str::contains("Scaffold incomplete"));

    assert!(root.join("invoice/invoice.domain.module.ts").is_file());
}

#[test]
fn empty_override_is_rejected() {
    let temp = TempDir::new().unwrap();
    let templates = temp.path().join("tmpl");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(templates.join("saga.tmpl"), "").unwrap();

    cqrsgen(&temp)
        .args(["scaffold", "invoice", "crud", "-y", "--templates"])
        .arg(&templates)
        .assert()
        .failure()
        .stderr(predicate::str::contains("saga"));

    assert!(!temp.path().join("src").exists());
}

#[test]
fn unknown_config_key() {
    let temp = TempDir::new().unwrap();
    cqrsgen(&temp)
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}
