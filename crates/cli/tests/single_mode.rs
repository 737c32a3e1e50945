use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn varmerge(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("varmerge"));
    cmd.current_dir(dir);
    cmd.env("XDG_CONFIG_HOME", dir.join("no-config"));
    cmd.env_remove("VAULT_ADDR");
    cmd.env_remove("VAULT_TOKEN");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn renders_template_into_result() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("vars.toml"), "name = \"world\"\n").unwrap();
    fs::write(tmp.path().join("greet.txt.template"), "hello {{name}}").unwrap();

    varmerge(tmp.path())
        .args(["vars.toml", "greet.txt.template", "greet.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(tmp.path().join("greet.txt")).unwrap(), "hello world");
}

#[test]
fn later_sources_override_earlier_ones() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("base.toml"), "env = \"dev\"\n").unwrap();
    fs::write(tmp.path().join("prod.toml"), "env = \"prod\"\n").unwrap();
    fs::write(tmp.path().join("t.template"), "{{env}}").unwrap();

    varmerge(tmp.path()).args(["base.toml", "prod.toml", "t.template", "out"]).assert().success();

    assert_eq!(fs::read_to_string(tmp.path().join("out")).unwrap(), "prod");
}

#[test]
fn missing_variable_fails_without_writing() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("vars.toml"), "name = \"world\"\n").unwrap();
    fs::write(tmp.path().join("t.template"), "{{name}} {{port}}").unwrap();

    varmerge(tmp.path())
        .args(["vars.toml", "t.template", "out"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Error: these variables are present in the template but not in the variables toml file:",
        ))
        .stdout(predicate::str::contains("port"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn partial_flag_leaves_placeholder_and_warns_about_unused() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("vars.toml"), "spare = \"1\"\n").unwrap();
    fs::write(tmp.path().join("t.template"), "{{port}}").unwrap();

    varmerge(tmp.path())
        .args(["-p", "vars.toml", "t.template", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning: In file t.template"))
        .stdout(predicate::str::contains("spare = 1"));

    assert_eq!(fs::read_to_string(tmp.path().join("out")).unwrap(), "{{port}}");
}

#[test]
fn quiet_hides_unused_warning_but_not_strict_failure() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("vars.toml"), "name = \"a\"\nspare = \"1\"\n").unwrap();
    fs::write(tmp.path().join("t.template"), "{{name}}").unwrap();

    varmerge(tmp.path())
        .args(["-q", "vars.toml", "t.template", "out"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(fs::read_to_string(tmp.path().join("out")).unwrap(), "a");
    fs::remove_file(tmp.path().join("out")).unwrap();

    varmerge(tmp.path())
        .args(["-qs", "vars.toml", "t.template", "out"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Warning").not())
        .stdout(predicate::str::starts_with("Error: In file t.template."));
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn missing_source_is_reported() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("t.template"), "x").unwrap();

    varmerge(tmp.path())
        .args(["nope.toml", "t.template", "out"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: File nope.toml does not exist"));
}

#[test]
fn secret_reference_without_address_fails() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("vars.toml"), "pw = \"vault:secret/app:pw\"\n").unwrap();
    fs::write(tmp.path().join("t.template"), "{{pw}}").unwrap();

    varmerge(tmp.path())
        .args(["vars.toml", "t.template", "out"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("VAULT_ADDR environment variable is not set"));
}
