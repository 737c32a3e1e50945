use std::fs;
use std::path::{Path, PathBuf};

use rstest::rstest;
use tempfile::{TempDir, tempdir};
use varmerge_core::reconcile::{Diagnostic, Policy, Severity, ViolationKind};
use varmerge_core::secrets::{SecretResolver, VaultSettings};
use varmerge_core::{MergeError, Mode, Processor, RunOptions, processor::load_sources};

fn write(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

struct Fixture {
    dir: TempDir,
    sources: Vec<PathBuf>,
    template: PathBuf,
    result: PathBuf,
}

fn fixture(vars: &[&str], template: &str) -> Fixture {
    let dir = tempdir().unwrap();
    let sources = vars
        .iter()
        .enumerate()
        .map(|(i, text)| write(&dir.path().join(format!("vars{i}.toml")), text))
        .collect();
    let template = write(&dir.path().join("app.conf.template"), template);
    let result = dir.path().join("app.conf");
    Fixture { dir, sources, template, result }
}

fn run(fx: &Fixture, policy: Policy) -> (Result<(), MergeError>, Vec<Diagnostic>) {
    let options = RunOptions { policy, ..RunOptions::default() };
    let mut processor =
        Processor::new(options, SecretResolver::new(VaultSettings::default(), false));
    let mode = Mode::Single { template: fx.template.clone(), result: fx.result.clone() };
    let mut diagnostics = Vec::new();
    let outcome = load_sources(&fx.sources)
        .and_then(|sources| processor.run(&sources, &mode, &mut diagnostics))
        .map(|_| ());
    (outcome, diagnostics)
}

#[test]
fn renders_hello_world_without_warnings() {
    let fx = fixture(&["name = \"world\"\n"], "hello {{name}}");
    let (outcome, diagnostics) = run(&fx, Policy::default());

    outcome.unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(fs::read_to_string(&fx.result).unwrap(), "hello world");
}

#[test]
fn later_sources_override_earlier_ones() {
    let fx = fixture(
        &["env = \"dev\"\nhost = \"localhost\"\n", "env = \"prod\"\n", "env = \"staging\"\n"],
        "{{env}}@{{host}}",
    );
    run(&fx, Policy::default()).0.unwrap();
    assert_eq!(fs::read_to_string(&fx.result).unwrap(), "staging@localhost");
}

#[test]
fn variable_satisfies_reference_in_other_case() {
    let fx = fixture(&["Foo = \"bar\"\n"], "{{foo}}");
    let (outcome, diagnostics) = run(&fx, Policy::default());
    outcome.unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(fs::read_to_string(&fx.result).unwrap(), "bar");
}

#[test]
fn unused_variable_is_warned_with_declared_spelling() {
    let fx = fixture(&["name = \"world\"\nExtra = \"x\"\n"], "hello {{name}}");
    let (outcome, diagnostics) = run(&fx, Policy::default());

    outcome.unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(diagnostics[0].to_string().ends_with("\nExtra = x"));
    assert!(fx.result.exists());
}

#[test]
fn missing_variable_is_fatal_and_writes_nothing() {
    let fx = fixture(&["name = \"world\"\n"], "hello {{name}} {{missing}}");
    let (outcome, diagnostics) = run(&fx, Policy::default());

    match outcome.unwrap_err() {
        MergeError::Policy(v) => assert_eq!(v.kind, ViolationKind::MissingVariables),
        other => panic!("expected policy violation, got {other:?}"),
    }
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(!fx.result.exists());
}

#[rstest]
#[case::reported(false)]
#[case::quiet(true)]
fn partial_templates_keep_unresolved_placeholders(#[case] quiet: bool) {
    let fx = fixture(&["name = \"world\"\n"], "hello {{name}} {{missing}}");
    let policy =
        Policy { allow_partial_templates: true, suppress_warnings: quiet, ..Policy::default() };
    let (outcome, diagnostics) = run(&fx, policy);

    outcome.unwrap();
    assert_eq!(diagnostics.is_empty(), quiet);
    assert_eq!(fs::read_to_string(&fx.result).unwrap(), "hello world {{missing}}");
}

#[test]
fn strict_mode_fails_on_unused_variable() {
    let fx = fixture(&["name = \"world\"\nextra = \"x\"\n"], "{{name}}");
    let policy = Policy { warnings_as_errors: true, ..Policy::default() };
    let (outcome, _) = run(&fx, policy);
    assert!(matches!(outcome, Err(MergeError::Policy(_))));
    assert!(!fx.result.exists());
}

#[test]
fn non_string_top_level_is_warned() {
    let fx = fixture(&["name = \"world\"\nport = 8080\n"], "{{name}}");
    let (outcome, diagnostics) = run(&fx, Policy::default());
    outcome.unwrap();
    assert_eq!(
        diagnostics[0].to_string(),
        "Warning: top-level element 'port' is of type 'integer'. Only strings are expected here"
    );
}

#[test]
fn structural_warning_is_fatal_when_strict() {
    let fx = fixture(&["name = \"world\"\nport = 8080\n"], "{{name}}");
    let policy = Policy { warnings_as_errors: true, ..Policy::default() };
    let (outcome, diagnostics) = run(&fx, policy);
    assert!(matches!(outcome, Err(MergeError::Policy(_))));
    assert!(diagnostics.is_empty());
    assert!(!fx.result.exists());
}

#[test]
fn missing_template_is_reported() {
    let fx = fixture(&["name = \"world\"\n"], "{{name}}");
    fs::remove_file(&fx.template).unwrap();
    let (outcome, _) = run(&fx, Policy::default());
    match outcome.unwrap_err() {
        MergeError::MissingFile(path) => assert!(path.ends_with("app.conf.template")),
        other => panic!("expected MissingFile, got {other:?}"),
    }
}

#[test]
fn malformed_template_is_reported() {
    let fx = fixture(&["name = \"world\"\n"], "{{name");
    let (outcome, _) = run(&fx, Policy::default());
    assert!(matches!(outcome, Err(MergeError::Template(_))));
}

#[test]
fn malformed_secret_reference_is_fatal() {
    let fx = fixture(&["db = \"vault:secret/app\"\n"], "{{db}}");
    let (outcome, _) = run(&fx, Policy::default());
    let err = outcome.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("'vault:path:key'"), "{err}");
    assert!(!fx.result.exists());
}

#[test]
fn secret_reference_without_address_is_fatal() {
    let fx = fixture(&["db = \"vault:secret/app:password\"\n"], "{{db}}");
    let (outcome, _) = run(&fx, Policy::default());
    let err = outcome.unwrap_err();
    assert!(err.to_string().starts_with("VAULT_ADDR environment variable is not set"), "{err}");
}

#[test]
fn missing_variable_source_is_reported() {
    let fx = fixture(&["name = \"world\"\n"], "{{name}}");
    let mut sources = fx.sources.clone();
    sources.push(fx.dir.path().join("absent.toml"));
    let fx = Fixture { sources, ..fx };
    let (outcome, _) = run(&fx, Policy::default());
    assert!(outcome.unwrap_err().to_string().ends_with("absent.toml does not exist"));
}
