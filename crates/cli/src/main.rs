mod logging;
mod output;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread;

use varmerge_core::config::ConfigLoader;
use varmerge_core::processor::load_sources;
use varmerge_core::reconcile::Policy;
use varmerge_core::secrets::SecretResolver;
use varmerge_core::{MergeError, Mode, Processor, RunOptions};

const MULTI_HELP: &str = "\
Multi-output mode (-x): every top-level table in the variables files names a
result file, rendered from the file of the same name plus '.template'.
For example:
    [\"deployment.yaml\"]
    key = \"value\"
turns deployment.yaml.template into deployment.yaml. Top-level strings are
globals; set a key to true inside a table to use a global there.";

#[derive(Debug, Parser)]
#[command(
    name = "varmerge",
    version,
    about = "Merge variables from TOML files into templates and write the results",
    override_usage = "varmerge [FLAGS] <VARS.toml>... <TEMPLATE> <RESULT>\n       \
                      varmerge [FLAGS] -x <VARS.toml>...",
    after_help = MULTI_HELP,
    arg_required_else_help = true
)]
struct Cli {
    /// Do not warn about variables the template does not use (nor, with -p,
    /// about template references without a variable)
    #[arg(short = 'q')]
    quiet: bool,

    /// Do not fail when the template references variables that are not defined
    #[arg(short = 'p')]
    partial: bool,

    /// Treat warnings as errors and stop
    #[arg(short = 's')]
    strict: bool,

    /// List variables and template references for every output
    #[arg(short = 'v')]
    verbose: bool,

    /// Multi-output mode
    #[arg(short = 'x')]
    multifile: bool,

    /// In multi-output mode, also warn about globals a template does not use
    #[arg(short = 'g', requires = "multifile")]
    globals: bool,

    /// On a secret store error, print the store response. It may contain secrets
    #[arg(short = 'd')]
    dump: bool,

    /// Path to config file (defaults to ~/.config/varmerge/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Variables files, followed by template and result outside multi-output mode
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,
}

impl Cli {
    fn options(&self) -> RunOptions {
        RunOptions {
            policy: Policy {
                suppress_warnings: self.quiet,
                allow_partial_templates: self.partial,
                warnings_as_errors: self.strict,
                warn_about_globals: self.globals,
            },
            verbose: self.verbose,
            dump_response_on_error: self.dump,
        }
    }

    /// Split positionals into variable sources and the run mode.
    fn mode(&self) -> Option<(Vec<PathBuf>, Mode)> {
        if self.multifile {
            return Some((self.paths.clone(), Mode::Multi { root: PathBuf::new() }));
        }
        match self.paths.as_slice() {
            [sources @ .., template, result] if !sources.is_empty() => Some((
                sources.to_vec(),
                Mode::Single { template: template.clone(), result: result.clone() },
            )),
            _ => None,
        }
    }
}

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install panic reporter: {e}");
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    let Some((sources, mode)) = cli.mode() else {
        let _ = Cli::command()
            .error(
                ErrorKind::TooFewValues,
                "expected at least one variables file, a template and a result",
            )
            .print();
        std::process::exit(1);
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(&cli, &sources, &mode)));
    logging::shutdown();
    if let Ok(Err(e)) = &outcome {
        println!("Error: {e}");
    }
    std::process::exit(exit_code(&outcome));
}

/// Process status for a finished run. A panic is an internal error.
fn exit_code(outcome: &thread::Result<Result<(), MergeError>>) -> i32 {
    match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => e.exit_code(),
        Err(_) => 255,
    }
}

fn run(cli: &Cli, sources: &[PathBuf], mode: &Mode) -> Result<(), MergeError> {
    let mut cfg = ConfigLoader::load(cli.config.as_deref())?;
    if cli.verbose {
        cfg.logging.level = "debug".to_string();
    }
    logging::init(&cfg);

    let options = cli.options();
    let resolver = SecretResolver::new(cfg.vault, options.dump_response_on_error);
    let mut processor = Processor::new(options, resolver);

    let sources = load_sources(sources)?;
    let mut sink = output::StdoutSink;
    let summary = processor.run(&sources, mode, &mut sink)?;
    tracing::debug!(
        written = summary.written.len(),
        diagnostics = summary.reported,
        lookups = processor.resolver().lookups(),
        "run finished"
    );
    Ok(())
}
