use std::fs;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use tracing::{debug, info};

use crate::document::{StructuralIssue, VariableSource, merge_sources, validate_structure};
use crate::reconcile::{Diagnostic, Policy, Routed, reconcile};
use crate::secrets::{SecretReference, SecretResolver};
use crate::templates::{RenderContext, Template, render};
use crate::vars::{
    Variable, VariableSet, classify_multi, classify_single, find_variable, output_units,
};

use super::error::MergeError;

/// Suffix appended to an output name to find its template.
pub const TEMPLATE_SUFFIX: &str = ".template";

/// Receives diagnostics as they are produced.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

/// Switches fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub policy: Policy,
    /// List variables and template references as each output is processed.
    pub verbose: bool,
    /// Attach secret store response bodies to errors.
    pub dump_response_on_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// One template rendered to one result file.
    Single { template: PathBuf, result: PathBuf },
    /// Every top-level table names a result file under `root`, rendered
    /// from the file of the same name plus `.template`.
    Multi { root: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Result files in the order they were written.
    pub written: Vec<PathBuf>,
    /// Diagnostics reported along the way.
    pub reported: usize,
}

/// Read every variable source, in order.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<VariableSource>, MergeError> {
    paths.iter().map(|p| VariableSource::load(p).map_err(MergeError::from)).collect()
}

pub struct Processor {
    options: RunOptions,
    resolver: SecretResolver,
}

impl Processor {
    #[must_use]
    pub fn new(options: RunOptions, resolver: SecretResolver) -> Self {
        Self { options, resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &SecretResolver {
        &self.resolver
    }

    /// Run every output of `mode` against the merged `sources`.
    ///
    /// The first fatal error stops the run; outputs already written stay on
    /// disk and no later output is attempted.
    pub fn run(
        &mut self,
        sources: &[VariableSource],
        mode: &Mode,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RunSummary, MergeError> {
        let doc = merge_sources(sources);
        let multifile = matches!(mode, Mode::Multi { .. });
        let mut summary = RunSummary::default();

        for issue in validate_structure(&doc, multifile) {
            self.route(issue, sink, &mut summary)?;
        }

        match mode {
            Mode::Single { template, result } => {
                let classified = classify_single(&doc);
                let result = normalize_separators(result);
                self.process_output(
                    &classified.variables,
                    &normalize_separators(template),
                    &result,
                    sink,
                    &mut summary,
                )?;
                summary.written.push(result);
            }
            Mode::Multi { root } => {
                for (name, unit) in output_units(&doc) {
                    let result = root.join(normalize_separators(Path::new(name)));
                    let template = root
                        .join(normalize_separators(Path::new(&format!("{name}{TEMPLATE_SUFFIX}"))));
                    if self.options.verbose {
                        debug!("Processing file: {}", template.display());
                    }

                    let classified = classify_multi(&doc, name, unit);
                    for issue in classified.issues {
                        self.route(issue, sink, &mut summary)?;
                    }
                    self.process_output(
                        &classified.variables,
                        &template,
                        &result,
                        sink,
                        &mut summary,
                    )?;
                    summary.written.push(result);
                }
            }
        }

        Ok(summary)
    }

    fn route(
        &self,
        issue: StructuralIssue,
        sink: &mut dyn DiagnosticSink,
        summary: &mut RunSummary,
    ) -> Result<(), MergeError> {
        match self.options.policy.route(issue) {
            Routed::Suppressed => Ok(()),
            Routed::Warning(diagnostic) => {
                sink.report(&diagnostic);
                summary.reported += 1;
                Ok(())
            }
            Routed::Fatal(violation) => Err(violation.into()),
        }
    }

    fn process_output(
        &mut self,
        vars: &VariableSet,
        template_path: &Path,
        result_path: &Path,
        sink: &mut dyn DiagnosticSink,
        summary: &mut RunSummary,
    ) -> Result<(), MergeError> {
        if !template_path.exists() {
            return Err(MergeError::MissingFile(template_path.display().to_string()));
        }
        let file = display_name(template_path);

        if self.options.verbose {
            for var in vars.values() {
                debug!("{var}");
            }
        }

        let template = Template::load(template_path)?;
        let names = template.references();

        if self.options.verbose {
            for name in &names {
                let var = find_variable(vars, name)
                    .cloned()
                    .unwrap_or_else(|| Variable::unresolved(name.clone()));
                debug!("{file}: {var}");
            }
        }

        let reconciliation = reconcile(vars, &names, template_path, &self.options.policy);
        for diagnostic in &reconciliation.diagnostics {
            sink.report(diagnostic);
        }
        summary.reported += reconciliation.diagnostics.len();
        if let Some(violation) = reconciliation.violation {
            return Err(violation.into());
        }

        let ctx = self.resolve_values(&file, vars)?;
        let output = render(&template, &ctx);
        fs::write(result_path, output)
            .map_err(|e| MergeError::Write { path: result_path.to_path_buf(), source: e })?;
        info!("wrote {}", result_path.display());
        Ok(())
    }

    /// Build the render context, replacing secret references with their
    /// values. Names without a value are left out.
    fn resolve_values(
        &mut self,
        file: &str,
        vars: &VariableSet,
    ) -> Result<RenderContext, MergeError> {
        let mut ctx = RenderContext::new();
        for var in vars.values() {
            let Some(value) = var.value.as_deref() else {
                continue;
            };
            if self.options.verbose && SecretReference::is_reference(value) {
                debug!("{file}: {} is a vault value", var.key);
            }
            let resolved = self.resolver.resolve(file, &var.key, value)?;
            ctx.insert(&var.key, resolved);
        }
        Ok(ctx)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Accept `\` as a separator in configured paths on every platform.
fn normalize_separators(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('\\', MAIN_SEPARATOR_STR))
}
