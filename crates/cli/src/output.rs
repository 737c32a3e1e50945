//! Console output for diagnostics.

use varmerge_core::DiagnosticSink;
use varmerge_core::reconcile::Diagnostic;

/// Prints each diagnostic to stdout as soon as it is reported.
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        println!("{diagnostic}");
    }
}
