//! Drives a run: merge sources, validate, then reconcile, resolve and
//! render each output in turn.

pub mod error;
pub mod pipeline;

pub use error::MergeError;
pub use pipeline::{DiagnosticSink, Mode, Processor, RunOptions, RunSummary, load_sources};
