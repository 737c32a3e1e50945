#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod document;
pub mod processor;
pub mod reconcile;
pub mod secrets;
pub mod templates;
pub mod vars;

pub use processor::{DiagnosticSink, MergeError, Mode, Processor, RunOptions, RunSummary};
