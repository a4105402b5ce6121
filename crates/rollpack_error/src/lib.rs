mod batched_build_diagnostic;
mod build_diagnostic;
mod diagnostic_kind;
mod diagnostics;
mod severity;

pub use crate::{
  batched_build_diagnostic::BatchedBuildDiagnostic,
  build_diagnostic::{BuildDiagnostic, DiagnosticLocation, PluginOrigin},
  diagnostic_kind::DiagnosticKind,
  diagnostics::Diagnostics,
  severity::Severity,
};

pub type BuildResult<T> = Result<T, BatchedBuildDiagnostic>;
