use append_only_vec::AppendOnlyVec;

use crate::{BatchedBuildDiagnostic, BuildDiagnostic, Severity};

/// Thread-safe sink for the diagnostics of a single build. Pushing never blocks readers.
pub struct Diagnostics {
  entries: AppendOnlyVec<BuildDiagnostic>,
  /// Records below this severity are dropped. Errors are always kept.
  min_severity: Severity,
}

impl Diagnostics {
  pub fn new(min_severity: Severity) -> Self {
    Self { entries: AppendOnlyVec::new(), min_severity: min_severity.min(Severity::Error) }
  }

  pub fn push(&self, diagnostic: BuildDiagnostic) {
    if diagnostic.severity() < self.min_severity {
      return;
    }
    match diagnostic.severity() {
      Severity::Error => tracing::error!(code = diagnostic.code(), "{}", diagnostic.message()),
      Severity::Warning => tracing::warn!(code = diagnostic.code(), "{}", diagnostic.message()),
      Severity::Info => tracing::info!(code = diagnostic.code(), "{}", diagnostic.message()),
      Severity::Debug => tracing::debug!(code = diagnostic.code(), "{}", diagnostic.message()),
    }
    self.entries.push(diagnostic);
  }

  pub fn has_error(&self) -> bool {
    self.entries.iter().any(BuildDiagnostic::is_error)
  }

  pub fn errors(&self) -> Vec<BuildDiagnostic> {
    self.entries.iter().filter(|d| d.is_error()).cloned().collect()
  }

  pub fn warnings(&self) -> Vec<BuildDiagnostic> {
    self.entries.iter().filter(|d| !d.is_error()).cloned().collect()
  }

  /// Errors first, then every non-error record in the order they were pushed.
  pub fn to_failure(&self) -> BatchedBuildDiagnostic {
    let mut all = self.errors();
    all.extend(self.warnings());
    all.into()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failure_lists_errors_before_warnings() {
    let diagnostics = Diagnostics::new(Severity::Info);
    diagnostics.push(BuildDiagnostic::missing_export("/a.js", "/b.js", "x"));
    diagnostics.push(BuildDiagnostic::unresolved_entry("./nope"));
    let failure = diagnostics.to_failure();
    assert_eq!(failure.len(), 2);
    assert_eq!(failure[0].code(), "UNRESOLVED_ENTRY");
    assert_eq!(failure[1].code(), "MISSING_EXPORT");
  }

  #[test]
  fn silent_level_still_keeps_errors() {
    let diagnostics = Diagnostics::new(Severity::Error);
    diagnostics.push(BuildDiagnostic::plugin_log(Severity::Info, 0, "p", "hello"));
    diagnostics.push(BuildDiagnostic::missing_export("/a.js", "/b.js", "x"));
    assert!(diagnostics.warnings().is_empty());
    diagnostics.push(BuildDiagnostic::cancelled());
    assert!(diagnostics.has_error());
  }
}
