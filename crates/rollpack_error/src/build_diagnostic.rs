use std::{fmt::Display, sync::Arc};

use arcstr::ArcStr;

use crate::{DiagnosticKind, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLocation {
  pub id: ArcStr,
  /// 1-based.
  pub line: u32,
  /// 0-based.
  pub column: u32,
}

impl Display for DiagnosticLocation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}:{}", self.id, self.line, self.column)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOrigin {
  pub index: usize,
  pub name: String,
  pub hook: &'static str,
}

/// A single error, warning or log record produced during a build.
///
/// Diagnostics are cheap to clone so that memoized results can hand the same failure to
/// every waiter.
#[derive(Debug, Clone)]
pub struct BuildDiagnostic {
  kind: DiagnosticKind,
  severity: Severity,
  message: String,
  location: Option<DiagnosticLocation>,
  plugin: Option<PluginOrigin>,
  source: Option<Arc<anyhow::Error>>,
}

impl BuildDiagnostic {
  fn new(kind: DiagnosticKind, severity: Severity, message: String) -> Self {
    Self { kind, severity, message, location: None, plugin: None, source: None }
  }

  pub fn unresolved_entry(specifier: &str) -> Self {
    Self::new(
      DiagnosticKind::UnresolvedEntry,
      Severity::Error,
      format!("Could not resolve entry module \"{specifier}\"."),
    )
  }

  pub fn unresolved_import(specifier: &str, importer: &str) -> Self {
    Self::new(
      DiagnosticKind::UnresolvedImport,
      Severity::Error,
      format!("Could not resolve \"{specifier}\" from \"{importer}\"."),
    )
  }

  pub fn load_error(id: &str, importer: Option<&str>, reason: impl Display) -> Self {
    let message = match importer {
      Some(importer) => format!("Could not load \"{id}\" (imported by \"{importer}\"): {reason}"),
      None => format!("Could not load \"{id}\": {reason}"),
    };
    Self::new(DiagnosticKind::LoadError, Severity::Error, message)
  }

  pub fn parse_error(id: &str, reason: impl Display, location: Option<DiagnosticLocation>) -> Self {
    let mut diagnostic = Self::new(
      DiagnosticKind::ParseError,
      Severity::Error,
      format!("Failed to parse \"{id}\": {reason}"),
    );
    diagnostic.location = location;
    diagnostic
  }

  /// Wraps an error raised by a plugin hook. If the plugin propagated a diagnostic produced by
  /// the engine, that diagnostic is kept and only annotated with the plugin origin.
  pub fn plugin_error(
    index: usize,
    name: &str,
    hook: &'static str,
    error: anyhow::Error,
  ) -> Self {
    let origin = PluginOrigin { index, name: name.to_string(), hook };
    match error.downcast::<BuildDiagnostic>() {
      Ok(mut inner) => {
        if inner.plugin.is_none() {
          inner.plugin = Some(origin);
        }
        inner
      }
      Err(error) => {
        let mut diagnostic = Self::new(
          DiagnosticKind::PluginError,
          Severity::Error,
          format!("[plugin {name}] hook {hook} failed: {error:#}"),
        );
        diagnostic.plugin = Some(origin);
        diagnostic.source = Some(Arc::new(error));
        diagnostic
      }
    }
  }

  pub fn file_name_conflict(file_name: &str, first: &str, second: &str) -> Self {
    Self::new(
      DiagnosticKind::FileNameConflict,
      Severity::Error,
      format!(
        "The output file name \"{file_name}\" is claimed by both \"{first}\" and \"{second}\"."
      ),
    )
  }

  pub fn circular_dependency(cycle: &[ArcStr]) -> Self {
    let path = cycle.iter().map(ArcStr::as_str).collect::<Vec<_>>().join(" -> ");
    Self::new(
      DiagnosticKind::CircularDependency,
      Severity::Warning,
      format!("Circular dependency: {path}"),
    )
  }

  pub fn missing_export(importer: &str, importee: &str, name: &str) -> Self {
    Self::new(
      DiagnosticKind::MissingExport,
      Severity::Warning,
      format!("\"{name}\" is not exported by \"{importee}\", imported by \"{importer}\"."),
    )
  }

  pub fn sourcemap_broken(id: &str, plugin: &str, hook: &'static str) -> Self {
    Self::new(
      DiagnosticKind::SourcemapBroken,
      Severity::Warning,
      format!(
        "Plugin \"{plugin}\" returned a broken sourcemap from {hook} for \"{id}\", falling back to a line mapping."
      ),
    )
  }

  pub fn invalid_option(reason: impl Display) -> Self {
    Self::new(DiagnosticKind::InvalidOption, Severity::Error, format!("Invalid option: {reason}"))
  }

  pub fn already_closed() -> Self {
    Self::new(
      DiagnosticKind::AlreadyClosed,
      Severity::Error,
      "The bundler is closed and cannot be used anymore.".to_string(),
    )
  }

  pub fn cancelled() -> Self {
    Self::new(DiagnosticKind::Cancelled, Severity::Error, "The build was cancelled.".to_string())
  }

  pub fn io_error(path: &str, error: std::io::Error) -> Self {
    let mut diagnostic =
      Self::new(DiagnosticKind::IoError, Severity::Error, format!("{path}: {error}"));
    diagnostic.source = Some(Arc::new(error.into()));
    diagnostic
  }

  pub fn plugin_log(
    severity: Severity,
    index: usize,
    plugin: &str,
    message: impl Into<String>,
  ) -> Self {
    let mut diagnostic = Self::new(DiagnosticKind::PluginLog, severity, message.into());
    diagnostic.plugin = Some(PluginOrigin { index, name: plugin.to_string(), hook: "log" });
    diagnostic
  }

  pub fn kind(&self) -> DiagnosticKind {
    self.kind
  }

  pub fn code(&self) -> &'static str {
    self.kind.code()
  }

  pub fn severity(&self) -> Severity {
    self.severity
  }

  pub fn is_error(&self) -> bool {
    self.severity.is_error()
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn location(&self) -> Option<&DiagnosticLocation> {
    self.location.as_ref()
  }

  pub fn plugin(&self) -> Option<&PluginOrigin> {
    self.plugin.as_ref()
  }
}

impl Display for BuildDiagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}: {}", self.kind, self.severity, self.message)?;
    if let Some(location) = &self.location {
      write!(f, "\n  at {location}")?;
    }
    Ok(())
  }
}

impl std::error::Error for BuildDiagnostic {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    self.source.as_deref().map(|error| {
      let error: &(dyn std::error::Error + 'static) = &**error;
      error
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plugin_error_keeps_engine_diagnostics() {
    let inner = BuildDiagnostic::unresolved_import("./missing", "/src/main.js");
    let wrapped = BuildDiagnostic::plugin_error(2, "alias", "resolve_id", inner.into());
    assert_eq!(wrapped.kind(), DiagnosticKind::UnresolvedImport);
    assert_eq!(wrapped.plugin().map(|p| p.index), Some(2));
  }

  #[test]
  fn plugin_error_wraps_foreign_errors() {
    let wrapped =
      BuildDiagnostic::plugin_error(0, "boom", "transform", anyhow::anyhow!("exploded"));
    assert_eq!(wrapped.code(), "PLUGIN_ERROR");
    assert!(wrapped.message().contains("exploded"));
    assert!(wrapped.is_error());
  }

  #[test]
  fn warnings_are_not_errors() {
    let diagnostic = BuildDiagnostic::missing_export("/a.js", "/b.js", "foo");
    assert_eq!(diagnostic.severity(), Severity::Warning);
    assert!(!diagnostic.is_error());
  }
}
