use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
  UnresolvedEntry,
  UnresolvedImport,
  LoadError,
  ParseError,
  PluginError,
  FileNameConflict,
  CircularDependency,
  MissingExport,
  SourcemapBroken,
  InvalidOption,
  AlreadyClosed,
  Cancelled,
  IoError,
  PluginLog,
}

impl DiagnosticKind {
  /// Stable code used by embedders to match on diagnostics.
  pub fn code(self) -> &'static str {
    match self {
      Self::UnresolvedEntry => "UNRESOLVED_ENTRY",
      Self::UnresolvedImport => "UNRESOLVED_IMPORT",
      Self::LoadError => "LOAD_ERROR",
      Self::ParseError => "PARSE_ERROR",
      Self::PluginError => "PLUGIN_ERROR",
      Self::FileNameConflict => "FILE_NAME_CONFLICT",
      Self::CircularDependency => "CIRCULAR_DEPENDENCY",
      Self::MissingExport => "MISSING_EXPORT",
      Self::SourcemapBroken => "SOURCEMAP_BROKEN",
      Self::InvalidOption => "INVALID_OPTION",
      Self::AlreadyClosed => "ALREADY_CLOSED",
      Self::Cancelled => "CANCELLED",
      Self::IoError => "IO_ERROR",
      Self::PluginLog => "PLUGIN_LOG",
    }
  }
}

impl Display for DiagnosticKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.code())
  }
}
