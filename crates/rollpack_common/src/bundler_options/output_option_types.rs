use rollpack_error::Severity;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapType {
  /// Writes `<chunk>.map` next to the chunk and links it with a `sourceMappingURL` comment.
  File,
  /// Embeds the map as a base64 data URL.
  Inline,
  /// Writes `<chunk>.map` without linking it.
  Hidden,
}

/// What to do with a dynamic import nobody can resolve.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicImportFallback {
  #[default]
  Error,
  External,
}

/// How modules reachable from several entries are hoisted out of the entry chunks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SharedChunkStrategy {
  /// One `shared` chunk for every module with more than one importing entry.
  #[default]
  Single,
  /// One chunk per distinct set of importing entries.
  PerCombination,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Silent,
  Warn,
  #[default]
  Info,
  Debug,
}

impl LogLevel {
  /// Lowest severity kept in the diagnostics of a build. Errors are always kept.
  pub fn min_severity(self) -> Severity {
    match self {
      Self::Silent => Severity::Error,
      Self::Warn => Severity::Warning,
      Self::Info => Severity::Info,
      Self::Debug => Severity::Debug,
    }
  }
}
