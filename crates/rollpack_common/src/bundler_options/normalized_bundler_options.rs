use std::path::PathBuf;

use crate::{
  bundler_options::manual_chunk::NormalizedManualChunk, DynamicImportFallback, ExternalMatcher,
  FilenameTemplate, InputItem, LogLevel, OutputFormat, Platform, SharedChunkStrategy,
  SourceMapType, TreeshakeOptions,
};

#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub input: Vec<InputItem>,
  pub cwd: PathBuf,
  pub platform: Platform,
  pub external: Vec<ExternalMatcher>,
  pub treeshake: TreeshakeOptions,
  pub dynamic_import_fallback: DynamicImportFallback,
  pub shared_chunks: SharedChunkStrategy,
  pub manual_chunks: Vec<NormalizedManualChunk>,
  pub cache: bool,
  pub log_level: LogLevel,

  // --- Output
  pub dir: String,
  pub format: OutputFormat,
  pub entry_filenames: FilenameTemplate,
  pub chunk_filenames: FilenameTemplate,
  pub asset_filenames: FilenameTemplate,
  pub sourcemap: Option<SourceMapType>,
  pub banner: Option<String>,
  pub footer: Option<String>,
}

impl NormalizedBundlerOptions {
  pub fn is_external(&self, id: &str) -> bool {
    self.external.iter().any(|matcher| matcher.matches(id))
  }

  pub fn sourcemap_enabled(&self) -> bool {
    self.sourcemap.is_some()
  }

  /// Absolute output directory.
  pub fn out_dir(&self) -> PathBuf {
    self.cwd.join(&self.dir)
  }
}
