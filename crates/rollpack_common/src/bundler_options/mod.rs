pub mod external;
pub mod filename_template;
pub mod input_item;
pub mod manual_chunk;
pub mod module_type;
pub mod normalized_bundler_options;
pub mod output_format;
pub mod output_option_types;
pub mod platform;
pub mod resolve_options;
pub mod treeshake_options;

use std::path::PathBuf;

use serde::Deserialize;

use crate::{
  DynamicImportFallback, InputItem, LogLevel, ManualChunk, OutputFormat, Platform, ResolveOptions,
  SharedChunkStrategy, SourceMapType, TreeshakeOptions,
};

/// Raw options as written by the user. Every field is optional and normalized once per
/// `Bundler` into `NormalizedBundlerOptions`.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BundlerOptions {
  // --- Input
  pub input: Option<Vec<InputItem>>,
  pub cwd: Option<PathBuf>,
  pub platform: Option<Platform>,
  pub external: Option<Vec<String>>,
  pub resolve: Option<ResolveOptions>,
  pub treeshake: Option<TreeshakeOptions>,
  pub dynamic_import_fallback: Option<DynamicImportFallback>,
  pub shared_chunks: Option<SharedChunkStrategy>,
  pub manual_chunks: Option<Vec<ManualChunk>>,
  /// Keep resolutions and transforms around for the next build of the same `Bundler`.
  pub cache: Option<bool>,
  pub log_level: Option<LogLevel>,

  // --- Output
  pub dir: Option<String>,
  pub format: Option<OutputFormat>,
  pub entry_filenames: Option<String>,
  pub chunk_filenames: Option<String>,
  pub asset_filenames: Option<String>,
  pub sourcemap: Option<SourceMapType>,
  pub banner: Option<String>,
  pub footer: Option<String>,
}

impl BundlerOptions {
  pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_camel_case_json() {
    let options = BundlerOptions::from_json_str(
      r#"{
        "input": ["./main.js", { "name": "admin", "import": "./admin.js" }],
        "platform": "node",
        "sharedChunks": "per-combination",
        "dynamicImportFallback": "external",
        "manualChunks": [{ "name": "vendor", "test": "node_modules" }],
        "treeshake": { "moduleSideEffects": false },
        "sourcemap": "inline",
        "logLevel": "silent"
      }"#,
    )
    .unwrap();
    let input = options.input.unwrap();
    assert_eq!(input[0].import, "./main.js");
    assert_eq!(input[1].name.as_deref(), Some("admin"));
    assert_eq!(options.platform, Some(Platform::Node));
    assert_eq!(options.shared_chunks, Some(SharedChunkStrategy::PerCombination));
    assert_eq!(options.dynamic_import_fallback, Some(DynamicImportFallback::External));
    let treeshake = options.treeshake.unwrap();
    assert!(treeshake.enabled);
    assert!(!treeshake.module_side_effects);
    assert_eq!(options.sourcemap, Some(SourceMapType::Inline));
    assert_eq!(options.log_level, Some(LogLevel::Silent));
  }

  #[test]
  fn rejects_unknown_keys() {
    assert!(BundlerOptions::from_json_str(r#"{ "inputs": [] }"#).is_err());
  }
}
