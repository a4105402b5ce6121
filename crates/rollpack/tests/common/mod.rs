#![allow(dead_code)]

use std::sync::Arc;

use rollpack::{
  BuildResult, BundleOutput, Bundler, BundlerOptions, InputItem, MemoryFileSystem, OutputChunk,
  PluginRegistry,
};

pub const CWD: &str = "/project";

/// Files are relative to [`CWD`].
pub fn project(files: &[(&str, &str)]) -> Arc<MemoryFileSystem> {
  Arc::new(MemoryFileSystem::new(
    files.iter().map(|(path, content)| (format!("{CWD}/{path}"), *content)),
  ))
}

pub fn options(input: &[&str]) -> BundlerOptions {
  BundlerOptions {
    input: Some(input.iter().map(|import| InputItem::from(*import)).collect()),
    cwd: Some(CWD.into()),
    ..BundlerOptions::default()
  }
}

pub fn bundler(
  options: BundlerOptions,
  plugins: PluginRegistry,
  fs: &Arc<MemoryFileSystem>,
) -> Bundler {
  Bundler::with_file_system(options, plugins, Arc::clone(fs) as rollpack::SharedFileSystem)
    .expect("options should be valid")
}

pub async fn generate(
  options: BundlerOptions,
  plugins: PluginRegistry,
  fs: &Arc<MemoryFileSystem>,
) -> BuildResult<BundleOutput> {
  bundler(options, plugins, fs).generate().await
}

pub fn chunk<'a>(output: &'a BundleOutput, name: &str) -> &'a OutputChunk {
  output
    .chunks()
    .find(|chunk| chunk.name.as_str() == name)
    .unwrap_or_else(|| panic!("no chunk named {name}"))
}

/// Module ids of `chunk`, relative to [`CWD`], in execution order.
pub fn stable_ids(chunk: &OutputChunk) -> Vec<String> {
  chunk
    .modules
    .keys
    .iter()
    .map(|id| {
      let id: &str = id;
      id.strip_prefix(CWD).unwrap_or(id).trim_start_matches('/').to_string()
    })
    .collect()
}

/// Number of times a module factory is registered in `code`.
pub fn define_count(code: &str, stable_id: &str) -> usize {
  code.matches(&format!("__rollpack_define(\"{stable_id}\"")).count()
}

pub fn codes(diagnostics: &[rollpack::BuildDiagnostic]) -> Vec<&'static str> {
  diagnostics.iter().map(rollpack::BuildDiagnostic::code).collect()
}
