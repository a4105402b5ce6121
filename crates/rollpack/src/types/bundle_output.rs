use rollpack_common::{Output, OutputChunk};
use rollpack_error::BuildDiagnostic;

/// The Output Set of a successful build.
#[derive(Debug, Default)]
pub struct BundleOutput {
  /// Chunks in chunk order, then assets sorted by file name.
  pub assets: Vec<Output>,
  pub warnings: Vec<BuildDiagnostic>,
}

impl BundleOutput {
  pub fn chunks(&self) -> impl Iterator<Item = &OutputChunk> {
    self.assets.iter().filter_map(Output::as_chunk)
  }

  pub fn get(&self, file_name: &str) -> Option<&Output> {
    self.assets.iter().find(|output| output.file_name().as_str() == file_name)
  }
}
