use oxc_index::IndexVec;
use rollpack_common::{ChunkIdx, ModuleId, PreliminaryFilename, RenderedChunk, RenderedModule};
use rollpack_sourcemap::SourceMap;

/// A rendered chunk whose file name and code may still contain hash placeholders.
#[derive(Debug)]
pub struct InstantiatedChunk {
  pub preliminary_filename: PreliminaryFilename,
  pub code: String,
  pub map: Option<SourceMap>,
  pub rendered_chunk: RenderedChunk,
  pub rendered_modules: Vec<(ModuleId, RenderedModule)>,
  /// Whatever `augment_chunk_hash` contributed.
  pub augment_chunk_hash: Option<String>,
}

pub type IndexInstantiatedChunks = IndexVec<ChunkIdx, InstantiatedChunk>;
