use arcstr::ArcStr;
use rollpack_common::{Chunk, IndexModules, RenderedChunk};
use rollpack_utils::option_ext::OptionExt;

use crate::graph::ChunkGraph;

use super::render_chunk_exports::get_chunk_export_names;

pub fn generate_rendered_chunk(
  chunk: &Chunk,
  module_table: &IndexModules,
  chunk_graph: &ChunkGraph,
) -> RenderedChunk {
  let file_name_of = |chunk: &Chunk| -> ArcStr {
    chunk.preliminary_filename.as_ref().unpack().as_arcstr().clone()
  };

  RenderedChunk {
    name: chunk.name.clone().unpack(),
    file_name: file_name_of(chunk),
    is_entry: chunk.is_user_defined_entry(),
    is_dynamic_entry: chunk.is_dynamic_entry(),
    facade_module_id: chunk.entry_module(module_table).map(|module| module.id.clone()),
    module_ids: chunk
      .modules
      .iter()
      .filter_map(|idx| module_table[*idx].as_normal())
      .map(|module| module.id.clone())
      .collect(),
    exports: get_chunk_export_names(chunk, module_table),
    imports: chunk
      .cross_chunk_imports
      .iter()
      .map(|idx| file_name_of(&chunk_graph.chunk_table[*idx]))
      .collect(),
    dynamic_imports: chunk
      .cross_chunk_dynamic_imports
      .iter()
      .map(|idx| file_name_of(&chunk_graph.chunk_table[*idx]))
      .collect(),
  }
}
