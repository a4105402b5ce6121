use itertools::Itertools;
use oxc_index::{index_vec, IndexVec};
use rollpack_common::{ChunkIdx, Module, ModuleIdx};
use rollpack_utils::indexmap::FxIndexSet;

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Static and dynamic dependencies between chunks, plus the externals each chunk binds at its
  /// top. Chunk dependencies are ordered like the chunk table, externals by execution order.
  pub(super) fn compute_cross_chunk_links(&self, chunk_graph: &mut ChunkGraph) {
    let module_table = &self.link_output.module_table;
    let chunk_count = chunk_graph.chunk_table.len();
    let mut cross_chunk_imports: IndexVec<ChunkIdx, Vec<ChunkIdx>> = index_vec![vec![]; chunk_count];
    let mut cross_chunk_dynamic_imports: IndexVec<ChunkIdx, Vec<ChunkIdx>> =
      index_vec![vec![]; chunk_count];
    let mut imports_from_external_modules: IndexVec<ChunkIdx, FxIndexSet<ModuleIdx>> =
      index_vec![FxIndexSet::default(); chunk_count];

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_enumerated() {
      for &module_idx in &chunk.modules {
        let Module::Normal(module) = &module_table[module_idx] else {
          continue;
        };
        for record in module.import_records.iter().filter(|record| !record.is_pruned()) {
          let importee = record.resolved_module();
          match &module_table[importee] {
            Module::External(_) => {
              if record.kind.is_static() {
                imports_from_external_modules[chunk_idx].insert(importee);
              }
            }
            Module::Normal(_) => {
              let Some(importee_chunk) = chunk_graph.module_to_chunk[importee] else {
                continue;
              };
              if importee_chunk == chunk_idx {
                continue;
              }
              if record.kind.is_static() {
                cross_chunk_imports[chunk_idx].push(importee_chunk);
              } else {
                cross_chunk_dynamic_imports[chunk_idx].push(importee_chunk);
              }
            }
          }
        }
      }
    }

    for (((chunk, imports), dynamic_imports), externals) in chunk_graph
      .chunk_table
      .iter_mut()
      .zip(cross_chunk_imports)
      .zip(cross_chunk_dynamic_imports)
      .zip(imports_from_external_modules)
    {
      chunk.cross_chunk_imports = imports.into_iter().sorted_unstable().dedup().collect();
      chunk.cross_chunk_dynamic_imports =
        dynamic_imports.into_iter().sorted_unstable().dedup().collect();
      chunk.imports_from_external_modules = externals
        .into_iter()
        .sorted_by_key(|idx| module_table[*idx].exec_order())
        .collect();
    }
  }
}
