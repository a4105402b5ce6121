use arcstr::ArcStr;
use oxc_index::{index_vec, IndexVec};
use rollpack_common::{Chunk, ChunkIdx, ChunkKind, ModuleIdx, SharedChunkStrategy};
use rollpack_utils::{bitset::BitSet, option_ext::OptionExt};
use rustc_hash::FxHashMap;

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Every included module ends up in exactly one chunk. Entry modules stay in their entry chunk,
  /// manual rules come next, and a module reached from several entries is hoisted out of them.
  pub(super) fn generate_chunks(&self) -> ChunkGraph {
    let module_table = &self.link_output.module_table;
    let entries = &self.link_output.entry_points;
    let mut chunk_graph = ChunkGraph::new(module_table);

    let entry_count = u32::try_from(entries.len()).ok().unpack();
    let mut index_splitting_info: IndexVec<ModuleIdx, BitSet> =
      index_vec![BitSet::new(entry_count); module_table.len()];

    for (bit, entry) in (0u32..).zip(entries.iter()) {
      self.determine_reachable_modules_for_entry(entry.idx, bit, &mut index_splitting_info);

      let mut bits = BitSet::new(entry_count);
      bits.set_bit(bit);
      let name = entry.kind.is_user_defined().then(|| entry.name.clone()).flatten();
      let chunk = Chunk::new(
        name,
        bits,
        vec![],
        ChunkKind::EntryPoint { is_user_defined: entry.kind.is_user_defined(), bit, module: entry.idx },
      );
      let chunk_idx = chunk_graph.add_chunk(chunk);
      chunk_graph.entry_module_to_entry_chunk.insert(entry.idx, chunk_idx);
    }

    let bit_to_entry_chunk = entries
      .iter()
      .map(|entry| chunk_graph.entry_module_to_entry_chunk[&entry.idx])
      .collect::<Vec<_>>();

    let normal_modules = self
      .link_output
      .sorted_modules
      .iter()
      .copied()
      .filter(|idx| module_table[*idx].is_normal())
      .collect::<Vec<_>>();

    for &idx in &normal_modules {
      if let Some(&chunk_idx) = chunk_graph.entry_module_to_entry_chunk.get(&idx) {
        chunk_graph.add_module_to_chunk(idx, chunk_idx);
      }
    }

    let mut manual_chunks: FxHashMap<&str, ChunkIdx> = FxHashMap::default();
    for &idx in &normal_modules {
      if chunk_graph.module_to_chunk[idx].is_some() {
        continue;
      }
      let stable_id = module_table[idx].stable_id();
      let Some(rule) = self.options.manual_chunks.iter().find(|rule| rule.matches(stable_id)) else {
        continue;
      };
      let chunk_idx = *manual_chunks.entry(rule.name.as_str()).or_insert_with(|| {
        chunk_graph.add_chunk(Chunk::new(
          Some(ArcStr::from(rule.name.as_str())),
          BitSet::new(entry_count),
          vec![],
          ChunkKind::Common,
        ))
      });
      chunk_graph.chunk_table[chunk_idx].bits.union(&index_splitting_info[idx]);
      chunk_graph.add_module_to_chunk(idx, chunk_idx);
    }

    let mut shared_chunks: FxHashMap<BitSet, ChunkIdx> = FxHashMap::default();
    for &idx in &normal_modules {
      if chunk_graph.module_to_chunk[idx].is_some() {
        continue;
      }
      let bits = &index_splitting_info[idx];
      if bits.bit_count() == 1 {
        let bit = bits.iter_bits().next().unpack();
        chunk_graph.add_module_to_chunk(idx, bit_to_entry_chunk[bit as usize]);
        continue;
      }
      if bits.is_empty() {
        continue;
      }
      let chunk_idx =
        shared_chunk_for(&mut chunk_graph, &mut shared_chunks, self.options.shared_chunks, bits);
      chunk_graph.add_module_to_chunk(idx, chunk_idx);
    }

    for chunk in chunk_graph.chunk_table.iter_mut() {
      chunk.exec_order =
        chunk.modules.iter().map(|idx| module_table[*idx].exec_order()).min().unwrap_or(u32::MAX);
    }

    tracing::debug!(chunks = chunk_graph.chunk_table.len(), "modules split into chunks");
    chunk_graph
  }

  fn determine_reachable_modules_for_entry(
    &self,
    entry: ModuleIdx,
    bit: u32,
    index_splitting_info: &mut IndexVec<ModuleIdx, BitSet>,
  ) {
    let module_table = &self.link_output.module_table;
    let mut stack = vec![entry];
    while let Some(idx) = stack.pop() {
      let Some(module) = module_table[idx].as_normal() else {
        continue;
      };
      if index_splitting_info[idx].has_bit(bit) {
        continue;
      }
      index_splitting_info[idx].set_bit(bit);
      stack.extend(
        module
          .import_records
          .iter()
          .filter(|record| record.kind.is_static() && !record.is_pruned())
          .map(|record| record.resolved_module()),
      );
    }
  }
}

/// The shared chunk hosting a module reached from the entries in `bits`, created on first use.
/// Its bits end up covering every entry that reaches one of its modules.
fn shared_chunk_for(
  chunk_graph: &mut ChunkGraph,
  shared_chunks: &mut FxHashMap<BitSet, ChunkIdx>,
  strategy: SharedChunkStrategy,
  bits: &BitSet,
) -> ChunkIdx {
  let key = match strategy {
    SharedChunkStrategy::Single => BitSet::default(),
    SharedChunkStrategy::PerCombination => bits.clone(),
  };
  let chunk_idx = *shared_chunks.entry(key).or_insert_with(|| {
    chunk_graph.add_chunk(Chunk::new(None, bits.clone(), vec![], ChunkKind::Common))
  });
  chunk_graph.chunk_table[chunk_idx].bits.union(bits);
  chunk_idx
}

#[cfg(test)]
mod tests {
  use rollpack_common::IndexModules;

  use super::*;

  fn bits(set: &[u32]) -> BitSet {
    let mut bits = BitSet::new(3);
    for bit in set {
      bits.set_bit(*bit);
    }
    bits
  }

  #[test]
  fn a_single_shared_chunk_covers_every_entry_it_serves() {
    let mut chunk_graph = ChunkGraph::new(&IndexModules::default());
    let mut shared_chunks = FxHashMap::default();
    let strategy = SharedChunkStrategy::Single;

    let first = shared_chunk_for(&mut chunk_graph, &mut shared_chunks, strategy, &bits(&[0, 1]));
    let second = shared_chunk_for(&mut chunk_graph, &mut shared_chunks, strategy, &bits(&[1, 2]));
    assert_eq!(first, second);
    assert_eq!(chunk_graph.chunk_table.len(), 1);
    assert_eq!(chunk_graph.chunk_table[first].bits, bits(&[0, 1, 2]));
  }

  #[test]
  fn per_combination_chunks_keep_their_own_entries() {
    let mut chunk_graph = ChunkGraph::new(&IndexModules::default());
    let mut shared_chunks = FxHashMap::default();
    let strategy = SharedChunkStrategy::PerCombination;

    let first = shared_chunk_for(&mut chunk_graph, &mut shared_chunks, strategy, &bits(&[0, 1]));
    let second = shared_chunk_for(&mut chunk_graph, &mut shared_chunks, strategy, &bits(&[1, 2]));
    let again = shared_chunk_for(&mut chunk_graph, &mut shared_chunks, strategy, &bits(&[0, 1]));
    assert_ne!(first, second);
    assert_eq!(first, again);
    assert_eq!(chunk_graph.chunk_table[first].bits, bits(&[0, 1]));
    assert_eq!(chunk_graph.chunk_table[second].bits, bits(&[1, 2]));
  }
}
