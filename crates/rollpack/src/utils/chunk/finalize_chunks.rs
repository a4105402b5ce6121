use std::hash::Hash;

use arcstr::ArcStr;
use itertools::Itertools;
use oxc_index::{index_vec, IndexVec};
use rollpack_common::ChunkIdx;
use rollpack_utils::{
  concat_string,
  hash_placeholder::{extract_hash_placeholders, replace_placeholder_with_hash},
  indexmap::FxIndexSet,
  rayon::{IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator},
  xxhash::{xxhash_base64_url, xxhash_with_base},
};
use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::Xxh3;

use crate::types::instantiated_chunk::{IndexInstantiatedChunks, InstantiatedChunk};

/// Replaces every hash placeholder with the final hash of the chunk it stands for. A chunk's hash
/// covers its own content, its `augment_chunk_hash` contributions and, transitively, the content
/// of every chunk it references.
pub fn finalize_chunks(instantiated_chunks: IndexInstantiatedChunks) -> Vec<InstantiatedChunk> {
  let chunk_idx_by_placeholder = instantiated_chunks
    .iter_enumerated()
    .filter_map(|(chunk_idx, chunk)| {
      chunk.preliminary_filename.hash_placeholder().map(move |placeholders| {
        placeholders.iter().map(move |hash_placeholder| (hash_placeholder.as_str(), chunk_idx))
      })
    })
    .flatten()
    .collect::<FxHashMap<_, _>>();

  let index_direct_dependencies: IndexVec<ChunkIdx, Vec<ChunkIdx>> = instantiated_chunks
    .par_iter()
    .map(|chunk| {
      extract_hash_placeholders(&chunk.code)
        .iter()
        .filter_map(|placeholder| chunk_idx_by_placeholder.get(placeholder.as_str()).copied())
        .collect_vec()
    })
    .collect::<Vec<_>>()
    .into();

  // `a -> b -> c`: a change of `c` has to change the hash of `a` too.
  let index_transitive_dependencies = collect_transitive_dependencies(&index_direct_dependencies);

  let index_standalone_content_hashes: IndexVec<ChunkIdx, String> = instantiated_chunks
    .par_iter()
    .map(|chunk| match &chunk.augment_chunk_hash {
      Some(augment) => xxhash_base64_url(concat_string!(chunk.code, augment).as_bytes()),
      None => xxhash_base64_url(chunk.code.as_bytes()),
    })
    .collect::<Vec<_>>()
    .into();

  let index_chunk_hashers: IndexVec<ChunkIdx, Xxh3> =
    index_vec![Xxh3::default(); instantiated_chunks.len()];

  let index_final_hashes: IndexVec<ChunkIdx, String> = index_chunk_hashers
    .into_par_iter()
    .enumerate()
    .map(|(chunk_idx, mut hasher)| {
      let chunk_idx = ChunkIdx::from_usize(chunk_idx);
      index_standalone_content_hashes[chunk_idx].hash(&mut hasher);
      // Chunks with the same content still get different hashes.
      instantiated_chunks[chunk_idx].preliminary_filename.hash(&mut hasher);
      index_transitive_dependencies[chunk_idx].iter().for_each(|dep| {
        index_standalone_content_hashes[*dep].hash(&mut hasher);
      });
      // Pad so that every placeholder length up to the maximum can be sliced.
      format!("{:A>22}", xxhash_with_base(&hasher.digest128().to_le_bytes(), 64))
    })
    .collect::<Vec<_>>()
    .into();

  let final_hashes_by_placeholder = index_final_hashes
    .iter_enumerated()
    .filter_map(|(chunk_idx, hash)| {
      instantiated_chunks[chunk_idx].preliminary_filename.hash_placeholder().map(|placeholders| {
        placeholders
          .iter()
          .map(|placeholder| (placeholder.clone(), hash[..placeholder.len()].to_string()))
      })
    })
    .flatten()
    .collect::<FxHashMap<_, _>>();

  let replace = |value: &str| -> ArcStr {
    replace_placeholder_with_hash(value, &final_hashes_by_placeholder).as_ref().into()
  };

  instantiated_chunks
    .into_iter()
    .collect_vec()
    .into_par_iter()
    .map(|mut chunk| {
      chunk.code = replace_placeholder_with_hash(&chunk.code, &final_hashes_by_placeholder).into_owned();
      let rendered = &mut chunk.rendered_chunk;
      rendered.file_name = replace(&rendered.file_name);
      rendered.imports = rendered.imports.iter().map(|file_name| replace(file_name)).collect();
      rendered.dynamic_imports =
        rendered.dynamic_imports.iter().map(|file_name| replace(file_name)).collect();
      chunk
    })
    .collect()
}

fn collect_transitive_dependencies(
  index_direct_dependencies: &IndexVec<ChunkIdx, Vec<ChunkIdx>>,
) -> IndexVec<ChunkIdx, FxIndexSet<ChunkIdx>> {
  fn traverse(
    index: ChunkIdx,
    dep_map: &IndexVec<ChunkIdx, Vec<ChunkIdx>>,
    visited: &mut FxIndexSet<ChunkIdx>,
  ) {
    for dep_index in &dep_map[index] {
      if visited.insert(*dep_index) {
        traverse(*dep_index, dep_map, visited);
      }
    }
  }

  index_direct_dependencies
    .iter_enumerated()
    .map(|(idx, _)| {
      let mut visited_deps = FxIndexSet::default();
      traverse(idx, index_direct_dependencies, &mut visited_deps);
      visited_deps
    })
    .collect::<Vec<_>>()
    .into()
}
