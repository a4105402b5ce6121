use std::path::Path;

use arcstr::ArcStr;
use rollpack_common::{ChunkKind, SharedChunkStrategy};
use rollpack_error::{BuildDiagnostic, BuildResult};
use rollpack_utils::{
  hash_placeholder::HashPlaceholderGenerator, sanitize_file_name::sanitize_file_name,
};
use rustc_hash::FxHashMap;
use sugar_path::SugarPath;

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Notices:
  /// - Should generate filenames that are stable cross builds and os.
  pub(super) fn generate_chunk_name_and_preliminary_filenames(
    &self,
    chunk_graph: &mut ChunkGraph,
  ) -> BuildResult<()> {
    let module_table = &self.link_output.module_table;
    let mut hash_placeholder_generator = HashPlaceholderGenerator::default();
    let mut used_name_counts = FxHashMap::default();
    let out_dir = self.options.out_dir();

    for chunk in chunk_graph.chunk_table.iter_mut() {
      let is_explicit_name = chunk.name.is_some();
      let name = match (&chunk.name, chunk.kind) {
        (Some(name), _) => name.clone(),
        (None, ChunkKind::EntryPoint { module, is_user_defined: true, .. }) => {
          let id = module_table[module].id();
          let stem = Path::new(id).file_stem().map(|stem| stem.to_string_lossy());
          stem.map_or(arcstr::literal!("input"), |stem| sanitize_file_name(&stem).into())
        }
        (None, ChunkKind::EntryPoint { module, .. }) => module_table[module]
          .as_normal()
          .map_or(arcstr::literal!("chunk"), |module| module.repr_name.as_str().into()),
        (None, ChunkKind::Common) => match self.options.shared_chunks {
          SharedChunkStrategy::Single => arcstr::literal!("shared"),
          SharedChunkStrategy::PerCombination => chunk
            .modules
            .first()
            .and_then(|idx| module_table[*idx].as_normal())
            .map_or(arcstr::literal!("shared"), |module| module.repr_name.as_str().into()),
        },
      };

      let preliminary_filename = chunk
        .generate_preliminary_filename(
          self.options,
          &name,
          is_explicit_name,
          &mut hash_placeholder_generator,
          &mut used_name_counts,
        )
        .map_err(BuildDiagnostic::invalid_option)?;

      chunk.absolute_preliminary_filename =
        Some(out_dir.join(&*preliminary_filename).normalize().to_string_lossy().into_owned());
      chunk.name = Some(name);
      chunk.preliminary_filename = Some(preliminary_filename);
    }
    Ok(())
  }
}
