use std::path::Path;

use futures::future::try_join_all;
use oxc_index::IndexVec;
use rollpack_common::{AssetSource, ChunkIdx, Output, OutputAsset, OutputChunk, SourceMapType};
use rollpack_error::{BuildDiagnostic, BuildResult};
use rollpack_sourcemap::{collapse_sourcemaps, rewrite_sources, to_data_url};
use rollpack_utils::{
  concat_string,
  option_ext::OptionExt,
  path_ext::PathExt,
  rayon::{IntoParallelIterator, ParallelIterator},
};
use sugar_path::SugarPath;

use crate::{
  graph::ChunkGraph,
  types::instantiated_chunk::{IndexInstantiatedChunks, InstantiatedChunk},
  utils::chunk::{
    finalize_chunks::finalize_chunks, generate_rendered_chunk::generate_rendered_chunk,
  },
};

use super::GenerateStage;

impl GenerateStage<'_> {
  pub(super) async fn render_chunk_to_assets(
    &self,
    chunk_graph: &ChunkGraph,
  ) -> BuildResult<Vec<Output>> {
    let instantiated_chunks = self.instantiate_chunks(chunk_graph).await?;
    let finalized = finalize_chunks(instantiated_chunks);

    let mut chunks = Vec::with_capacity(finalized.len());
    let mut sourcemap_assets = vec![];
    for chunk in finalized {
      let (output, sourcemap_asset) = self.finalize_sourcemap(chunk);
      chunks.push(Output::Chunk(Box::new(output)));
      sourcemap_assets.extend(sourcemap_asset.map(|asset| Output::Asset(Box::new(asset))));
    }
    chunks.extend(sourcemap_assets);
    Ok(chunks)
  }

  /// Renders every chunk and runs `render_chunk` and `augment_chunk_hash` on it. File names still
  /// contain hash placeholders at this point.
  async fn instantiate_chunks(&self, chunk_graph: &ChunkGraph) -> BuildResult<IndexInstantiatedChunks> {
    let chunk_indexes = chunk_graph.chunk_table.indices().collect::<Vec<_>>();
    let rendered = chunk_indexes
      .into_par_iter()
      .map(|chunk_idx| self.render_chunk(chunk_idx, chunk_graph))
      .collect::<Vec<_>>();

    let instantiated = try_join_all(chunk_graph.chunk_table.iter().zip(rendered).map(
      |(chunk, output)| async move {
        let rendered_chunk =
          generate_rendered_chunk(chunk, &self.link_output.module_table, chunk_graph);

        let mut sourcemap_chain = vec![];
        if let Some(map) = output.map {
          sourcemap_chain.push(map);
        }
        let code =
          self.plugin_driver.render_chunk(&rendered_chunk, output.code, &mut sourcemap_chain).await?;
        let map = if self.options.sourcemap_enabled() {
          collapse_sourcemaps(&sourcemap_chain.iter().collect::<Vec<_>>())
        } else {
          None
        };
        let augment_chunk_hash = self.plugin_driver.augment_chunk_hash(&rendered_chunk).await?;

        Ok::<_, BuildDiagnostic>(InstantiatedChunk {
          preliminary_filename: chunk.preliminary_filename.clone().unpack(),
          code,
          map,
          rendered_chunk,
          rendered_modules: output.rendered_modules,
          augment_chunk_hash,
        })
      },
    ))
    .await?;

    Ok(IndexVec::<ChunkIdx, _>::from_vec(instantiated))
  }

  /// Links or embeds the chunk's map. Sources are made relative to the chunk's directory.
  fn finalize_sourcemap(&self, chunk: InstantiatedChunk) -> (OutputChunk, Option<OutputAsset>) {
    let InstantiatedChunk { preliminary_filename, mut code, map, rendered_chunk, rendered_modules, .. } =
      chunk;
    let file_name = rendered_chunk.file_name.clone();
    let chunk_dir = self.options.out_dir().join(file_name.as_str());
    let chunk_dir = chunk_dir.parent().map(Path::to_path_buf).unwrap_or_default();

    let map = map.map(|map| {
      rewrite_sources(&map, |source| {
        let path = Path::new(source);
        if path.is_absolute() {
          path.relative(&chunk_dir).to_slash_string()
        } else {
          source.to_string()
        }
      })
    });

    let mut sourcemap_file_name = None;
    let mut sourcemap_asset = None;
    if let (Some(map), Some(sourcemap_type)) = (&map, self.options.sourcemap) {
      match sourcemap_type {
        SourceMapType::Inline => {
          code.push_str(&concat_string!("\n//# sourceMappingURL=", to_data_url(map)));
        }
        SourceMapType::File | SourceMapType::Hidden => {
          let map_file_name = concat_string!(file_name, ".map");
          if sourcemap_type == SourceMapType::File {
            let base_name = Path::new(&map_file_name)
              .file_name()
              .map(|name| name.to_string_lossy().into_owned())
              .unwrap_or_default();
            code.push_str(&concat_string!("\n//# sourceMappingURL=", base_name));
          }
          sourcemap_asset = Some(OutputAsset {
            name: None,
            file_name: map_file_name.as_str().into(),
            source: AssetSource::String(map.to_json_string()),
          });
          sourcemap_file_name = Some(map_file_name);
        }
      }
    }

    let output = OutputChunk {
      name: rendered_chunk.name,
      is_entry: rendered_chunk.is_entry,
      is_dynamic_entry: rendered_chunk.is_dynamic_entry,
      facade_module_id: rendered_chunk.facade_module_id,
      module_ids: rendered_chunk.module_ids,
      exports: rendered_chunk.exports,
      file_name,
      modules: rendered_modules.into_iter().collect(),
      imports: rendered_chunk.imports,
      dynamic_imports: rendered_chunk.dynamic_imports,
      code,
      map,
      sourcemap_file_name,
      preliminary_file_name: preliminary_filename.to_string(),
    };
    (output, sourcemap_asset)
  }
}
