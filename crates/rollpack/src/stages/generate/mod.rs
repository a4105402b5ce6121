mod code_splitting;
mod compute_cross_chunk_links;
mod generate_chunk_name_and_preliminary_filenames;
mod render_chunk;
mod render_chunk_to_assets;

use std::hash::Hash;

use rollpack_common::Output;
use rollpack_error::BuildResult;
use rollpack_plugin::SharedPluginDriver;
use rollpack_utils::xxhash::xxhash_with_base;
use xxhash_rust::xxh3::Xxh3;

use crate::{graph::ChunkGraph, types::SharedOptions};

use super::link::LinkStageOutput;

pub struct GenerateStage<'a> {
  link_output: &'a LinkStageOutput,
  options: &'a SharedOptions,
  plugin_driver: &'a SharedPluginDriver,
  /// Names the module registry every chunk of this build shares at runtime.
  build_key: String,
}

impl<'a> GenerateStage<'a> {
  pub fn new(
    link_output: &'a LinkStageOutput,
    options: &'a SharedOptions,
    plugin_driver: &'a SharedPluginDriver,
  ) -> Self {
    let build_key = compute_build_key(link_output);
    Self { link_output, options, plugin_driver, build_key }
  }

  /// Splits the linked modules into chunks and gives every chunk its preliminary file name.
  pub fn generate_chunk_graph(&self) -> BuildResult<ChunkGraph> {
    let mut chunk_graph = self.generate_chunks();
    self.compute_cross_chunk_links(&mut chunk_graph);
    self.generate_chunk_name_and_preliminary_filenames(&mut chunk_graph)?;
    Ok(chunk_graph)
  }

  /// Chunks in chunk order followed by their sourcemap files. Emitted assets are added when the
  /// output is assembled.
  pub async fn render(&self, chunk_graph: &ChunkGraph) -> BuildResult<Vec<Output>> {
    self.render_chunk_to_assets(chunk_graph).await
  }
}

/// Covers the id and source of every module in execution order, so builds of different code never
/// share factories when their chunks end up in the same realm.
fn compute_build_key(link_output: &LinkStageOutput) -> String {
  let mut hasher = Xxh3::default();
  let modules =
    link_output.sorted_modules.iter().filter_map(|idx| link_output.module_table[*idx].as_normal());
  for module in modules {
    module.stable_id.hash(&mut hasher);
    module.source.as_bytes().hash(&mut hasher);
  }
  xxhash_with_base(&hasher.digest128().to_le_bytes(), 64)
}
