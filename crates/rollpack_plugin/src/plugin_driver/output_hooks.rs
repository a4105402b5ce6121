use rollpack_common::{Output, RenderedChunk};
use rollpack_error::BuildDiagnostic;
use rollpack_sourcemap::{line_identity_map, SourceMap};

use crate::{
  types::{
    hook_generate_bundle_args::HookGenerateBundleArgs, hook_render_chunk::HookRenderChunkArgs,
    hook_usage::HookUsage,
  },
  PluginDriver,
};

impl PluginDriver {
  pub async fn render_start(&self) -> Result<(), BuildDiagnostic> {
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::RENDER_START) {
      plugin
        .call_render_start(ctx)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::RENDER_START, err))?;
    }
    Ok(())
  }

  /// Chains `render_chunk` the way `transform` is chained. Maps go onto `sourcemap_chain`.
  pub async fn render_chunk(
    &self,
    chunk: &RenderedChunk,
    mut code: String,
    sourcemap_chain: &mut Vec<SourceMap>,
  ) -> Result<String, BuildDiagnostic> {
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::RENDER_CHUNK) {
      let Some(output) = plugin
        .call_render_chunk(ctx, &HookRenderChunkArgs { code: &code, chunk })
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::RENDER_CHUNK, err))?
      else {
        continue;
      };

      match output.map {
        Some(map) => sourcemap_chain.push(map),
        None if output.code != code && self.options.sourcemap_enabled() => {
          self.diagnostics.push(BuildDiagnostic::sourcemap_broken(
            &chunk.file_name,
            &plugin.call_name(),
            "render_chunk",
          ));
          sourcemap_chain.push(line_identity_map(&chunk.file_name, &code, &output.code));
        }
        None => {}
      }
      code = output.code;
    }
    Ok(code)
  }

  /// Concatenation of every plugin's contribution, `None` when no plugin contributed.
  pub async fn augment_chunk_hash(
    &self,
    chunk: &RenderedChunk,
  ) -> Result<Option<String>, BuildDiagnostic> {
    let mut augmented: Option<String> = None;
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::AUGMENT_CHUNK_HASH) {
      if let Some(hash) = plugin
        .call_augment_chunk_hash(ctx, chunk)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::AUGMENT_CHUNK_HASH, err))?
      {
        augmented.get_or_insert_with(String::new).push_str(&hash);
      }
    }
    Ok(augmented)
  }

  pub async fn generate_bundle(
    &self,
    bundle: &mut Vec<Output>,
    is_write: bool,
  ) -> Result<(), BuildDiagnostic> {
    let mut args = HookGenerateBundleArgs { is_write, bundle };
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::GENERATE_BUNDLE) {
      plugin
        .call_generate_bundle(ctx, &mut args)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::GENERATE_BUNDLE, err))?;
    }
    Ok(())
  }

  pub async fn write_bundle(&self, bundle: &mut Vec<Output>) -> Result<(), BuildDiagnostic> {
    let mut args = HookGenerateBundleArgs { is_write: true, bundle };
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::WRITE_BUNDLE) {
      plugin
        .call_write_bundle(ctx, &mut args)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::WRITE_BUNDLE, err))?;
    }
    Ok(())
  }
}
