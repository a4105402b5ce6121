use rollpack_common::RenderedChunk;
use rollpack_sourcemap::SourceMap;

#[derive(Debug, Clone, Copy)]
pub struct HookRenderChunkArgs<'a> {
  pub code: &'a str,
  pub chunk: &'a RenderedChunk,
}

#[derive(Debug, Default)]
pub struct HookRenderChunkOutput {
  pub code: String,
  pub map: Option<SourceMap>,
}
