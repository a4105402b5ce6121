use std::{any::Any, borrow::Cow, fmt::Debug, sync::Arc};

use rollpack_common::{ModuleInfo, RenderedChunk};

use crate::{
  plugin::{
    HookAugmentChunkHashReturn, HookLoadReturn, HookNoopReturn, HookRenderChunkReturn,
    HookResolveIdReturn, HookTransformReturn,
  },
  types::{
    hook_build_end_args::HookBuildEndArgs, hook_generate_bundle_args::HookGenerateBundleArgs,
    hook_load::HookLoadArgs, hook_render_chunk::HookRenderChunkArgs,
    hook_resolve_id::HookResolveIdArgs, hook_transform::HookTransformArgs, hook_usage::HookUsage,
  },
  Plugin, PluginContext, TransformPluginContext,
};

pub type SharedPluginable = Arc<dyn Pluginable>;

/// Object-safe mirror of [`Plugin`], implemented for every plugin so the driver can store
/// plugins of different types side by side.
#[async_trait::async_trait]
pub trait Pluginable: Any + Debug + Send + Sync + 'static {
  fn call_name(&self) -> Cow<'static, str>;

  async fn call_build_start(&self, ctx: &PluginContext) -> HookNoopReturn;

  async fn call_resolve_id(
    &self,
    ctx: &PluginContext,
    args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn;

  async fn call_resolve_dynamic_import(
    &self,
    ctx: &PluginContext,
    args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn;

  async fn call_load(&self, ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn;

  async fn call_transform(
    &self,
    ctx: &TransformPluginContext,
    args: &HookTransformArgs<'_>,
  ) -> HookTransformReturn;

  async fn call_module_parsed(
    &self,
    ctx: &PluginContext,
    module_info: Arc<ModuleInfo>,
  ) -> HookNoopReturn;

  async fn call_build_end(
    &self,
    ctx: &PluginContext,
    args: Option<&HookBuildEndArgs<'_>>,
  ) -> HookNoopReturn;

  async fn call_render_start(&self, ctx: &PluginContext) -> HookNoopReturn;

  async fn call_render_chunk(
    &self,
    ctx: &PluginContext,
    args: &HookRenderChunkArgs<'_>,
  ) -> HookRenderChunkReturn;

  async fn call_augment_chunk_hash(
    &self,
    ctx: &PluginContext,
    chunk: &RenderedChunk,
  ) -> HookAugmentChunkHashReturn;

  async fn call_generate_bundle(
    &self,
    ctx: &PluginContext,
    args: &mut HookGenerateBundleArgs<'_>,
  ) -> HookNoopReturn;

  async fn call_write_bundle(
    &self,
    ctx: &PluginContext,
    args: &mut HookGenerateBundleArgs<'_>,
  ) -> HookNoopReturn;

  fn call_hook_usage(&self) -> HookUsage;
}

#[async_trait::async_trait]
impl<T: Plugin> Pluginable for T {
  fn call_name(&self) -> Cow<'static, str> {
    Plugin::name(self)
  }

  async fn call_build_start(&self, ctx: &PluginContext) -> HookNoopReturn {
    Plugin::build_start(self, ctx).await
  }

  async fn call_resolve_id(
    &self,
    ctx: &PluginContext,
    args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn {
    Plugin::resolve_id(self, ctx, args).await
  }

  async fn call_resolve_dynamic_import(
    &self,
    ctx: &PluginContext,
    args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn {
    Plugin::resolve_dynamic_import(self, ctx, args).await
  }

  async fn call_load(&self, ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    Plugin::load(self, ctx, args).await
  }

  async fn call_transform(
    &self,
    ctx: &TransformPluginContext,
    args: &HookTransformArgs<'_>,
  ) -> HookTransformReturn {
    Plugin::transform(self, ctx, args).await
  }

  async fn call_module_parsed(
    &self,
    ctx: &PluginContext,
    module_info: Arc<ModuleInfo>,
  ) -> HookNoopReturn {
    Plugin::module_parsed(self, ctx, module_info).await
  }

  async fn call_build_end(
    &self,
    ctx: &PluginContext,
    args: Option<&HookBuildEndArgs<'_>>,
  ) -> HookNoopReturn {
    Plugin::build_end(self, ctx, args).await
  }

  async fn call_render_start(&self, ctx: &PluginContext) -> HookNoopReturn {
    Plugin::render_start(self, ctx).await
  }

  async fn call_render_chunk(
    &self,
    ctx: &PluginContext,
    args: &HookRenderChunkArgs<'_>,
  ) -> HookRenderChunkReturn {
    Plugin::render_chunk(self, ctx, args).await
  }

  async fn call_augment_chunk_hash(
    &self,
    ctx: &PluginContext,
    chunk: &RenderedChunk,
  ) -> HookAugmentChunkHashReturn {
    Plugin::augment_chunk_hash(self, ctx, chunk).await
  }

  async fn call_generate_bundle(
    &self,
    ctx: &PluginContext,
    args: &mut HookGenerateBundleArgs<'_>,
  ) -> HookNoopReturn {
    Plugin::generate_bundle(self, ctx, args).await
  }

  async fn call_write_bundle(
    &self,
    ctx: &PluginContext,
    args: &mut HookGenerateBundleArgs<'_>,
  ) -> HookNoopReturn {
    Plugin::write_bundle(self, ctx, args).await
  }

  fn call_hook_usage(&self) -> HookUsage {
    Plugin::register_hook_usage(self)
  }
}
