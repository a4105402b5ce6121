use std::{any::Any, borrow::Cow, fmt::Debug, future::Future, sync::Arc};

use rollpack_common::{ModuleInfo, RenderedChunk};
use rollpack_utils::pretty_type_name::pretty_type_name;

use crate::{
  types::{
    hook_build_end_args::HookBuildEndArgs,
    hook_generate_bundle_args::HookGenerateBundleArgs,
    hook_load::{HookLoadArgs, HookLoadOutput},
    hook_render_chunk::{HookRenderChunkArgs, HookRenderChunkOutput},
    hook_resolve_id::{HookResolveIdArgs, HookResolveIdOutput},
    hook_transform::{HookTransformArgs, HookTransformOutput},
    hook_usage::HookUsage,
  },
  PluginContext, TransformPluginContext,
};

pub type HookResult<T> = anyhow::Result<T>;
pub type HookNoopReturn = HookResult<()>;
pub type HookResolveIdReturn = HookResult<Option<HookResolveIdOutput>>;
pub type HookLoadReturn = HookResult<Option<HookLoadOutput>>;
pub type HookTransformReturn = HookResult<Option<HookTransformOutput>>;
pub type HookRenderChunkReturn = HookResult<Option<HookRenderChunkOutput>>;
pub type HookAugmentChunkHashReturn = HookResult<Option<String>>;

/// A bundler plugin. Every hook has a no-op default, so implementors only write the hooks they
/// need and should declare them in `register_hook_usage` so the driver can skip the rest.
pub trait Plugin: Any + Debug + Send + Sync + 'static {
  /// Shown in diagnostics and logs. Defaults to the type name.
  fn name(&self) -> Cow<'static, str> {
    pretty_type_name::<Self>()
  }

  // --- Build hooks ---

  fn build_start(&self, _ctx: &PluginContext) -> impl Future<Output = HookNoopReturn> + Send {
    async { Ok(()) }
  }

  /// The first plugin returning `Some` claims the specifier.
  fn resolve_id(
    &self,
    _ctx: &PluginContext,
    _args: &HookResolveIdArgs<'_>,
  ) -> impl Future<Output = HookResolveIdReturn> + Send {
    async { Ok(None) }
  }

  /// Tried before `resolve_id` for `import(..)` specifiers.
  fn resolve_dynamic_import(
    &self,
    _ctx: &PluginContext,
    _args: &HookResolveIdArgs<'_>,
  ) -> impl Future<Output = HookResolveIdReturn> + Send {
    async { Ok(None) }
  }

  fn load(
    &self,
    _ctx: &PluginContext,
    _args: &HookLoadArgs<'_>,
  ) -> impl Future<Output = HookLoadReturn> + Send {
    async { Ok(None) }
  }

  fn transform(
    &self,
    _ctx: &TransformPluginContext,
    _args: &HookTransformArgs<'_>,
  ) -> impl Future<Output = HookTransformReturn> + Send {
    async { Ok(None) }
  }

  fn module_parsed(
    &self,
    _ctx: &PluginContext,
    _module_info: Arc<ModuleInfo>,
  ) -> impl Future<Output = HookNoopReturn> + Send {
    async { Ok(()) }
  }

  fn build_end(
    &self,
    _ctx: &PluginContext,
    _args: Option<&HookBuildEndArgs<'_>>,
  ) -> impl Future<Output = HookNoopReturn> + Send {
    async { Ok(()) }
  }

  // --- Generate hooks ---

  fn render_start(&self, _ctx: &PluginContext) -> impl Future<Output = HookNoopReturn> + Send {
    async { Ok(()) }
  }

  fn render_chunk(
    &self,
    _ctx: &PluginContext,
    _args: &HookRenderChunkArgs<'_>,
  ) -> impl Future<Output = HookRenderChunkReturn> + Send {
    async { Ok(None) }
  }

  fn augment_chunk_hash(
    &self,
    _ctx: &PluginContext,
    _chunk: &RenderedChunk,
  ) -> impl Future<Output = HookAugmentChunkHashReturn> + Send {
    async { Ok(None) }
  }

  fn generate_bundle(
    &self,
    _ctx: &PluginContext,
    _args: &mut HookGenerateBundleArgs<'_>,
  ) -> impl Future<Output = HookNoopReturn> + Send {
    async { Ok(()) }
  }

  fn write_bundle(
    &self,
    _ctx: &PluginContext,
    _args: &mut HookGenerateBundleArgs<'_>,
  ) -> impl Future<Output = HookNoopReturn> + Send {
    async { Ok(()) }
  }

  fn register_hook_usage(&self) -> HookUsage {
    HookUsage::all()
  }
}
