mod bridge_plugin;
mod plugin;
mod plugin_context;
mod plugin_driver;
mod plugin_registry;
mod pluginable;
mod resolve_cache;
mod types;

pub use crate::{
  bridge_plugin::{BridgePlugin, HostCall},
  plugin::{
    HookAugmentChunkHashReturn, HookLoadReturn, HookNoopReturn, HookRenderChunkReturn,
    HookResolveIdReturn, HookResult, HookTransformReturn, Plugin,
  },
  plugin_context::{PluginContext, PluginContextResolveOptions, TransformPluginContext},
  plugin_driver::{
    build_hooks::TransformOutcome, PluginDriver, ResolveRequest, SharedPluginDriver,
  },
  plugin_registry::PluginRegistry,
  pluginable::{Pluginable, SharedPluginable},
  resolve_cache::ResolveCache,
  types::{
    hook_build_end_args::HookBuildEndArgs,
    hook_generate_bundle_args::HookGenerateBundleArgs,
    hook_load::{HookLoadArgs, HookLoadOutput},
    hook_render_chunk::{HookRenderChunkArgs, HookRenderChunkOutput},
    hook_resolve_id::{HookResolveIdArgs, HookResolveIdOutput},
    hook_transform::{HookTransformArgs, HookTransformOutput},
    hook_usage::HookUsage,
    plugin_idx::PluginIdx,
  },
};
