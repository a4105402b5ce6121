pub(crate) mod build_hooks;
mod output_hooks;
mod resolve;

use std::sync::{Arc, Weak};

use oxc_index::IndexVec;
use rollpack_common::{
  FileEmitter, SharedFileEmitter, SharedModuleInfos, SharedNormalizedBundlerOptions,
};
use rollpack_error::{BuildDiagnostic, Diagnostics};
use rollpack_resolver::Resolver;

use crate::{
  plugin_context::PluginContextImpl,
  types::{hook_usage::HookUsage, plugin_idx::PluginIdx},
  PluginContext, ResolveCache, SharedPluginable,
};

pub use resolve::ResolveRequest;

pub type SharedPluginDriver = Arc<PluginDriver>;

/// The plugins of one build, frozen in registration order, plus everything their contexts share.
pub struct PluginDriver {
  plugins: IndexVec<PluginIdx, SharedPluginable>,
  contexts: IndexVec<PluginIdx, PluginContext>,
  hook_usages: IndexVec<PluginIdx, HookUsage>,
  resolver: Arc<Resolver>,
  resolve_cache: Arc<ResolveCache>,
  file_emitter: SharedFileEmitter,
  module_infos: SharedModuleInfos,
  options: SharedNormalizedBundlerOptions,
  diagnostics: Arc<Diagnostics>,
}

impl PluginDriver {
  pub fn new_shared(
    plugins: Vec<SharedPluginable>,
    resolver: Arc<Resolver>,
    resolve_cache: Arc<ResolveCache>,
    options: SharedNormalizedBundlerOptions,
    diagnostics: Arc<Diagnostics>,
  ) -> SharedPluginDriver {
    let file_emitter = Arc::new(FileEmitter::new(Arc::clone(&options)));
    let module_infos = SharedModuleInfos::default();

    Arc::new_cyclic(|driver| {
      let mut contexts = IndexVec::with_capacity(plugins.len());
      let mut hook_usages = IndexVec::with_capacity(plugins.len());
      for (idx, plugin) in plugins.iter().enumerate() {
        hook_usages.push(plugin.call_hook_usage());
        contexts.push(PluginContext::new(PluginContextImpl {
          plugin_idx: PluginIdx::from_usize(idx),
          plugin_name: plugin.call_name(),
          plugin_driver: Weak::clone(driver),
          file_emitter: Arc::clone(&file_emitter),
          module_infos: Arc::clone(&module_infos),
          options: Arc::clone(&options),
          diagnostics: Arc::clone(&diagnostics),
        }));
      }

      Self {
        plugins: IndexVec::from_vec(plugins),
        contexts,
        hook_usages,
        resolver,
        resolve_cache,
        file_emitter,
        module_infos,
        options,
        diagnostics,
      }
    })
  }

  pub fn file_emitter(&self) -> &SharedFileEmitter {
    &self.file_emitter
  }

  pub fn module_infos(&self) -> &SharedModuleInfos {
    &self.module_infos
  }

  pub fn options(&self) -> &SharedNormalizedBundlerOptions {
    &self.options
  }

  pub fn diagnostics(&self) -> &Arc<Diagnostics> {
    &self.diagnostics
  }

  /// Plugins implementing `hook`, in registration order.
  fn plugins_with(
    &self,
    hook: HookUsage,
  ) -> impl Iterator<Item = (PluginIdx, &SharedPluginable, &PluginContext)> {
    self
      .plugins
      .iter_enumerated()
      .filter(move |(idx, _)| self.hook_usages[*idx].contains(hook))
      .map(|(idx, plugin)| (idx, plugin, &self.contexts[idx]))
  }

  fn hook_error(&self, idx: PluginIdx, hook: HookUsage, error: anyhow::Error) -> BuildDiagnostic {
    BuildDiagnostic::plugin_error(
      idx.index(),
      &self.plugins[idx].call_name(),
      hook.hook_name(),
      error,
    )
  }
}
