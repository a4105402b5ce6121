mod transform_plugin_context;

use std::{
  borrow::Cow,
  path::PathBuf,
  sync::{Arc, Weak},
};

use arcstr::ArcStr;
use rollpack_common::{
  EmittedAsset, ImportKind, ModuleInfo, ResolvedId, SharedFileEmitter, SharedModuleInfos,
  SharedNormalizedBundlerOptions,
};
use rollpack_error::{BuildDiagnostic, Diagnostics, Severity};

use crate::{plugin_driver::ResolveRequest, types::plugin_idx::PluginIdx, PluginDriver};

pub use transform_plugin_context::TransformPluginContext;

#[derive(Debug, Clone, Copy)]
pub struct PluginContextResolveOptions {
  pub kind: ImportKind,
  /// Skip the calling plugin's own `resolve_id`. Resolving the specifier the hook is currently
  /// resolving without skipping it waits on itself.
  pub skip_self: bool,
}

impl Default for PluginContextResolveOptions {
  fn default() -> Self {
    Self { kind: ImportKind::Import, skip_self: true }
  }
}

pub(crate) struct PluginContextImpl {
  pub(crate) plugin_idx: PluginIdx,
  pub(crate) plugin_name: Cow<'static, str>,
  pub(crate) plugin_driver: Weak<PluginDriver>,
  pub(crate) file_emitter: SharedFileEmitter,
  pub(crate) module_infos: SharedModuleInfos,
  pub(crate) options: SharedNormalizedBundlerOptions,
  pub(crate) diagnostics: Arc<Diagnostics>,
}

/// Handed to every hook call. Cloning is cheap.
#[derive(Clone)]
pub struct PluginContext(Arc<PluginContextImpl>);

impl PluginContext {
  pub(crate) fn new(inner: PluginContextImpl) -> Self {
    Self(Arc::new(inner))
  }

  /// Resolves `specifier` the same way an import of `importer` would, sharing the memoized
  /// results of the build. Without an importer it resolves like an entry.
  pub async fn resolve(
    &self,
    specifier: &str,
    importer: Option<&str>,
    options: Option<PluginContextResolveOptions>,
  ) -> anyhow::Result<ResolvedId> {
    let driver = self
      .0
      .plugin_driver
      .upgrade()
      .ok_or_else(|| anyhow::anyhow!("The plugin driver was dropped before `resolve` was called"))?;
    let options = options.unwrap_or_default();
    let request = ResolveRequest {
      importer,
      specifier,
      kind: options.kind,
      skip: options.skip_self.then_some(self.0.plugin_idx),
    };
    Ok(driver.resolve_id(&request).await?)
  }

  pub fn emit_asset(&self, asset: EmittedAsset) -> anyhow::Result<ArcStr> {
    self.0.file_emitter.emit_asset(asset)
  }

  pub fn get_file_name(&self, reference_id: &str) -> anyhow::Result<ArcStr> {
    self.0.file_emitter.get_file_name(reference_id)
  }

  pub fn log(&self, severity: Severity, message: impl Into<String>) {
    self.0.diagnostics.push(BuildDiagnostic::plugin_log(
      severity,
      self.0.plugin_idx.index(),
      &self.0.plugin_name,
      message,
    ));
  }

  pub fn debug(&self, message: impl Into<String>) {
    self.log(Severity::Debug, message);
  }

  pub fn info(&self, message: impl Into<String>) {
    self.log(Severity::Info, message);
  }

  pub fn warn(&self, message: impl Into<String>) {
    self.log(Severity::Warning, message);
  }

  pub fn get_module_info(&self, module_id: &str) -> Option<Arc<ModuleInfo>> {
    self.0.module_infos.get(module_id).map(|info| Arc::clone(info.value()))
  }

  /// Ids of the modules parsed so far, sorted.
  pub fn get_module_ids(&self) -> Vec<ArcStr> {
    let mut ids = self.0.module_infos.iter().map(|info| info.key().clone()).collect::<Vec<_>>();
    ids.sort_unstable();
    ids
  }

  pub fn cwd(&self) -> &PathBuf {
    &self.0.options.cwd
  }

  pub fn plugin_name(&self) -> &str {
    &self.0.plugin_name
  }
}

impl std::fmt::Debug for PluginContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PluginContext")
      .field("plugin_idx", &self.0.plugin_idx)
      .field("plugin_name", &self.0.plugin_name)
      .finish_non_exhaustive()
  }
}
