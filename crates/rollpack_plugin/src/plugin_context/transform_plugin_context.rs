use std::{
  ops::Deref,
  sync::{Arc, Mutex, PoisonError},
};

use arcstr::ArcStr;
use rollpack_common::EmittedAsset;

use crate::PluginContext;

/// Context of a `transform` call. Assets emitted through it are recorded so a cached transform
/// can emit them again.
#[derive(Debug, Clone)]
pub struct TransformPluginContext {
  inner: PluginContext,
  module_id: ArcStr,
  emitted: Arc<Mutex<Vec<EmittedAsset>>>,
}

impl TransformPluginContext {
  pub(crate) fn new(
    inner: PluginContext,
    module_id: ArcStr,
    emitted: Arc<Mutex<Vec<EmittedAsset>>>,
  ) -> Self {
    Self { inner, module_id, emitted }
  }

  pub fn module_id(&self) -> &ArcStr {
    &self.module_id
  }

  pub fn emit_asset(&self, asset: EmittedAsset) -> anyhow::Result<ArcStr> {
    let reference_id = self.inner.emit_asset(asset.clone())?;
    self.emitted.lock().unwrap_or_else(PoisonError::into_inner).push(asset);
    Ok(reference_id)
  }
}

impl Deref for TransformPluginContext {
  type Target = PluginContext;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}
