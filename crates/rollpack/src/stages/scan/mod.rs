use std::sync::Arc;

use arcstr::ArcStr;
use rollpack_common::{ImportKind, ResolvedId};
use rollpack_error::{BuildDiagnostic, BuildResult};
use rollpack_fs::SharedFileSystem;
use rollpack_plugin::{ResolveRequest, SharedPluginDriver};

use crate::{
  module_loader::{transform_cache::TransformCache, ModuleLoader, ModuleLoaderOutput},
  types::SharedOptions,
};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  fs: SharedFileSystem,
  options: SharedOptions,
  plugin_driver: SharedPluginDriver,
  transform_cache: Arc<TransformCache>,
}

impl ScanStage {
  pub fn new(
    fs: SharedFileSystem,
    options: SharedOptions,
    plugin_driver: SharedPluginDriver,
    transform_cache: Arc<TransformCache>,
  ) -> Self {
    Self { fs, options, plugin_driver, transform_cache }
  }

  /// Resolves every `input` item. An entry resolving to an external is an error.
  pub async fn resolve_user_defined_entries(&self) -> BuildResult<Vec<(Option<ArcStr>, ResolvedId)>> {
    let resolved = futures::future::join_all(self.options.input.iter().map(|input_item| async {
      let request = ResolveRequest {
        importer: None,
        specifier: &input_item.import,
        kind: ImportKind::Import,
        skip: None,
      };
      let resolved_id = self.plugin_driver.resolve_id(&request).await?;
      if resolved_id.is_external {
        return Err(BuildDiagnostic::unresolved_entry(&input_item.import));
      }
      Ok::<_, BuildDiagnostic>((input_item.name.as_deref().map(ArcStr::from), resolved_id))
    }))
    .await;

    let mut user_defined_entries = Vec::with_capacity(resolved.len());
    let mut errors = vec![];
    for result in resolved {
      match result {
        Ok(entry) => user_defined_entries.push(entry),
        Err(err) => errors.push(err),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    tracing::debug!(entries = user_defined_entries.len(), "entries resolved");
    Ok(user_defined_entries)
  }

  /// Loads the entries and everything they import.
  pub async fn scan(
    &self,
    user_defined_entries: Vec<(Option<ArcStr>, ResolvedId)>,
  ) -> BuildResult<ScanStageOutput> {
    let module_loader = ModuleLoader::new(
      Arc::clone(&self.fs),
      Arc::clone(&self.options),
      Arc::clone(&self.plugin_driver),
      Arc::clone(&self.transform_cache),
    );
    module_loader.fetch_all_modules(user_defined_entries).await
  }
}
