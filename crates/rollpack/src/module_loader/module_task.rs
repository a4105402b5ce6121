use std::sync::Arc;

use arcstr::ArcStr;
use oxc_index::IndexVec;
use rollpack_common::{
  side_effects::DeterminedSideEffects, ImportKind, ImportRecordIdx, ModuleId, ModuleIdx,
  ModuleLoaderMsg, NormalModule, NormalModuleTaskResult, RawImportRecord, ResolvedId,
};
use rollpack_ecmascript::EcmaScanner;
use rollpack_error::{BuildDiagnostic, BuildResult};
use rollpack_plugin::ResolveRequest;
use rollpack_sourcemap::retarget_single_source;
use rollpack_utils::{
  indexmap::{FxIndexMap, FxIndexSet},
  path_ext::PathExt,
  sanitize_file_name::sanitize_file_name,
};
use rustc_hash::FxHashMap;
use sugar_path::SugarPath;

use super::{
  task_context::TaskContext,
  transform_cache::{CachedTransform, TransformCache},
};
use crate::utils::{
  convert_to_js::{convert_to_js, parse_error},
  load_source::{load_source, LoadedSource},
};

pub struct ModuleTaskOwner {
  importer_id: String,
}

impl ModuleTaskOwner {
  pub fn new(importer_id: String) -> Self {
    ModuleTaskOwner { importer_id }
  }
}

pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  idx: ModuleIdx,
  owner: Option<ModuleTaskOwner>,
  resolved_id: ResolvedId,
  is_user_defined_entry: bool,
}

impl ModuleTask {
  pub fn new(
    ctx: Arc<TaskContext>,
    idx: ModuleIdx,
    owner: Option<ModuleTaskOwner>,
    resolved_id: ResolvedId,
    is_user_defined_entry: bool,
  ) -> Self {
    Self { ctx, idx, owner, resolved_id, is_user_defined_entry }
  }

  pub async fn run(self) {
    let msg = match self.run_inner().await {
      Ok(result) => ModuleLoaderMsg::NormalModuleDone(Box::new(result)),
      Err(errs) => ModuleLoaderMsg::BuildErrors(errs.into_vec()),
    };
    // The loader only goes away when the build was cancelled.
    if self.ctx.tx.send(msg).await.is_err() {
      tracing::trace!(id = %self.resolved_id.id, "module loader is gone");
    }
  }

  async fn run_inner(&self) -> BuildResult<NormalModuleTaskResult> {
    let options = &self.ctx.options;
    let plugin_driver = &self.ctx.plugin_driver;
    let importer = self.owner.as_ref().map(|owner| owner.importer_id.as_str());

    let LoadedSource { code: original_source, map: load_map, module_type } =
      load_source(plugin_driver, &*self.ctx.fs, &self.resolved_id, importer).await?;

    let id = ModuleId::new(self.resolved_id.id.clone());
    let stable_id = id.stabilize(&options.cwd);
    let mut warnings = vec![];
    let mut sourcemap_chain = vec![];
    let has_load_map = load_map.is_some();
    if options.sourcemap_enabled() {
      sourcemap_chain.extend(load_map);
    }

    let source_hash = TransformCache::source_hash(&original_source);
    let transformed = match self.ctx.transform_cache.get(&id, source_hash) {
      Some(cached) => {
        tracing::trace!(id = %stable_id, "transform cache hit");
        for asset in &cached.emitted_assets {
          plugin_driver
            .file_emitter()
            .emit_asset(asset.clone())
            .map_err(|err| BuildDiagnostic::load_error(&stable_id, importer, err))?;
        }
        warnings.extend(cached.warnings.iter().cloned());
        sourcemap_chain.extend(cached.sourcemap_chain.iter().cloned());
        cached.code.clone()
      }
      None => {
        let mut transform_chain = vec![];
        let mut transform_warnings = vec![];
        let outcome = plugin_driver
          .transform(
            id.inner(),
            original_source.clone(),
            &module_type,
            &mut transform_chain,
            &mut transform_warnings,
          )
          .await?;
        warnings.extend(transform_warnings.iter().cloned());
        sourcemap_chain.extend(transform_chain.iter().cloned());
        self.ctx.transform_cache.insert(
          id.inner().clone(),
          source_hash,
          CachedTransform {
            code: outcome.code.clone(),
            sourcemap_chain: transform_chain,
            emitted_assets: outcome.emitted_assets,
            warnings: transform_warnings,
          },
        );
        outcome.code
      }
    };

    let (code, conversion_map) = convert_to_js(&id, &stable_id, transformed, module_type)?;
    if options.sourcemap_enabled() {
      sourcemap_chain.extend(conversion_map);
      if !has_load_map {
        if let Some(first) = sourcemap_chain.first_mut() {
          *first = retarget_single_source(first, &id, &original_source);
        }
      }
    }

    let scan = EcmaScanner::scan(&code).map_err(|errors| parse_error(&stable_id, &code, &errors))?;
    let raw_import_records =
      scan.import_records.iter().map(RawImportRecord::from).collect::<IndexVec<_, _>>();

    let resolved_deps = self.resolve_dependencies(&raw_import_records).await?;

    let mut imported_ids = FxIndexSet::default();
    let mut dynamically_imported_ids = FxIndexSet::default();
    for (record, resolved) in raw_import_records.iter().zip(&resolved_deps) {
      match record.kind {
        ImportKind::Import => imported_ids.insert(ModuleId::new(resolved.id.clone())),
        ImportKind::DynamicImport => {
          dynamically_imported_ids.insert(ModuleId::new(resolved.id.clone()))
        }
      };
    }

    let side_effects = if options.treeshake.enabled {
      self
        .resolved_id
        .side_effects
        .unwrap_or(DeterminedSideEffects::Default(options.treeshake.module_side_effects))
    } else {
      DeterminedSideEffects::NoTreeshake
    };

    let repr_name = sanitize_file_name(&self.resolved_id.path().as_path().representative_file_name());

    let module = NormalModule {
      exec_order: u32::MAX,
      idx: self.idx,
      is_user_defined_entry: self.is_user_defined_entry,
      id,
      stable_id,
      repr_name,
      module_type,
      original_source: original_source.into(),
      source: ArcStr::from(code),
      sourcemap_chain,
      scan,
      import_records: IndexVec::default(),
      side_effects,
      importers: FxIndexSet::default(),
      dynamic_importers: FxIndexSet::default(),
      imported_ids,
      dynamically_imported_ids,
      resolved_exports: vec![],
      is_included: false,
    };

    let module_info = Arc::new(module.to_module_info());
    plugin_driver.module_infos().insert(module.id.inner().clone(), Arc::clone(&module_info));
    plugin_driver.module_parsed(module_info).await?;

    Ok(NormalModuleTaskResult { module, resolved_deps, raw_import_records, warnings })
  }

  /// Resolves every distinct specifier once, concurrently. A specifier imported both statically
  /// and dynamically is asked for as a static import. All failures are reported, not just the
  /// first one.
  async fn resolve_dependencies(
    &self,
    records: &IndexVec<ImportRecordIdx, RawImportRecord>,
  ) -> BuildResult<IndexVec<ImportRecordIdx, ResolvedId>> {
    let plugin_driver = &self.ctx.plugin_driver;
    let importer = self.resolved_id.id.as_str();

    let mut requests = FxIndexMap::<&str, ImportKind>::default();
    for record in records.iter() {
      let kind = requests.entry(record.specifier.as_str()).or_insert(record.kind);
      if record.kind.is_static() {
        *kind = ImportKind::Import;
      }
    }

    let results = futures::future::join_all(requests.iter().map(|(specifier, kind)| async move {
      plugin_driver
        .resolve_id(&ResolveRequest { importer: Some(importer), specifier: *specifier, kind: *kind, skip: None })
        .await
    }))
    .await;

    let mut resolved_by_specifier = FxHashMap::default();
    let mut errors = vec![];
    for ((specifier, _), result) in requests.iter().zip(results) {
      match result {
        Ok(resolved_id) => {
          resolved_by_specifier.insert(*specifier, resolved_id);
        }
        Err(err) => errors.push(err),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    Ok(
      records
        .iter()
        .filter_map(|record| resolved_by_specifier.get(record.specifier.as_str()).cloned())
        .collect(),
    )
  }
}
