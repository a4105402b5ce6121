use arcstr::ArcStr;
use itertools::Itertools;
use oxc_index::IndexVec;
use rollpack_ecmascript::ScanResult;
use rollpack_sourcemap::SourceMap;
use rollpack_utils::indexmap::FxIndexSet;

use crate::{
  side_effects::DeterminedSideEffects, ImportRecordIdx, ImportRecordMeta, ModuleId, ModuleIdx,
  ModuleInfo, ModuleType, ResolvedImportRecord,
};

#[derive(Debug)]
pub struct NormalModule {
  pub exec_order: u32,
  pub idx: ModuleIdx,
  pub is_user_defined_entry: bool,
  pub id: ModuleId,
  /// `stable_id` is calculated based on `id` to be stable across machine and os.
  pub stable_id: String,
  /// Used to derive chunk names.
  pub repr_name: String,
  pub module_type: ModuleType,
  /// What the load hook or the file system returned.
  pub original_source: ArcStr,
  /// JavaScript after every transform. This is what gets scanned and rendered.
  pub source: ArcStr,
  /// Maps of the transform stages, the first one maps to `original_source`.
  pub sourcemap_chain: Vec<SourceMap>,
  pub scan: ScanResult,
  pub import_records: IndexVec<ImportRecordIdx, ResolvedImportRecord>,
  pub side_effects: DeterminedSideEffects,
  pub importers: FxIndexSet<ModuleId>,
  pub dynamic_importers: FxIndexSet<ModuleId>,
  pub imported_ids: FxIndexSet<ModuleId>,
  pub dynamically_imported_ids: FxIndexSet<ModuleId>,
  /// Every name this module exports, `export *` included. Filled in by the link stage.
  pub resolved_exports: Vec<ArcStr>,
  pub is_included: bool,
}

impl NormalModule {
  pub fn star_export_module_ids(&self) -> impl Iterator<Item = ModuleIdx> + '_ {
    self
      .import_records
      .iter()
      .filter(|rec| rec.meta.contains(ImportRecordMeta::IS_EXPORT_STAR))
      .map(ResolvedImportRecord::resolved_module)
  }

  /// Names exported by the module itself, without `export *`.
  pub fn own_export_names(&self) -> impl Iterator<Item = &str> {
    self.scan.export_names()
  }

  // The module which id starts with `\0` shouldn't generate sourcemap. Ref see https://github.com/rollup/rollup/blob/master/src/Module.ts#L279.
  pub fn is_virtual(&self) -> bool {
    self.id.starts_with('\0')
  }

  pub fn to_module_info(&self) -> ModuleInfo {
    let exports = if self.resolved_exports.is_empty() {
      self.own_export_names().map(ArcStr::from).collect_vec()
    } else {
      self.resolved_exports.clone()
    };
    ModuleInfo {
      code: Some(self.source.clone()),
      id: self.id.clone(),
      is_entry: self.is_user_defined_entry,
      is_external: false,
      importers: {
        let mut value = self.importers.clone();
        value.sort_unstable();
        value
      },
      dynamic_importers: {
        let mut value = self.dynamic_importers.clone();
        value.sort_unstable();
        value
      },
      imported_ids: self.imported_ids.clone(),
      dynamically_imported_ids: self.dynamically_imported_ids.clone(),
      exports,
    }
  }
}
