use arcstr::ArcStr;
use oxc_index::IndexVec;
use rollpack_utils::indexmap::FxIndexSet;

use crate::side_effects::DeterminedSideEffects;
use crate::{ImportRecordIdx, ModuleId, ModuleIdx, ModuleInfo, ResolvedImportRecord};

#[derive(Debug)]
pub struct ExternalModule {
  pub idx: ModuleIdx,
  pub name: ArcStr,
  pub exec_order: u32,
  /// Externals have no records; kept so `Module::import_records` needs no special case.
  pub import_records: IndexVec<ImportRecordIdx, ResolvedImportRecord>,
  pub side_effects: DeterminedSideEffects,
  pub importers: FxIndexSet<ModuleId>,
  pub dynamic_importers: FxIndexSet<ModuleId>,
  pub is_included: bool,
}

impl ExternalModule {
  pub fn new(idx: ModuleIdx, name: ArcStr) -> Self {
    Self {
      idx,
      name,
      exec_order: u32::MAX,
      import_records: IndexVec::default(),
      side_effects: DeterminedSideEffects::NoTreeshake,
      importers: FxIndexSet::default(),
      dynamic_importers: FxIndexSet::default(),
      is_included: false,
    }
  }

  pub fn to_module_info(&self) -> ModuleInfo {
    ModuleInfo {
      id: ModuleId::new(self.name.clone()),
      is_entry: false,
      is_external: true,
      code: None,
      importers: self.importers.clone(),
      dynamic_importers: self.dynamic_importers.clone(),
      imported_ids: FxIndexSet::default(),
      dynamically_imported_ids: FxIndexSet::default(),
      exports: Vec::new(),
    }
  }
}
