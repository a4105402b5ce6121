pub mod external_module;
pub mod normal_module;

use oxc_index::IndexVec;

use crate::{
  side_effects::DeterminedSideEffects, ExternalModule, ImportRecordIdx, ModuleIdx, ModuleInfo,
  NormalModule, ResolvedImportRecord,
};

#[derive(Debug)]
pub enum Module {
  Normal(Box<NormalModule>),
  External(Box<ExternalModule>),
}

impl Module {
  pub fn idx(&self) -> ModuleIdx {
    match self {
      Self::Normal(v) => v.idx,
      Self::External(v) => v.idx,
    }
  }

  pub fn exec_order(&self) -> u32 {
    match self {
      Self::Normal(v) => v.exec_order,
      Self::External(v) => v.exec_order,
    }
  }

  pub fn set_exec_order(&mut self, exec_order: u32) {
    match self {
      Self::Normal(v) => v.exec_order = exec_order,
      Self::External(v) => v.exec_order = exec_order,
    }
  }

  pub fn id(&self) -> &str {
    match self {
      Self::Normal(v) => &v.id,
      Self::External(v) => &v.name,
    }
  }

  pub fn side_effects(&self) -> &DeterminedSideEffects {
    match self {
      Self::Normal(v) => &v.side_effects,
      Self::External(v) => &v.side_effects,
    }
  }

  pub fn stable_id(&self) -> &str {
    match self {
      Self::Normal(v) => &v.stable_id,
      Self::External(v) => &v.name,
    }
  }

  pub fn is_included(&self) -> bool {
    match self {
      Self::Normal(v) => v.is_included,
      Self::External(v) => v.is_included,
    }
  }

  pub fn set_included(&mut self, value: bool) {
    match self {
      Self::Normal(v) => v.is_included = value,
      Self::External(v) => v.is_included = value,
    }
  }

  pub fn as_normal(&self) -> Option<&NormalModule> {
    match self {
      Self::Normal(v) => Some(v),
      Self::External(_) => None,
    }
  }

  pub fn import_records(&self) -> &IndexVec<ImportRecordIdx, ResolvedImportRecord> {
    match self {
      Self::Normal(v) => &v.import_records,
      Self::External(v) => &v.import_records,
    }
  }

  pub fn to_module_info(&self) -> ModuleInfo {
    match self {
      Self::Normal(v) => v.to_module_info(),
      Self::External(v) => v.to_module_info(),
    }
  }

  pub fn is_normal(&self) -> bool {
    matches!(self, Self::Normal(..))
  }

  pub fn is_external(&self) -> bool {
    matches!(self, Self::External(..))
  }
}

impl From<NormalModule> for Module {
  fn from(module: NormalModule) -> Self {
    Self::Normal(Box::new(module))
  }
}

impl From<ExternalModule> for Module {
  fn from(module: ExternalModule) -> Self {
    Self::External(Box::new(module))
  }
}
