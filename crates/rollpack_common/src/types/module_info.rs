use std::sync::Arc;

use arcstr::ArcStr;
use dashmap::DashMap;
use rollpack_utils::indexmap::FxIndexSet;

use crate::ModuleId;

/// Read-only view of a module handed to plugins.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
  pub id: ModuleId,
  pub is_entry: bool,
  pub is_external: bool,
  /// Code after the transform hooks. `None` for externals.
  pub code: Option<ArcStr>,
  pub importers: FxIndexSet<ModuleId>,
  pub dynamic_importers: FxIndexSet<ModuleId>,
  pub imported_ids: FxIndexSet<ModuleId>,
  pub dynamically_imported_ids: FxIndexSet<ModuleId>,
  pub exports: Vec<ArcStr>,
}

pub type SharedModuleInfos = Arc<DashMap<ArcStr, Arc<ModuleInfo>>>;
