use arcstr::ArcStr;

use crate::ModuleId;

/// Chunk facts available before the final file names are known. `file_name`, `imports` and
/// `dynamic_imports` still contain hash placeholders.
#[derive(Debug, Clone)]
pub struct RenderedChunk {
  pub name: ArcStr,
  pub file_name: ArcStr,
  pub is_entry: bool,
  pub is_dynamic_entry: bool,
  pub facade_module_id: Option<ModuleId>,
  pub module_ids: Vec<ModuleId>,
  pub exports: Vec<String>,
  pub imports: Vec<ArcStr>,
  pub dynamic_imports: Vec<ArcStr>,
}
