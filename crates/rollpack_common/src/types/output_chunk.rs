use arcstr::ArcStr;
use rollpack_sourcemap::SourceMap;

use crate::{ModuleId, RenderedModule};

#[derive(Debug, Clone)]
pub struct OutputChunk {
  // PreRenderedChunk
  pub name: ArcStr,
  pub is_entry: bool,
  pub is_dynamic_entry: bool,
  pub facade_module_id: Option<ModuleId>,
  pub module_ids: Vec<ModuleId>,
  pub exports: Vec<String>,

  // RenderedChunk
  pub file_name: ArcStr,
  pub modules: Modules,
  pub imports: Vec<ArcStr>,
  pub dynamic_imports: Vec<ArcStr>,

  // OutputChunk
  pub code: String,
  pub map: Option<SourceMap>,
  pub sourcemap_file_name: Option<String>,
  pub preliminary_file_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Modules {
  pub keys: Vec<ModuleId>,
  pub values: Vec<RenderedModule>,
}

impl Modules {
  pub fn get(&self, id: &str) -> Option<&RenderedModule> {
    self.keys.iter().position(|key| &**key == id).map(|idx| &self.values[idx])
  }
}

impl FromIterator<(ModuleId, RenderedModule)> for Modules {
  fn from_iter<T: IntoIterator<Item = (ModuleId, RenderedModule)>>(iter: T) -> Self {
    let mut kvs = iter.into_iter().collect::<Vec<_>>();
    kvs.sort_by(|a, b| a.1.exec_order.cmp(&b.1.exec_order));

    let mut keys = Vec::with_capacity(kvs.len());
    let mut values = Vec::with_capacity(kvs.len());
    for (k, v) in kvs {
      keys.push(k);
      values.push(v);
    }

    Self { keys, values }
  }
}
