use arcstr::ArcStr;
use oxc_index::IndexVec;
use rollpack_common::{ImportRecordIdx, IndexModules, Module, ModuleIdx};
use rollpack_ecmascript::{ExportEntry, ImportedName};
use rollpack_error::BuildDiagnostic;
use rollpack_utils::indexmap::FxIndexSet;
use rustc_hash::FxHashSet;

use super::LinkStage;

impl LinkStage<'_> {
  pub(super) fn resolve_exports(&mut self) {
    let resolved = self
      .module_table
      .iter()
      .map(|module| match module {
        Module::Normal(module) if module.is_included => {
          resolve_exports_of(&self.module_table, module.idx)
        }
        _ => vec![],
      })
      .collect::<IndexVec<ModuleIdx, _>>();

    for (module, exports) in self.module_table.iter_mut().zip(resolved) {
      if let Module::Normal(module) = module {
        module.resolved_exports = exports;
      }
    }
  }

  /// Named imports and re-exports of names the importee does not export. Importees forwarding
  /// an external `export *` are skipped, their names are only known at runtime.
  pub(super) fn check_missing_exports(&mut self) {
    let mut warnings = vec![];
    for module in self.sorted_modules.iter().filter_map(|idx| self.module_table[*idx].as_normal()) {
      if !module.is_included {
        continue;
      }
      let bindings = module
        .scan
        .import_bindings
        .iter()
        .map(|binding| (binding.record, &binding.imported))
        .chain(module.scan.exports.iter().filter_map(|entry| match entry {
          ExportEntry::ReExport { record, imported, .. } => Some((*record, imported)),
          ExportEntry::Local { .. } => None,
        }));

      for (record, imported) in bindings {
        let ImportedName::Named(name) = imported else {
          continue;
        };
        let record = &module.import_records[ImportRecordIdx::from_usize(record)];
        if record.is_pruned() {
          continue;
        }
        let Some(importee) = self.module_table[record.resolved_module()].as_normal() else {
          continue;
        };
        if importee.resolved_exports.iter().any(|exported| exported == name.as_str())
          || !external_star_exports(&self.module_table, importee.idx).is_empty()
        {
          continue;
        }
        warnings.push(BuildDiagnostic::missing_export(&module.stable_id, &importee.stable_id, name));
      }
    }
    self.warnings.extend(warnings);
  }
}

/// Own exports first, then whatever `export *` adds. `default` is never forwarded by a star and
/// the first module providing a name wins.
fn resolve_exports_of(module_table: &IndexModules, idx: ModuleIdx) -> Vec<ArcStr> {
  fn visit(
    module_table: &IndexModules,
    idx: ModuleIdx,
    is_root: bool,
    visited: &mut FxHashSet<ModuleIdx>,
    names: &mut FxIndexSet<ArcStr>,
  ) {
    if !visited.insert(idx) {
      return;
    }
    let Some(module) = module_table[idx].as_normal() else {
      return;
    };
    for name in module.own_export_names() {
      if is_root || name != "default" {
        names.insert(name.into());
      }
    }
    for star in module.star_export_module_ids() {
      visit(module_table, star, false, visited, names);
    }
  }

  let mut names = FxIndexSet::default();
  visit(module_table, idx, true, &mut FxHashSet::default(), &mut names);
  names.into_iter().collect()
}

/// Externals reached through `export *` chains starting at `idx`, in discovery order.
pub fn external_star_exports(module_table: &IndexModules, idx: ModuleIdx) -> Vec<ModuleIdx> {
  let mut externals = vec![];
  let mut visited = FxHashSet::default();
  let mut stack = vec![idx];
  while let Some(idx) = stack.pop() {
    if !visited.insert(idx) {
      continue;
    }
    match &module_table[idx] {
      Module::Normal(module) => {
        let stars = module.star_export_module_ids().collect::<Vec<_>>();
        stack.extend(stars.into_iter().rev());
      }
      Module::External(_) => externals.push(idx),
    }
  }
  externals
}
