use oxc_index::IndexVec;
use rollpack_common::{ImportRecordMeta, Module, ModuleIdx};
use rustc_hash::FxHashSet;

use super::LinkStage;

impl LinkStage<'_> {
  /// `import './x'` of a module without side effects does nothing, so the edge is dropped.
  pub(super) fn prune_side_effect_free_imports(&mut self) {
    if !self.options.treeshake.enabled {
      return;
    }

    let side_effect_free = self
      .module_table
      .iter()
      .map(|module| !module.side_effects().has_side_effects())
      .collect::<IndexVec<ModuleIdx, _>>();

    for module in self.module_table.iter_mut() {
      let Module::Normal(module) = module else {
        continue;
      };
      for record in module.import_records.iter_mut() {
        if record.kind.is_static()
          && record.meta.contains(ImportRecordMeta::IS_PLAIN_IMPORT)
          && side_effect_free[record.resolved_module()]
        {
          tracing::trace!(importer = %module.stable_id, specifier = %record.specifier, "pruned");
          record.meta.insert(ImportRecordMeta::IS_PRUNED);
        }
      }
    }
  }

  /// Marks everything reachable from the user defined entries. Dynamic entries only survive
  /// while an included module still imports them.
  pub(super) fn include_reachable_modules(&mut self) {
    let mut stack = self
      .entry_points
      .iter()
      .filter(|entry| entry.kind.is_user_defined())
      .map(|entry| entry.idx)
      .rev()
      .collect::<Vec<_>>();

    while let Some(idx) = stack.pop() {
      if self.module_table[idx].is_included() {
        continue;
      }
      self.module_table[idx].set_included(true);
      stack.extend(
        self.module_table[idx]
          .import_records()
          .iter()
          .rev()
          .filter(|record| !record.is_pruned())
          .map(|record| record.resolved_module()),
      );
    }

    let dynamically_imported = self
      .module_table
      .iter()
      .filter(|module| module.is_included())
      .flat_map(|module| module.import_records().iter())
      .filter(|record| !record.kind.is_static())
      .map(|record| record.resolved_module())
      .collect::<FxHashSet<_>>();

    self.entry_points.retain(|entry| {
      entry.kind.is_user_defined() || dynamically_imported.contains(&entry.idx)
    });
  }
}
