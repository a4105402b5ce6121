use oxc_index::{index_vec, IndexVec};
use rollpack_common::ModuleIdx;
use rollpack_error::BuildDiagnostic;
use rustc_hash::FxHashSet;

use super::LinkStage;

enum Status {
  ToBeExecuted(ModuleIdx),
  WaitForExit(ModuleIdx),
}

impl LinkStage<'_> {
  /// Post-order DFS over static imports, entries in order. A module is executed after its
  /// dependencies, except inside a cycle where the module discovered first is entered first.
  pub(super) fn sort_modules(&mut self) {
    let mut execution_stack = self
      .entry_points
      .iter()
      .rev()
      .map(|entry| Status::ToBeExecuted(entry.idx))
      .collect::<Vec<_>>();

    let mut executed: IndexVec<ModuleIdx, bool> = index_vec![false; self.module_table.len()];
    let mut on_path: IndexVec<ModuleIdx, bool> = index_vec![false; self.module_table.len()];
    let mut path = vec![];
    let mut reported_cycles = FxHashSet::default();
    let mut next_exec_order = 0u32;
    let mut sorted_modules = Vec::with_capacity(self.module_table.len());

    while let Some(status) = execution_stack.pop() {
      match status {
        Status::ToBeExecuted(idx) => {
          if on_path[idx] {
            self.report_cycle(&path, idx, &mut reported_cycles);
            continue;
          }
          if executed[idx] {
            continue;
          }
          executed[idx] = true;
          on_path[idx] = true;
          path.push(idx);
          execution_stack.push(Status::WaitForExit(idx));
          execution_stack.extend(
            self.module_table[idx]
              .import_records()
              .iter()
              .rev()
              .filter(|record| record.kind.is_static() && !record.is_pruned())
              .map(|record| Status::ToBeExecuted(record.resolved_module())),
          );
        }
        Status::WaitForExit(idx) => {
          on_path[idx] = false;
          path.pop();
          self.module_table[idx].set_exec_order(next_exec_order);
          next_exec_order += 1;
          sorted_modules.push(idx);
        }
      }
    }

    self.sorted_modules = sorted_modules;
  }

  /// Reports `path[start..] -> idx` once, whichever module of the cycle it was entered from.
  fn report_cycle(
    &mut self,
    path: &[ModuleIdx],
    idx: ModuleIdx,
    reported_cycles: &mut FxHashSet<Vec<ModuleIdx>>,
  ) {
    let Some(start) = path.iter().rposition(|module| *module == idx) else {
      return;
    };
    let mut cycle = path[start..].to_vec();
    let min_position = cycle
      .iter()
      .enumerate()
      .min_by_key(|(_, module)| self.module_table[**module].stable_id())
      .map_or(0, |(position, _)| position);
    cycle.rotate_left(min_position);
    if !reported_cycles.insert(cycle) {
      return;
    }

    let mut ids = path[start..]
      .iter()
      .map(|module| self.module_table[*module].stable_id().into())
      .collect::<Vec<_>>();
    ids.push(self.module_table[idx].stable_id().into());
    self.warnings.push(BuildDiagnostic::circular_dependency(&ids));
  }
}
