mod bind_exports;
mod sort_modules;
mod tree_shaking;

use rollpack_common::{EntryPoint, IndexModules, ModuleIdx};
use rollpack_error::BuildDiagnostic;

use crate::{stages::scan::ScanStageOutput, types::SharedOptions};

pub use bind_exports::external_star_exports;

#[derive(Debug)]
pub struct LinkStageOutput {
  pub module_table: IndexModules,
  /// User defined entries first, then the dynamic imports that survived tree shaking.
  pub entry_points: Vec<EntryPoint>,
  /// Included modules in execution order.
  pub sorted_modules: Vec<ModuleIdx>,
  pub warnings: Vec<BuildDiagnostic>,
}

pub struct LinkStage<'a> {
  module_table: IndexModules,
  entry_points: Vec<EntryPoint>,
  sorted_modules: Vec<ModuleIdx>,
  warnings: Vec<BuildDiagnostic>,
  options: &'a SharedOptions,
}

impl<'a> LinkStage<'a> {
  pub fn new(scan_stage_output: ScanStageOutput, options: &'a SharedOptions) -> Self {
    Self {
      module_table: scan_stage_output.module_table,
      entry_points: scan_stage_output.entry_points,
      sorted_modules: Vec::new(),
      warnings: scan_stage_output.warnings,
      options,
    }
  }

  pub fn link(mut self) -> LinkStageOutput {
    self.prune_side_effect_free_imports();
    self.include_reachable_modules();
    self.sort_modules();
    self.resolve_exports();
    self.check_missing_exports();

    tracing::debug!(
      modules = self.sorted_modules.len(),
      entries = self.entry_points.len(),
      "module graph linked"
    );

    LinkStageOutput {
      module_table: self.module_table,
      entry_points: self.entry_points,
      sorted_modules: self.sorted_modules,
      warnings: self.warnings,
    }
  }
}
