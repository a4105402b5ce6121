mod module_task;
pub mod task_context;
pub mod transform_cache;

use std::{collections::hash_map::Entry, sync::Arc};

use arcstr::ArcStr;
use itertools::Itertools;
use oxc_index::IndexVec;
use rollpack_common::{
  EntryPoint, EntryPointKind, ExternalModule, ImportKind, ImportRecordIdx, IndexModules, Module,
  ModuleId, ModuleIdx, ModuleLoaderMsg, NormalModuleTaskResult, ResolvedId,
};
use rollpack_error::{BuildDiagnostic, BuildResult};
use rollpack_fs::SharedFileSystem;
use rollpack_plugin::SharedPluginDriver;
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::{sync::mpsc::Receiver, task::JoinSet};

use self::{
  module_task::{ModuleTask, ModuleTaskOwner},
  task_context::TaskContext,
  transform_cache::TransformCache,
};
use crate::types::SharedOptions;

pub struct IntermediateNormalModules {
  pub modules: IndexVec<ModuleIdx, Option<Module>>,
  /// `(importer, kind)` pairs, filled in as importers finish.
  pub importers: IndexVec<ModuleIdx, Vec<(ModuleId, ImportKind)>>,
}

impl IntermediateNormalModules {
  pub fn new() -> Self {
    Self { modules: IndexVec::new(), importers: IndexVec::new() }
  }

  pub fn alloc_module_idx(&mut self) -> ModuleIdx {
    self.importers.push(Vec::new());
    self.modules.push(None)
  }
}

/// Grows the module graph from the entries. Every newly discovered id becomes a task; the
/// loader owns the tasks, so dropping it aborts whatever is still in flight.
pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  tasks: JoinSet<()>,
  inm: IntermediateNormalModules,
  visited: FxHashMap<ArcStr, ModuleIdx>,
}

#[derive(Debug)]
pub struct ModuleLoaderOutput {
  pub module_table: IndexModules,
  // Entries that user defined + dynamic import entries
  pub entry_points: Vec<EntryPoint>,
  pub warnings: Vec<BuildDiagnostic>,
}

impl ModuleLoader {
  pub fn new(
    fs: SharedFileSystem,
    options: SharedOptions,
    plugin_driver: SharedPluginDriver,
    transform_cache: Arc<TransformCache>,
  ) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context =
      Arc::new(TaskContext { fs, options, plugin_driver, transform_cache, tx });

    Self {
      rx,
      remaining: 0,
      shared_context,
      tasks: JoinSet::new(),
      inm: IntermediateNormalModules::new(),
      visited: FxHashMap::default(),
    }
  }

  pub async fn fetch_all_modules(
    mut self,
    user_defined_entries: Vec<(Option<ArcStr>, ResolvedId)>,
  ) -> BuildResult<ModuleLoaderOutput> {
    let mut user_defined_entry_ids = FxHashSet::default();
    let mut entry_points = Vec::with_capacity(user_defined_entries.len());
    for (name, resolved_id) in user_defined_entries {
      let idx = self.try_spawn_new_task(resolved_id, None, true);
      // The same module listed twice is bundled once, under the first name.
      if user_defined_entry_ids.insert(idx) {
        entry_points.push(EntryPoint { idx, name, kind: EntryPointKind::UserDefined });
      }
    }

    let mut errors: Vec<BuildDiagnostic> = vec![];
    let mut warnings: Vec<BuildDiagnostic> = vec![];
    let mut dynamic_import_entry_ids: FxHashSet<ModuleIdx> = FxHashSet::default();

    while self.remaining > 0 {
      let msg = tokio::select! {
        msg = self.rx.recv() => msg,
        Some(Err(err)) = self.tasks.join_next() => {
          // A panicking task never reports back.
          errors.push(BuildDiagnostic::load_error("<module task>", None, err));
          self.remaining -= 1;
          continue;
        }
      };
      let Some(msg) = msg else {
        break;
      };

      match msg {
        ModuleLoaderMsg::NormalModuleDone(task_result) => {
          let NormalModuleTaskResult {
            mut module,
            resolved_deps,
            raw_import_records,
            warnings: task_result_warnings,
          } = *task_result;

          warnings.extend(task_result_warnings);

          let import_records = raw_import_records
            .into_iter()
            .zip(resolved_deps)
            .map(|(raw_rec, info)| {
              let owner = ModuleTaskOwner::new(module.stable_id.clone());
              let idx = self.try_spawn_new_task(info, Some(owner), false);
              self.inm.importers[idx].push((module.id.clone(), raw_rec.kind));
              // Dynamic imported module will be considered as an entry
              if matches!(raw_rec.kind, ImportKind::DynamicImport)
                && !user_defined_entry_ids.contains(&idx)
              {
                dynamic_import_entry_ids.insert(idx);
              }
              raw_rec.into_resolved(idx)
            })
            .collect::<IndexVec<ImportRecordIdx, _>>();

          module.import_records = import_records;
          let module_idx = module.idx;
          self.inm.modules[module_idx] = Some(module.into());
          self.remaining -= 1;
        }
        ModuleLoaderMsg::BuildErrors(e) => {
          errors.extend(e);
          self.remaining -= 1;
        }
      }
    }

    if !errors.is_empty() {
      errors.extend(warnings);
      return Err(errors.into());
    }

    let mut module_table = IndexModules::with_capacity(self.inm.modules.len());
    for (idx, module) in self.inm.modules.into_iter_enumerated() {
      let Some(mut module) = module else {
        let id = format!("#{}", idx.index());
        return Err(BuildDiagnostic::load_error(&id, None, "the module task did not finish").into());
      };
      // Note: (Compat to rollup)
      // The `dynamic_importers/importers` should be added after `module_parsed` hook.
      let importers = std::mem::take(&mut self.inm.importers[idx]);
      for (importer, kind) in importers {
        let (static_importers, dynamic_importers) = match &mut module {
          Module::Normal(module) => (&mut module.importers, &mut module.dynamic_importers),
          Module::External(module) => (&mut module.importers, &mut module.dynamic_importers),
        };
        if kind.is_static() {
          static_importers.insert(importer);
        } else {
          dynamic_importers.insert(importer);
        }
      }
      module_table.push(module);
    }

    for module in &module_table {
      self
        .shared_context
        .plugin_driver
        .module_infos()
        .insert(module.id().into(), Arc::new(module.to_module_info()));
    }

    let dynamic_import_entry_ids = dynamic_import_entry_ids
      .into_iter()
      .filter(|idx| module_table[*idx].is_normal())
      .sorted_unstable_by_key(|idx| module_table[*idx].stable_id())
      .collect_vec();

    entry_points.extend(
      dynamic_import_entry_ids
        .into_iter()
        .map(|idx| EntryPoint { idx, name: None, kind: EntryPointKind::DynamicImport }),
    );

    Ok(ModuleLoaderOutput { module_table, entry_points, warnings })
  }

  fn try_spawn_new_task(
    &mut self,
    resolved_id: ResolvedId,
    owner: Option<ModuleTaskOwner>,
    is_user_defined_entry: bool,
  ) -> ModuleIdx {
    match self.visited.entry(resolved_id.id.clone()) {
      Entry::Occupied(visited) => *visited.get(),
      Entry::Vacant(not_visited) => {
        let idx = self.inm.alloc_module_idx();

        if resolved_id.is_external {
          self.inm.modules[idx] = Some(ExternalModule::new(idx, resolved_id.id).into());
        } else {
          self.remaining += 1;
          let task = ModuleTask::new(
            Arc::clone(&self.shared_context),
            idx,
            owner,
            resolved_id,
            is_user_defined_entry,
          );
          self.tasks.spawn(task.run());
        }

        *not_visited.insert(idx)
      }
    }
  }
}
