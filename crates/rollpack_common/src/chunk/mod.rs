use std::path::Path;

pub mod types;

use arcstr::ArcStr;

use oxc_index::IndexVec;
use rollpack_utils::{
  bitset::BitSet, hash_placeholder::HashPlaceholderGenerator, make_unique_name::make_unique_name,
};
use rustc_hash::FxHashMap;
use sugar_path::SugarPath;

use crate::{
  ChunkIdx, ChunkKind, FilenameTemplate, Module, ModuleIdx, NormalModule,
  NormalizedBundlerOptions,
};

use self::types::preliminary_filename::PreliminaryFilename;

#[derive(Debug, Default)]
pub struct Chunk {
  pub exec_order: u32,
  pub kind: ChunkKind,
  /// Sorted by execution order.
  pub modules: Vec<ModuleIdx>,
  pub name: Option<ArcStr>,
  pub preliminary_filename: Option<PreliminaryFilename>,
  pub absolute_preliminary_filename: Option<String>,
  // Sorted by the order of the chunks in the chunk table
  pub cross_chunk_imports: Vec<ChunkIdx>,
  pub cross_chunk_dynamic_imports: Vec<ChunkIdx>,
  /// Externals imported by modules of this chunk, in execution order.
  pub imports_from_external_modules: Vec<ModuleIdx>,
  pub bits: BitSet,
}

impl Chunk {
  pub fn new(name: Option<ArcStr>, bits: BitSet, modules: Vec<ModuleIdx>, kind: ChunkKind) -> Self {
    Self { exec_order: u32::MAX, modules, name, bits, kind, ..Self::default() }
  }

  pub fn import_path_for(&self, importee: &Chunk) -> String {
    let importee_filename = importee
      .absolute_preliminary_filename
      .as_ref()
      .expect("importee chunk should have absolute_preliminary_filename");
    let import_path = self.relative_path_for(importee_filename.as_path());
    if import_path.starts_with('.') {
      import_path
    } else {
      format!("./{import_path}")
    }
  }

  pub fn relative_path_for(&self, target: &Path) -> String {
    let source_dir = self
      .absolute_preliminary_filename
      .as_ref()
      .expect("chunk should have absolute_preliminary_filename")
      .as_path()
      .parent()
      .expect("absolute_preliminary_filename should have a parent directory");
    target.relative(source_dir).as_path().to_slash_lossy().into_owned()
  }

  pub fn filename_template<'a>(&self, options: &'a NormalizedBundlerOptions) -> &'a FilenameTemplate {
    if matches!(self.kind, ChunkKind::EntryPoint { is_user_defined, .. } if is_user_defined) {
      &options.entry_filenames
    } else {
      &options.chunk_filenames
    }
  }

  /// Renders the file name with hash placeholders standing in for `[hash]`. Names given
  /// explicitly by the user are kept as they are, so two entries with the same name collide.
  pub fn generate_preliminary_filename(
    &self,
    options: &NormalizedBundlerOptions,
    chunk_name: &ArcStr,
    is_explicit_name: bool,
    hash_placeholder_generator: &mut HashPlaceholderGenerator,
    used_name_counts: &mut FxHashMap<String, u32>,
  ) -> anyhow::Result<PreliminaryFilename> {
    let filename_template = self.filename_template(options);
    let has_hash_pattern = filename_template.has_hash_pattern();

    let name = if has_hash_pattern || is_explicit_name {
      make_unique_name(chunk_name, used_name_counts);
      chunk_name.to_string()
    } else {
      make_unique_name(chunk_name, used_name_counts)
    };

    let mut hash_placeholder = has_hash_pattern.then(Vec::new);
    let filename = filename_template
      .render(&name, ".js", |len| {
        let placeholder = hash_placeholder_generator.generate(len)?;
        if let Some(hash_placeholder) = hash_placeholder.as_mut() {
          hash_placeholder.push(placeholder.clone());
        }
        Some(placeholder)
      })
      .ok_or_else(|| {
        anyhow::anyhow!(
          "Ran out of hash placeholders for {:?}, use a longer [hash:N]",
          filename_template.template()
        )
      })?;

    Ok(PreliminaryFilename::new(filename.into(), hash_placeholder))
  }

  pub fn user_defined_entry_module_idx(&self) -> Option<ModuleIdx> {
    match &self.kind {
      ChunkKind::EntryPoint { module, is_user_defined, .. } if *is_user_defined => Some(*module),
      _ => None,
    }
  }

  pub fn entry_module_idx(&self) -> Option<ModuleIdx> {
    match &self.kind {
      ChunkKind::EntryPoint { module, .. } => Some(*module),
      ChunkKind::Common => None,
    }
  }

  pub fn entry_module<'module>(
    &self,
    modules: &'module IndexVec<ModuleIdx, Module>,
  ) -> Option<&'module NormalModule> {
    self.entry_module_idx().and_then(|idx| modules[idx].as_normal())
  }

  pub fn is_user_defined_entry(&self) -> bool {
    self.user_defined_entry_module_idx().is_some()
  }

  pub fn is_dynamic_entry(&self) -> bool {
    matches!(self.kind, ChunkKind::EntryPoint { is_user_defined: false, .. })
  }
}
