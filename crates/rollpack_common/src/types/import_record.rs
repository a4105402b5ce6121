use std::fmt::Debug;

use arcstr::ArcStr;
use rollpack_ecmascript::{ScannedImportRecord, Span};

use crate::{ImportKind, ModuleIdx};

pub type RawImportRecord = ImportRecord<Span>;
pub type ResolvedImportRecord = ImportRecord<ModuleIdx>;

bitflags::bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct ImportRecordMeta: u8 {
    /// If it is `import {} from '...'` or `import '...'`
    const IS_PLAIN_IMPORT = 1;
    /// `export * from 'mod'` only
    const IS_EXPORT_STAR = 1 << 1;
    /// A plain import of a module without side effects, dropped by tree shaking.
    const IS_PRUNED = 1 << 2;
  }
}

#[derive(Debug, Clone)]
pub struct ImportRecord<State: Debug> {
  pub state: State,
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: ArcStr,
  pub kind: ImportKind,
  pub meta: ImportRecordMeta,
}

impl<State: Debug> ImportRecord<State> {
  pub fn is_pruned(&self) -> bool {
    self.meta.contains(ImportRecordMeta::IS_PRUNED)
  }
}

impl RawImportRecord {
  pub fn into_resolved(self, resolved_module: ModuleIdx) -> ResolvedImportRecord {
    ResolvedImportRecord {
      state: resolved_module,
      specifier: self.specifier,
      kind: self.kind,
      meta: self.meta,
    }
  }
}

impl From<&ScannedImportRecord> for RawImportRecord {
  fn from(record: &ScannedImportRecord) -> Self {
    let mut meta = ImportRecordMeta::empty();
    meta.set(ImportRecordMeta::IS_PLAIN_IMPORT, record.is_plain);
    meta.set(ImportRecordMeta::IS_EXPORT_STAR, record.is_export_star);
    Self {
      state: record.span,
      specifier: record.specifier.as_str().into(),
      kind: if record.is_dynamic { ImportKind::DynamicImport } else { ImportKind::Import },
      meta,
    }
  }
}

impl ResolvedImportRecord {
  pub fn resolved_module(&self) -> ModuleIdx {
    self.state
  }
}
