use oxc_index::IndexVec;
use rollpack_error::BuildDiagnostic;

use crate::{ImportRecordIdx, NormalModule, RawImportRecord, ResolvedId};

pub struct NormalModuleTaskResult {
  pub module: NormalModule,
  pub resolved_deps: IndexVec<ImportRecordIdx, ResolvedId>,
  pub raw_import_records: IndexVec<ImportRecordIdx, RawImportRecord>,
  pub warnings: Vec<BuildDiagnostic>,
}
