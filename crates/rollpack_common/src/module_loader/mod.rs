pub mod task_result;

use rollpack_error::BuildDiagnostic;
use task_result::NormalModuleTaskResult;

pub enum ModuleLoaderMsg {
  NormalModuleDone(Box<NormalModuleTaskResult>),
  BuildErrors(Vec<BuildDiagnostic>),
}
