use rollpack_common::ModuleType;
use rollpack_sourcemap::SourceMap;

#[derive(Debug, Clone, Copy)]
pub struct HookTransformArgs<'a> {
  pub id: &'a str,
  pub code: &'a str,
  pub module_type: &'a ModuleType,
}

#[derive(Debug, Default)]
pub struct HookTransformOutput {
  pub code: String,
  /// Maps the returned code to the code the hook received.
  pub map: Option<SourceMap>,
}

impl HookTransformOutput {
  pub fn from_code(code: impl Into<String>) -> Self {
    Self { code: code.into(), map: None }
  }
}
