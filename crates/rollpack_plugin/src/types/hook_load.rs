use rollpack_common::ModuleType;
use rollpack_sourcemap::SourceMap;

#[derive(Debug, Clone, Copy)]
pub struct HookLoadArgs<'a> {
  pub id: &'a str,
}

#[derive(Debug, Default)]
pub struct HookLoadOutput {
  pub code: String,
  pub map: Option<SourceMap>,
  /// Overrides the type guessed from the extension of the id.
  pub module_type: Option<ModuleType>,
}

impl HookLoadOutput {
  pub fn from_code(code: impl Into<String>) -> Self {
    Self { code: code.into(), ..Self::default() }
  }
}
