use rollpack_error::BuildDiagnostic;

#[derive(Debug, Clone, Copy)]
pub struct HookBuildEndArgs<'a> {
  pub errors: &'a [BuildDiagnostic],
}
