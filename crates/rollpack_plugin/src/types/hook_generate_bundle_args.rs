use rollpack_common::Output;

#[derive(Debug)]
pub struct HookGenerateBundleArgs<'a> {
  /// `true` when the output is about to be written to disk.
  pub is_write: bool,
  pub bundle: &'a mut Vec<Output>,
}
