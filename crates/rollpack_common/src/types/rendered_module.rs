#[derive(Debug, Clone)]
pub struct RenderedModule {
  pub exec_order: u32,
  /// The factory of the module as it appears in the chunk.
  pub code: String,
}
