use crate::ModuleIdx;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  EntryPoint { is_user_defined: bool, bit: u32, module: ModuleIdx },
  /// Manual chunks and chunks of shared modules.
  #[default]
  Common,
}
