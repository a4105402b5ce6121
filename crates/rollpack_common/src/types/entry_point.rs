use arcstr::ArcStr;

use crate::ModuleIdx;

#[derive(Debug, Clone)]
pub struct EntryPoint {
  pub idx: ModuleIdx,
  pub name: Option<ArcStr>,
  pub kind: EntryPointKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPointKind {
  UserDefined,
  DynamicImport,
}

impl EntryPointKind {
  pub fn is_user_defined(self) -> bool {
    matches!(self, Self::UserDefined)
  }
}
