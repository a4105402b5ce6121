use arcstr::ArcStr;
use rollpack_common::ImportKind;

#[derive(Debug, Clone, Copy)]
pub struct HookResolveIdArgs<'a> {
  pub importer: Option<&'a str>,
  pub specifier: &'a str,
  pub kind: ImportKind,
  pub is_entry: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookResolveIdOutput {
  pub id: ArcStr,
  pub external: Option<bool>,
  pub side_effects: Option<bool>,
}

impl HookResolveIdOutput {
  pub fn from_id(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), ..Self::default() }
  }
}
