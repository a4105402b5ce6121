use std::fmt::Display;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ImportKind {
  /// `import foo from 'foo'`, `export * from 'foo'` and friends.
  Import,
  /// `import('foo')`
  DynamicImport,
}

impl ImportKind {
  /// Static edges take part in execution order and chunk membership. Dynamic ones only create
  /// dynamic entries.
  pub fn is_static(&self) -> bool {
    matches!(self, Self::Import)
  }
}

impl Display for ImportKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Import => write!(f, "import-statement"),
      Self::DynamicImport => write!(f, "dynamic-import"),
    }
  }
}
