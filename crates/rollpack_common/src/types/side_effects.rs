#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeterminedSideEffects {
  /// Returned by a plugin's `resolve_id`.
  UserDefined(bool),
  /// From the `sideEffects` field of the closest package.json.
  PackageJson(bool),
  /// From the `treeshake.moduleSideEffects` option.
  Default(bool),
  NoTreeshake,
}

impl DeterminedSideEffects {
  pub fn has_side_effects(&self) -> bool {
    match self {
      Self::UserDefined(v) | Self::PackageJson(v) | Self::Default(v) => *v,
      Self::NoTreeshake => true,
    }
  }
}
