use std::path::Path;

use arcstr::ArcStr;

use super::{module_id::stabilize_module_id, side_effects::DeterminedSideEffects};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
  pub id: ArcStr,
  pub is_external: bool,
  /// Decided by a plugin or a package.json. `None` leaves it to the `treeshake` options.
  pub side_effects: Option<DeterminedSideEffects>,
}

impl ResolvedId {
  pub fn new(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: false, side_effects: None }
  }

  pub fn external(id: impl Into<ArcStr>) -> Self {
    Self { is_external: true, ..Self::new(id) }
  }

  pub fn debug_id(&self, cwd: impl AsRef<Path>) -> String {
    if self.id.trim_start().starts_with("data:") {
      return format!("<{}>", self.id);
    }
    stabilize_module_id(&self.id, cwd.as_ref())
  }

  /// The path part of the id, without `?query` or `#hash`.
  pub fn path(&self) -> &str {
    self.id.split(['?', '#']).next().unwrap_or(&self.id)
  }
}

#[test]
fn test_resolved_id_path() {
  assert_eq!(ResolvedId::new("/a/b.js?raw").path(), "/a/b.js");
  assert_eq!(ResolvedId::new("/a/b.js").path(), "/a/b.js");
  assert_eq!(ResolvedId::new("data:text/javascript,1").debug_id("/"), "<data:text/javascript,1>");
}
