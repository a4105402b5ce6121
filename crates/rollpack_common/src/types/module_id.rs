use std::path::Path;

use arcstr::ArcStr;
use sugar_path::SugarPath;

/// `ModuleId` is the unique string identifier for each module.
/// - It will be used to identify the module in the whole bundle.
/// - Users could store the `ModuleId` to track the module in different stages/hooks.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }

  /// Relative to `cwd` with forward slashes, so it doesn't differ between machines.
  pub fn stabilize(&self, cwd: &Path) -> String {
    stabilize_module_id(&self.0, cwd)
  }
}

pub fn stabilize_module_id(module_id: &str, cwd: &Path) -> String {
  if module_id.starts_with('\0') {
    // Virtual modules, show them as-is, minus the marker.
    return module_id.replace('\0', "\\0");
  }
  let path = module_id.as_path();
  if path.is_absolute() {
    path.relative(cwd).as_path().to_slash_lossy().into_owned()
  } else {
    module_id.to_string()
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

#[test]
fn test_stabilize_module_id() {
  let cwd = Path::new("/project");
  assert_eq!(stabilize_module_id("/project/src/main.js", cwd), "src/main.js");
  assert_eq!(stabilize_module_id("/lib/x.js", cwd), "../lib/x.js");
  assert_eq!(stabilize_module_id("\0virtual:x", cwd), "\\0virtual:x");
  assert_eq!(stabilize_module_id("react", cwd), "react");
}
