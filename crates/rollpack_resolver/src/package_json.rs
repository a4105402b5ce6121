use std::path::{Path, PathBuf};

use serde_json::Value;
use sugar_path::SugarPath;

/// The `sideEffects` field of a package.json.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffects {
  Bool(bool),
  /// Files matching any of the globs have side effects.
  Globs(Vec<String>),
}

impl SideEffects {
  fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::Bool(value) => Some(Self::Bool(*value)),
      Value::String(glob) => Some(Self::Globs(vec![glob.clone()])),
      Value::Array(globs) => {
        Some(Self::Globs(globs.iter().filter_map(|glob| glob.as_str().map(String::from)).collect()))
      }
      _ => None,
    }
  }

  /// `relative_path` is relative to the directory of the package.json, with forward slashes.
  pub fn has_side_effects(&self, relative_path: &str) -> bool {
    match self {
      Self::Bool(value) => *value,
      Self::Globs(globs) => globs.iter().any(|glob| {
        let glob = glob.trim_start_matches("./");
        if glob.contains('/') {
          fast_glob::glob_match(glob, relative_path)
        } else {
          fast_glob::glob_match(&format!("**/{glob}"), relative_path)
        }
      }),
    }
  }
}

/// The parts of a package.json the resolver itself doesn't look at.
#[derive(Debug, Clone)]
pub struct PackageJson {
  /// Path of the package.json file itself.
  pub path: PathBuf,
  pub name: Option<String>,
  pub side_effects: Option<SideEffects>,
}

impl PackageJson {
  pub fn parse(path: PathBuf, json: &str) -> Result<Self, serde_json::Error> {
    let raw: Value = serde_json::from_str(json)?;
    let name = raw.get("name").and_then(Value::as_str).map(String::from);
    let side_effects = raw.get("sideEffects").and_then(SideEffects::from_value);
    Ok(Self { path, name, side_effects })
  }

  pub fn dir(&self) -> &Path {
    self.path.parent().unwrap_or(&self.path)
  }

  /// `None` when the package doesn't say.
  pub fn check_side_effects_for(&self, module_path: &Path) -> Option<bool> {
    let side_effects = self.side_effects.as_ref()?;
    let relative = module_path.relative(self.dir());
    Some(side_effects.has_side_effects(&relative.to_slash_lossy()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn side_effects_globs() {
    let pkg = PackageJson::parse(
      PathBuf::from("/node_modules/pkg/package.json"),
      r#"{ "name": "pkg", "main": "lib/index.js", "sideEffects": ["*.css", "./src/polyfill.js"] }"#,
    )
    .unwrap();
    assert_eq!(pkg.name.as_deref(), Some("pkg"));
    assert_eq!(
      pkg.check_side_effects_for(Path::new("/node_modules/pkg/styles/a.css")),
      Some(true)
    );
    assert_eq!(
      pkg.check_side_effects_for(Path::new("/node_modules/pkg/src/polyfill.js")),
      Some(true)
    );
    assert_eq!(pkg.check_side_effects_for(Path::new("/node_modules/pkg/src/a.js")), Some(false));
  }

  #[test]
  fn side_effects_bool_and_missing() {
    let pkg = PackageJson::parse(PathBuf::from("/p/package.json"), r#"{ "sideEffects": false }"#)
      .unwrap();
    assert_eq!(pkg.check_side_effects_for(Path::new("/p/a.js")), Some(false));
    let pkg = PackageJson::parse(PathBuf::from("/p/package.json"), "{}").unwrap();
    assert_eq!(pkg.check_side_effects_for(Path::new("/p/a.js")), None);
  }
}
