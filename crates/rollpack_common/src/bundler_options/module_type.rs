use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
  Js,
  Jsx,
  Ts,
  Tsx,
  Json,
  Text,
}

impl ModuleType {
  /// Unknown extensions are parsed as JavaScript.
  pub fn from_path(path: impl AsRef<Path>) -> Self {
    let ext = path.as_ref().extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    match ext {
      "jsx" => Self::Jsx,
      "ts" | "mts" | "cts" => Self::Ts,
      "tsx" => Self::Tsx,
      "json" => Self::Json,
      "txt" => Self::Text,
      _ => Self::Js,
    }
  }
}

#[test]
fn test_module_type_from_path() {
  assert_eq!(ModuleType::from_path("/a/b.tsx"), ModuleType::Tsx);
  assert_eq!(ModuleType::from_path("/a/b.json"), ModuleType::Json);
  assert_eq!(ModuleType::from_path("/a/b.cjs"), ModuleType::Js);
  assert_eq!(ModuleType::from_path("/a/b"), ModuleType::Js);
}
