use std::borrow::Cow;

use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "RawInputItem")]
pub struct InputItem {
  pub name: Option<String>,
  pub import: String,
}

/// `"./main.js"` or `{ "name": "main", "import": "./main.js" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInputItem {
  Import(String),
  Item { name: Option<String>, import: String },
}

impl From<RawInputItem> for InputItem {
  fn from(value: RawInputItem) -> Self {
    match value {
      RawInputItem::Import(import) => Self { name: None, import },
      RawInputItem::Item { name, import } => Self { name, import },
    }
  }
}

impl From<&str> for InputItem {
  fn from(value: &str) -> Self {
    Self { name: None, import: value.to_string() }
  }
}

impl From<Cow<'_, str>> for InputItem {
  fn from(value: Cow<'_, str>) -> Self {
    Self { name: None, import: value.to_string() }
  }
}

impl From<(&str, &str)> for InputItem {
  fn from((name, import): (&str, &str)) -> Self {
    Self { name: Some(name.to_string()), import: import.to_string() }
  }
}
