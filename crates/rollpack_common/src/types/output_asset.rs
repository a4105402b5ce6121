use arcstr::ArcStr;

/// Content of an emitted asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetSource {
  String(String),
  Bytes(Vec<u8>),
}

impl AssetSource {
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Self::String(value) => value.as_bytes(),
      Self::Bytes(value) => value,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(value) => Some(value),
      Self::Bytes(value) => std::str::from_utf8(value).ok(),
    }
  }
}

impl From<String> for AssetSource {
  fn from(value: String) -> Self {
    Self::String(value)
  }
}

impl From<&str> for AssetSource {
  fn from(value: &str) -> Self {
    Self::String(value.to_string())
  }
}

impl From<Vec<u8>> for AssetSource {
  fn from(value: Vec<u8>) -> Self {
    Self::Bytes(value)
  }
}

#[derive(Debug, Clone)]
pub struct OutputAsset {
  pub name: Option<String>,
  pub file_name: ArcStr,
  pub source: AssetSource,
}

impl OutputAsset {
  pub fn file_name(&self) -> &str {
    &self.file_name
  }

  pub fn content_as_bytes(&self) -> &[u8] {
    self.source.as_bytes()
  }
}
