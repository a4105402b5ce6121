use regex::Regex;
use serde::Deserialize;

/// Puts every module whose stable id matches `test` into the chunk `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualChunk {
  pub name: String,
  pub test: String,
}

#[derive(Debug, Clone)]
pub struct NormalizedManualChunk {
  pub name: String,
  pub test: Regex,
}

impl NormalizedManualChunk {
  pub fn matches(&self, stable_id: &str) -> bool {
    self.test.is_match(stable_id)
  }
}
