use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeshakeOptions {
  pub enabled: bool,
  /// Side-effect flag of modules that neither a plugin nor a package.json decides.
  pub module_side_effects: bool,
}

impl Default for TreeshakeOptions {
  fn default() -> Self {
    Self { enabled: true, module_side_effects: true }
  }
}
