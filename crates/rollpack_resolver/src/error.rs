use std::path::PathBuf;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
  #[error("Cannot find module {specifier:?}")]
  NotFound { specifier: String },
  #[error("Cannot resolve {specifier:?}: {reason}")]
  Failed { specifier: String, reason: String },
  #[error("Failed to parse {path:?}: {reason}")]
  InvalidPackageJson { path: PathBuf, reason: String },
  #[error("Alias {find:?} maps {specifier:?} onto itself")]
  RecursiveAlias { find: String, specifier: String },
}

impl ResolveError {
  pub(crate) fn from_oxc(specifier: &str, error: &oxc_resolver::ResolveError) -> Self {
    match error {
      oxc_resolver::ResolveError::NotFound(_) => {
        Self::NotFound { specifier: specifier.to_string() }
      }
      error => Self::Failed { specifier: specifier.to_string(), reason: error.to_string() },
    }
  }
}
