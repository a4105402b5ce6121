use std::ops::{Deref, DerefMut};

use crate::BuildDiagnostic;

/// All errors of a failed build, followed by the warnings that were collected before the failure.
#[derive(Debug, Clone, Default)]
pub struct BatchedBuildDiagnostic(Vec<BuildDiagnostic>);

impl BatchedBuildDiagnostic {
  pub fn new(diagnostics: Vec<BuildDiagnostic>) -> Self {
    Self(diagnostics)
  }

  pub fn into_vec(self) -> Vec<BuildDiagnostic> {
    self.0
  }

  pub fn errors(&self) -> impl Iterator<Item = &BuildDiagnostic> {
    self.0.iter().filter(|d| d.is_error())
  }

  pub fn warnings(&self) -> impl Iterator<Item = &BuildDiagnostic> {
    self.0.iter().filter(|d| !d.is_error())
  }

  pub fn has_error(&self) -> bool {
    self.0.iter().any(BuildDiagnostic::is_error)
  }
}

impl Deref for BatchedBuildDiagnostic {
  type Target = Vec<BuildDiagnostic>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BatchedBuildDiagnostic {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<BuildDiagnostic> for BatchedBuildDiagnostic {
  fn from(diagnostic: BuildDiagnostic) -> Self {
    Self(vec![diagnostic])
  }
}

impl From<Vec<BuildDiagnostic>> for BatchedBuildDiagnostic {
  fn from(diagnostics: Vec<BuildDiagnostic>) -> Self {
    Self(diagnostics)
  }
}

impl std::fmt::Display for BatchedBuildDiagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, diagnostic) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{diagnostic}")?;
    }
    Ok(())
  }
}

impl std::error::Error for BatchedBuildDiagnostic {}
