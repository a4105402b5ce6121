use std::fmt::Display;

/// Ordered from the least to the most severe, so `Severity::Warning < Severity::Error` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
  Debug,
  Info,
  Warning,
  Error,
}

impl Severity {
  pub fn is_error(self) -> bool {
    matches!(self, Self::Error)
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Debug => write!(f, "debug"),
      Self::Info => write!(f, "info"),
      Self::Warning => write!(f, "warning"),
      Self::Error => write!(f, "error"),
    }
  }
}
