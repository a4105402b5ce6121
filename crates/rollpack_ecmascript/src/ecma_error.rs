use std::fmt::Display;

use oxc::diagnostics::OxcDiagnostic;

/// A syntax or transform error reported by oxc, with the byte offset of its primary label.
#[derive(Debug, Clone)]
pub struct EcmaError {
  pub message: String,
  pub offset: Option<u32>,
}

impl EcmaError {
  pub fn from_oxc(diagnostic: &OxcDiagnostic) -> Self {
    let offset = diagnostic
      .labels
      .as_ref()
      .and_then(|labels| labels.first())
      .and_then(|label| u32::try_from(label.offset()).ok());
    Self { message: diagnostic.to_string(), offset }
  }

  pub fn from_oxc_list(diagnostics: &[OxcDiagnostic]) -> Vec<Self> {
    diagnostics.iter().map(Self::from_oxc).collect()
  }
}

impl Display for EcmaError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message)
  }
}
