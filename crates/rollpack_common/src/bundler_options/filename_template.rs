use std::sync::LazyLock;

use regex::{Captures, Regex};
use rollpack_utils::hash_placeholder::{DEFAULT_HASH_LEN, MAX_HASH_LEN, MIN_HASH_LEN};

static PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[(name|hash|ext|extname)(?::(\d+))?\]").expect("filename pattern regex is valid")
});

/// A file name pattern such as `[name]-[hash:10].js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn has_hash_pattern(&self) -> bool {
    PATTERN_RE.captures_iter(&self.template).any(|caps| &caps[1] == "hash")
  }

  /// Checks the `[hash:N]` lengths. `[name]` and friends do not take a length.
  pub fn validate(&self) -> Result<(), String> {
    for caps in PATTERN_RE.captures_iter(&self.template) {
      match (&caps[1], caps.get(2)) {
        ("hash", Some(len)) => {
          let len = len.as_str().parse::<usize>().unwrap_or(usize::MAX);
          if !(MIN_HASH_LEN..=MAX_HASH_LEN).contains(&len) {
            return Err(format!(
              "hash length in {:?} must be between {MIN_HASH_LEN} and {MAX_HASH_LEN}",
              self.template
            ));
          }
        }
        (kind, Some(_)) if kind != "hash" => {
          return Err(format!("[{kind}] in {:?} does not take a length", self.template));
        }
        _ => {}
      }
    }
    Ok(())
  }

  /// Substitutes every pattern. `hash_replacer` receives the requested hash length and returns
  /// `None` when it cannot produce a hash, which makes the whole render fail.
  pub fn render(
    &self,
    name: &str,
    extname: &str,
    mut hash_replacer: impl FnMut(usize) -> Option<String>,
  ) -> Option<String> {
    let mut failed = false;
    let rendered = PATTERN_RE.replace_all(&self.template, |caps: &Captures<'_>| match &caps[1] {
      "name" => name.to_string(),
      "ext" => extname.trim_start_matches('.').to_string(),
      "extname" => extname.to_string(),
      _ => {
        let len = caps.get(2).and_then(|len| len.as_str().parse().ok()).unwrap_or(DEFAULT_HASH_LEN);
        hash_replacer(len).unwrap_or_else(|| {
          failed = true;
          String::new()
        })
      }
    });
    (!failed).then(|| rendered.into_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_every_pattern() {
    let template = FilenameTemplate::new("assets/[name]-[hash:6].[ext]?[extname]".to_string());
    assert!(template.has_hash_pattern());
    let rendered = template.render("logo", ".svg", |len| Some("x".repeat(len)));
    assert_eq!(rendered.as_deref(), Some("assets/logo-xxxxxx.svg?.svg"));
  }

  #[test]
  fn validates_hash_length() {
    assert!(FilenameTemplate::new("[name]-[hash:40].js".to_string()).validate().is_err());
    assert!(FilenameTemplate::new("[name:3].js".to_string()).validate().is_err());
    assert!(FilenameTemplate::new("[name]-[hash].js".to_string()).validate().is_ok());
    assert!(!FilenameTemplate::new("[name].js".to_string()).has_hash_pattern());
  }

  #[test]
  fn fails_when_the_hash_cannot_be_produced() {
    let template = FilenameTemplate::new("[name]-[hash].js".to_string());
    assert_eq!(template.render("main", ".js", |_| None), None);
  }
}
