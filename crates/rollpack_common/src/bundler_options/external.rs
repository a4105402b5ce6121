use regex::Regex;

/// One entry of the `external` option.
#[derive(Debug, Clone)]
pub enum ExternalMatcher {
  /// `lodash` matches `lodash` only.
  Exact(String),
  /// `lodash/*` matches everything under `lodash/`.
  Prefix(String),
  /// `/^node:/` is a regular expression.
  Regex(Regex),
}

impl ExternalMatcher {
  pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
    if pattern.len() > 2 && pattern.starts_with('/') && pattern.ends_with('/') {
      return Regex::new(&pattern[1..pattern.len() - 1]).map(Self::Regex);
    }
    match pattern.strip_suffix('*') {
      Some(prefix) if prefix.ends_with('/') => Ok(Self::Prefix(prefix.to_string())),
      _ => Ok(Self::Exact(pattern.to_string())),
    }
  }

  pub fn matches(&self, id: &str) -> bool {
    match self {
      Self::Exact(name) => name == id,
      Self::Prefix(prefix) => id.starts_with(prefix.as_str()),
      Self::Regex(re) => re.is_match(id),
    }
  }
}

#[test]
fn test_external_matcher() {
  let exact = ExternalMatcher::parse("lodash").unwrap();
  assert!(exact.matches("lodash"));
  assert!(!exact.matches("lodash/fp"));
  let prefix = ExternalMatcher::parse("lodash/*").unwrap();
  assert!(prefix.matches("lodash/fp"));
  assert!(!prefix.matches("lodash"));
  let re = ExternalMatcher::parse("/^node:/").unwrap();
  assert!(re.matches("node:fs"));
  assert!(ExternalMatcher::parse("/(/").is_err());
}
