use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::indexmap::FxIndexSet;

const HASH_PLACEHOLDER_LEFT: &str = "!~{";
const HASH_PLACEHOLDER_RIGHT: &str = "}~";
const HASH_PLACEHOLDER_OVERHEAD: usize = HASH_PLACEHOLDER_LEFT.len() + HASH_PLACEHOLDER_RIGHT.len();

pub const DEFAULT_HASH_LEN: usize = 8;
pub const MIN_HASH_LEN: usize = HASH_PLACEHOLDER_OVERHEAD + 1;
pub const MAX_HASH_LEN: usize = 21;

static HASH_PLACEHOLDER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"!~\{\d+\}~").expect("hash placeholder regex is valid"));

/// Hands out unique placeholders that have exactly the length of the hash replacing them, so
/// replacing a placeholder never moves a column.
#[derive(Debug, Default)]
pub struct HashPlaceholderGenerator {
  next_index: usize,
}

impl HashPlaceholderGenerator {
  /// Returns `None` if `len` is out of range or the counter no longer fits into `len`.
  pub fn generate(&mut self, len: usize) -> Option<String> {
    if !(MIN_HASH_LEN..=MAX_HASH_LEN).contains(&len) {
      return None;
    }
    let width = len - HASH_PLACEHOLDER_OVERHEAD;
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(self.next_index);
    if digits.len() > width {
      return None;
    }
    self.next_index += 1;
    let mut placeholder = String::with_capacity(len);
    placeholder.push_str(HASH_PLACEHOLDER_LEFT);
    placeholder.push_str(&"0".repeat(width - digits.len()));
    placeholder.push_str(digits);
    placeholder.push_str(HASH_PLACEHOLDER_RIGHT);
    Some(placeholder)
  }
}

pub fn extract_hash_placeholders(source: &str) -> FxIndexSet<String> {
  HASH_PLACEHOLDER_RE.find_iter(source).map(|m| m.as_str().to_string()).collect()
}

pub fn replace_placeholder_with_hash<'a>(
  source: &'a str,
  final_hashes_by_placeholder: &FxHashMap<String, String>,
) -> Cow<'a, str> {
  HASH_PLACEHOLDER_RE.replace_all(source, |captures: &Captures<'_>| {
    let placeholder = &captures[0];
    final_hashes_by_placeholder
      .get(placeholder)
      .map_or_else(|| placeholder.to_string(), Clone::clone)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn placeholders_have_the_requested_length() {
    let mut generator = HashPlaceholderGenerator::default();
    assert_eq!(generator.generate(8).as_deref(), Some("!~{000}~"));
    assert_eq!(generator.generate(10).as_deref(), Some("!~{00001}~"));
    assert!(generator.generate(4).is_none());
  }

  #[test]
  fn replaces_known_placeholders_only() {
    let mut hashes = FxHashMap::default();
    hashes.insert("!~{000}~".to_string(), "abcdefgh".to_string());
    let replaced = replace_placeholder_with_hash("a-!~{000}~.js b-!~{001}~.js", &hashes);
    assert_eq!(replaced, "a-abcdefgh.js b-!~{001}~.js");
    let found = extract_hash_placeholders("x !~{001}~ y !~{000}~ !~{001}~");
    assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["!~{001}~", "!~{000}~"]);
  }
}
