use std::sync::Arc;

use arcstr::ArcStr;
use dashmap::DashMap;
use rollpack_common::EmittedAsset;
use rollpack_error::BuildDiagnostic;
use rollpack_sourcemap::SourceMap;
use rollpack_utils::xxhash::xxhash_u64;

/// What the `transform` hooks made of one loaded source.
#[derive(Debug)]
pub struct CachedTransform {
  pub code: String,
  /// Maps pushed by the transform hooks only.
  pub sourcemap_chain: Vec<SourceMap>,
  pub emitted_assets: Vec<EmittedAsset>,
  pub warnings: Vec<BuildDiagnostic>,
}

/// Transform results keyed by module id and the xxhash of the loaded source. A module whose
/// source changed misses even without an explicit invalidation.
#[derive(Debug, Default)]
pub struct TransformCache {
  entries: DashMap<ArcStr, (u64, Arc<CachedTransform>)>,
}

impl TransformCache {
  pub fn source_hash(source: &str) -> u64 {
    xxhash_u64(source.as_bytes())
  }

  pub fn get(&self, id: &str, source_hash: u64) -> Option<Arc<CachedTransform>> {
    self
      .entries
      .get(id)
      .filter(|entry| entry.0 == source_hash)
      .map(|entry| Arc::clone(&entry.1))
  }

  pub fn insert(&self, id: ArcStr, source_hash: u64, transformed: CachedTransform) {
    self.entries.insert(id, (source_hash, Arc::new(transformed)));
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn clear(&self) {
    self.entries.clear();
  }

  pub fn invalidate(&self, is_stale: impl Fn(&str) -> bool) {
    self.entries.retain(|id, _| !is_stale(id));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn transformed(code: &str) -> CachedTransform {
    CachedTransform {
      code: code.to_string(),
      sourcemap_chain: vec![],
      emitted_assets: vec![],
      warnings: vec![],
    }
  }

  #[test]
  fn hits_only_for_the_same_source() {
    let cache = TransformCache::default();
    let hash = TransformCache::source_hash("a");
    cache.insert("/a.js".into(), hash, transformed("A"));
    assert_eq!(cache.get("/a.js", hash).map(|entry| entry.code.clone()).as_deref(), Some("A"));
    assert!(cache.get("/a.js", TransformCache::source_hash("b")).is_none());

    cache.insert("/a.js".into(), TransformCache::source_hash("b"), transformed("B"));
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn invalidates_by_id() {
    let cache = TransformCache::default();
    cache.insert("/a.js".into(), 1, transformed("A"));
    cache.insert("/b.js".into(), 1, transformed("B"));
    cache.invalidate(|id| id == "/a.js");
    assert!(cache.get("/a.js", 1).is_none());
    assert!(cache.get("/b.js", 1).is_some());
  }
}
