use std::sync::Arc;

use arcstr::ArcStr;
use dashmap::DashMap;
use rollpack_common::ResolvedId;
use rollpack_error::BuildDiagnostic;
use tokio::sync::OnceCell;

use crate::{plugin_driver::ResolveRequest, types::plugin_idx::PluginIdx};

type ResolveCell = Arc<OnceCell<Result<ResolvedId, BuildDiagnostic>>>;

/// One resolution per importer and specifier, whatever the kind of import asking for it. A plugin
/// resolving through its context without its own hooks gets an entry of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolveKey {
  importer: Option<ArcStr>,
  specifier: ArcStr,
  skip: Option<PluginIdx>,
}

impl From<&ResolveRequest<'_>> for ResolveKey {
  fn from(request: &ResolveRequest<'_>) -> Self {
    Self {
      importer: request.importer.map(ArcStr::from),
      specifier: request.specifier.into(),
      skip: request.skip,
    }
  }
}

/// In-flight and finished resolutions, keyed by importer and specifier.
#[derive(Debug, Default)]
pub struct ResolveCache {
  entries: DashMap<ResolveKey, ResolveCell>,
}

impl ResolveCache {
  /// The cell is cloned out so no map guard is held while the resolution is awaited.
  pub(crate) fn cell(&self, key: ResolveKey) -> ResolveCell {
    Arc::clone(self.entries.entry(key).or_default().value())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn clear(&self) {
    self.entries.clear();
  }

  /// Drops failures and unfinished entries so the next build retries them.
  pub fn retain_resolved(&self) {
    self.entries.retain(|_, cell| matches!(cell.get(), Some(Ok(_))));
  }

  /// Drops every entry whose importer or result is a stale file.
  pub fn invalidate(&self, is_stale: impl Fn(&str) -> bool) {
    self.entries.retain(|key, cell| {
      let importer_is_stale = key.importer.as_deref().is_some_and(&is_stale);
      let result_is_stale = matches!(cell.get(), Some(Ok(resolved)) if is_stale(resolved.path()));
      !importer_is_stale && !result_is_stale
    });
  }
}

#[cfg(test)]
mod tests {
  use rollpack_common::ImportKind;

  use super::*;

  fn key(importer: Option<&str>, specifier: &str) -> ResolveKey {
    ResolveKey::from(&ResolveRequest { importer, specifier, kind: ImportKind::Import, skip: None })
  }

  #[test]
  fn the_kind_of_import_does_not_split_the_key() {
    let dynamic = ResolveKey::from(&ResolveRequest {
      importer: Some("/a.js"),
      specifier: "./b",
      kind: ImportKind::DynamicImport,
      skip: None,
    });
    assert_eq!(key(Some("/a.js"), "./b"), dynamic);
  }

  #[tokio::test]
  async fn same_key_shares_one_cell() {
    let cache = ResolveCache::default();
    let first = cache.cell(key(Some("/a.js"), "./b"));
    first.get_or_init(|| async { Ok(ResolvedId::new("/b.js")) }).await;
    let second = cache.cell(key(Some("/a.js"), "./b"));
    let resolved = second.get().and_then(|result| result.as_ref().ok()).map(|id| id.id.as_str());
    assert_eq!(resolved, Some("/b.js"));
    assert_eq!(cache.len(), 1);
  }

  #[tokio::test]
  async fn retain_and_invalidate() {
    let cache = ResolveCache::default();
    for (specifier, id) in [("./b", "/b.js"), ("./c", "/c.js")] {
      cache.cell(key(Some("/a.js"), specifier)).get_or_init(|| async { Ok(ResolvedId::new(id)) }).await;
    }
    cache
      .cell(key(Some("/a.js"), "./missing"))
      .get_or_init(|| async { Err(BuildDiagnostic::unresolved_import("./missing", "a.js")) })
      .await;
    let _pending = cache.cell(key(None, "./main"));
    assert_eq!(cache.len(), 4);

    cache.retain_resolved();
    assert_eq!(cache.len(), 2);

    cache.invalidate(|path| path == "/c.js");
    assert_eq!(cache.len(), 1);
    cache.invalidate(|path| path == "/a.js");
    assert!(cache.is_empty());
  }
}
