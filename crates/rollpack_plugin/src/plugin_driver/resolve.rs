use std::path::Path;

use rollpack_common::{
  side_effects::DeterminedSideEffects, stabilize_module_id, DynamicImportFallback, ImportKind,
  ResolvedId,
};
use rollpack_error::{BuildDiagnostic, DiagnosticKind};

use crate::{
  resolve_cache::ResolveKey,
  types::{hook_resolve_id::HookResolveIdArgs, plugin_idx::PluginIdx},
  PluginDriver,
};

#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
  /// `None` resolves an entry: relative to `cwd`, never external.
  pub importer: Option<&'a str>,
  pub specifier: &'a str,
  /// Decides whether `resolve_dynamic_import` is consulted. A module importing a specifier both
  /// statically and dynamically asks once, as a static import.
  pub kind: ImportKind,
  /// A plugin whose resolve hooks are not consulted.
  pub skip: Option<PluginIdx>,
}

impl PluginDriver {
  /// Resolves an importer and specifier at most once. Concurrent requests with the same key wait
  /// for the first one, and failures are cached as well so plugins never see the same request
  /// twice. The `dynamic_import_fallback` applies to the cached failure, per request.
  pub async fn resolve_id(&self, request: &ResolveRequest<'_>) -> Result<ResolvedId, BuildDiagnostic> {
    let cell = self.resolve_cache.cell(ResolveKey::from(request));
    let resolved = cell.get_or_init(|| self.resolve_id_uncached(request)).await.clone();
    match resolved {
      Err(err)
        if !request.kind.is_static()
          && err.kind() == DiagnosticKind::UnresolvedImport
          && matches!(self.options.dynamic_import_fallback, DynamicImportFallback::External) =>
      {
        tracing::debug!(specifier = request.specifier, "unresolved dynamic import stays external");
        Ok(ResolvedId::external(request.specifier))
      }
      resolved => resolved,
    }
  }

  async fn resolve_id_uncached(
    &self,
    request: &ResolveRequest<'_>,
  ) -> Result<ResolvedId, BuildDiagnostic> {
    let ResolveRequest { importer, specifier, kind, skip } = *request;
    let is_entry = importer.is_none();
    let is_external = |id: &str| !is_entry && self.options.is_external(id);

    if is_external(specifier) {
      return Ok(ResolvedId::external(specifier));
    }

    let args = HookResolveIdArgs { importer, specifier, kind, is_entry };
    if let Some(output) = self.call_resolve_id_hooks(&args, skip).await? {
      return Ok(ResolvedId {
        is_external: output.external.unwrap_or(false) || is_external(&output.id),
        side_effects: output.side_effects.map(DeterminedSideEffects::UserDefined),
        id: output.id,
      });
    }

    match self.resolver.resolve(importer.map(Path::new), specifier, is_entry) {
      Ok(resolved) => Ok(ResolvedId {
        is_external: resolved.is_external || is_external(&resolved.path),
        side_effects: resolved.side_effects.map(DeterminedSideEffects::PackageJson),
        id: resolved.path,
      }),
      Err(err) => {
        tracing::debug!(specifier, ?importer, %kind, "{err}");
        let Some(importer) = importer else {
          return Err(BuildDiagnostic::unresolved_entry(specifier));
        };
        Err(BuildDiagnostic::unresolved_import(specifier, &stabilize_module_id(importer, &self.options.cwd)))
      }
    }
  }
}
