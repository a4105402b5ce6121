use std::path::Path;

use rollpack_common::{ModuleType, ResolvedId};
use rollpack_error::BuildDiagnostic;
use rollpack_fs::FileSystem;
use rollpack_plugin::PluginDriver;
use rollpack_sourcemap::SourceMap;

pub struct LoadedSource {
  pub code: String,
  /// Returned by a `load` hook, maps `code` to whatever the plugin loaded it from.
  pub map: Option<SourceMap>,
  pub module_type: ModuleType,
}

/// The first `load` hook claiming the id wins, otherwise the file is read from `fs`. Ids
/// starting with `\0` never touch the file system.
pub async fn load_source(
  plugin_driver: &PluginDriver,
  fs: &dyn FileSystem,
  resolved_id: &ResolvedId,
  importer: Option<&str>,
) -> Result<LoadedSource, BuildDiagnostic> {
  let guessed_type = ModuleType::from_path(resolved_id.path());

  if let Some(output) = plugin_driver.load(&resolved_id.id).await? {
    return Ok(LoadedSource {
      code: output.code,
      map: output.map,
      module_type: output.module_type.unwrap_or(guessed_type),
    });
  }

  let debug_id = resolved_id.debug_id(&plugin_driver.options().cwd);
  if resolved_id.id.starts_with('\0') {
    return Err(BuildDiagnostic::load_error(
      &debug_id,
      importer,
      "no plugin loaded this virtual module",
    ));
  }

  let code = fs
    .read_to_string(Path::new(resolved_id.path()))
    .map_err(|err| BuildDiagnostic::load_error(&debug_id, importer, err))?;
  Ok(LoadedSource { code, map: None, module_type: guessed_type })
}
