use std::sync::{Arc, Mutex, PoisonError};

use arcstr::ArcStr;
use rollpack_common::{EmittedAsset, ModuleInfo, ModuleType};
use rollpack_error::BuildDiagnostic;
use rollpack_sourcemap::{line_identity_map, SourceMap};

use crate::{
  types::{
    hook_build_end_args::HookBuildEndArgs,
    hook_load::{HookLoadArgs, HookLoadOutput},
    hook_resolve_id::{HookResolveIdArgs, HookResolveIdOutput},
    hook_transform::HookTransformArgs,
    hook_usage::HookUsage,
    plugin_idx::PluginIdx,
  },
  PluginDriver, TransformPluginContext,
};

/// Code produced by the `transform` chain and the assets emitted while producing it.
#[derive(Debug)]
pub struct TransformOutcome {
  pub code: String,
  pub emitted_assets: Vec<EmittedAsset>,
}

impl PluginDriver {
  pub async fn build_start(&self) -> Result<(), BuildDiagnostic> {
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::BUILD_START) {
      plugin
        .call_build_start(ctx)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::BUILD_START, err))?;
    }
    Ok(())
  }

  /// `resolve_dynamic_import` then `resolve_id`, first claim wins.
  pub(crate) async fn call_resolve_id_hooks(
    &self,
    args: &HookResolveIdArgs<'_>,
    skip: Option<PluginIdx>,
  ) -> Result<Option<HookResolveIdOutput>, BuildDiagnostic> {
    if !args.kind.is_static() {
      for (idx, plugin, ctx) in self.plugins_with(HookUsage::RESOLVE_DYNAMIC_IMPORT) {
        if skip == Some(idx) {
          continue;
        }
        let output = plugin
          .call_resolve_dynamic_import(ctx, args)
          .await
          .map_err(|err| self.hook_error(idx, HookUsage::RESOLVE_DYNAMIC_IMPORT, err))?;
        if output.is_some() {
          return Ok(output);
        }
      }
    }

    for (idx, plugin, ctx) in self.plugins_with(HookUsage::RESOLVE_ID) {
      if skip == Some(idx) {
        continue;
      }
      let output = plugin
        .call_resolve_id(ctx, args)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::RESOLVE_ID, err))?;
      if output.is_some() {
        return Ok(output);
      }
    }
    Ok(None)
  }

  pub async fn load(&self, id: &str) -> Result<Option<HookLoadOutput>, BuildDiagnostic> {
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::LOAD) {
      let output = plugin
        .call_load(ctx, &HookLoadArgs { id })
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::LOAD, err))?;
      if output.is_some() {
        return Ok(output);
      }
    }
    Ok(None)
  }

  /// Runs every `transform` hook on the output of the previous one. Returned maps are pushed
  /// onto `sourcemap_chain`. A hook changing the code without a map gets a line-identity map
  /// and a warning while sourcemaps are enabled.
  pub async fn transform(
    &self,
    id: &ArcStr,
    mut code: String,
    module_type: &ModuleType,
    sourcemap_chain: &mut Vec<SourceMap>,
    warnings: &mut Vec<BuildDiagnostic>,
  ) -> Result<TransformOutcome, BuildDiagnostic> {
    let emitted = Arc::new(Mutex::new(Vec::new()));
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::TRANSFORM) {
      tracing::trace!(plugin = %plugin.call_name(), id = %id, "transform");
      let transform_ctx =
        TransformPluginContext::new(ctx.clone(), id.clone(), Arc::clone(&emitted));
      let args = HookTransformArgs { id, code: &code, module_type };
      let Some(output) = plugin
        .call_transform(&transform_ctx, &args)
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::TRANSFORM, err))?
      else {
        continue;
      };

      match output.map {
        Some(map) => sourcemap_chain.push(map),
        None if output.code != code && self.options.sourcemap_enabled() => {
          warnings.push(BuildDiagnostic::sourcemap_broken(id, &plugin.call_name(), "transform"));
          sourcemap_chain.push(line_identity_map(id, &code, &output.code));
        }
        None => {}
      }
      code = output.code;
    }

    let emitted_assets =
      std::mem::take(&mut *emitted.lock().unwrap_or_else(PoisonError::into_inner));
    Ok(TransformOutcome { code, emitted_assets })
  }

  pub async fn module_parsed(&self, module_info: Arc<ModuleInfo>) -> Result<(), BuildDiagnostic> {
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::MODULE_PARSED) {
      plugin
        .call_module_parsed(ctx, Arc::clone(&module_info))
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::MODULE_PARSED, err))?;
    }
    Ok(())
  }

  /// `errors` is `Some` when the build failed.
  pub async fn build_end(&self, errors: Option<&[BuildDiagnostic]>) -> Result<(), BuildDiagnostic> {
    let args = errors.map(|errors| HookBuildEndArgs { errors });
    for (idx, plugin, ctx) in self.plugins_with(HookUsage::BUILD_END) {
      plugin
        .call_build_end(ctx, args.as_ref())
        .await
        .map_err(|err| self.hook_error(idx, HookUsage::BUILD_END, err))?;
    }
    Ok(())
  }
}
