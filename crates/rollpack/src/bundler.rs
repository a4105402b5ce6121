use std::{
  future::Future,
  path::Path,
  sync::{Arc, Mutex, PoisonError},
};

use itertools::Itertools;
use rollpack_common::{BundlerOptions, Output, ResolveOptions};
use rollpack_error::{BuildDiagnostic, BuildResult, Diagnostics};
use rollpack_fs::{OsFileSystem, SharedFileSystem};
use rollpack_plugin::{PluginDriver, PluginRegistry, ResolveCache, SharedPluginDriver};
use rollpack_resolver::Resolver;
use rustc_hash::FxHashSet;
use sugar_path::SugarPath;
use tokio_util::sync::CancellationToken;

use crate::{
  module_loader::transform_cache::TransformCache,
  stages::{
    generate::GenerateStage,
    link::{LinkStage, LinkStageOutput},
    scan::ScanStage,
  },
  types::{bundle_output::BundleOutput, SharedOptions},
  utils::{
    assemble_output::assemble_output,
    normalize_options::{normalize_options, NormalizeOptionsReturn},
  },
};

/// Where the last (or current) build is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlerState {
  Configured,
  Resolving,
  Loading,
  GraphBuilt,
  Chunked,
  Rendered,
  Assembled,
  Done,
  Failed,
}

/// Aborts the build that is running when `cancel` is called, or the next one.
#[derive(Debug, Clone)]
pub struct CancelHandle {
  token: Arc<Mutex<CancellationToken>>,
}

impl CancelHandle {
  pub fn cancel(&self) {
    self.token.lock().unwrap_or_else(PoisonError::into_inner).cancel();
  }

  pub fn is_cancelled(&self) -> bool {
    self.token.lock().unwrap_or_else(PoisonError::into_inner).is_cancelled()
  }
}

pub struct Bundler {
  closed: bool,
  state: BundlerState,
  fs: SharedFileSystem,
  options: SharedOptions,
  resolve_options: ResolveOptions,
  plugins: PluginRegistry,
  resolve_cache: Arc<ResolveCache>,
  transform_cache: Arc<TransformCache>,
  cancel_token: Arc<Mutex<CancellationToken>>,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> BuildResult<Self> {
    Self::with_plugins(options, PluginRegistry::new())
  }

  pub fn with_plugins(options: BundlerOptions, plugins: PluginRegistry) -> BuildResult<Self> {
    Self::with_file_system(options, plugins, Arc::new(OsFileSystem))
  }

  pub fn with_file_system(
    options: BundlerOptions,
    plugins: PluginRegistry,
    fs: SharedFileSystem,
  ) -> BuildResult<Self> {
    let NormalizeOptionsReturn { options, resolve_options } = normalize_options(options)?;
    tracing::debug!(plugins = plugins.len(), cwd = %options.cwd.display(), "bundler configured");

    Ok(Self {
      closed: false,
      state: BundlerState::Configured,
      fs,
      options: Arc::new(options),
      resolve_options,
      plugins,
      resolve_cache: Arc::default(),
      transform_cache: Arc::default(),
      cancel_token: Arc::default(),
    })
  }

  pub async fn generate(&mut self) -> BuildResult<BundleOutput> {
    self.build(false).await
  }

  /// Same as `generate`, then writes every output file below `dir`.
  pub async fn write(&mut self) -> BuildResult<BundleOutput> {
    self.build(true).await
  }

  /// Later builds fail with `ALREADY_CLOSED`.
  pub fn close(&mut self) {
    self.closed = true;
    self.resolve_cache.clear();
    self.transform_cache.clear();
  }

  pub fn closed(&self) -> bool {
    self.closed
  }

  pub fn state(&self) -> BundlerState {
    self.state
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  pub fn cancel_handle(&self) -> CancelHandle {
    CancelHandle { token: Arc::clone(&self.cancel_token) }
  }

  /// Forgets cached resolutions and transforms involving `paths`. Relative paths are relative to
  /// `cwd`.
  pub fn invalidate<P: AsRef<Path>>(&self, paths: &[P]) {
    let stale = paths
      .iter()
      .map(|path| self.options.cwd.join(path).normalize().to_string_lossy().into_owned())
      .collect::<FxHashSet<_>>();
    tracing::debug!(files = stale.len(), "invalidating caches");
    self.resolve_cache.invalidate(|id| stale.contains(id));
    self.transform_cache.invalidate(|id| stale.contains(id));
  }

  async fn build(&mut self, is_write: bool) -> BuildResult<BundleOutput> {
    if self.closed {
      return Err(BuildDiagnostic::already_closed().into());
    }

    let token = self.cancel_token.lock().unwrap_or_else(PoisonError::into_inner).clone();
    let diagnostics = Arc::new(Diagnostics::new(self.options.log_level.min_severity()));
    let resolver = Arc::new(Resolver::new(
      self.resolve_options.clone(),
      self.options.platform,
      self.options.cwd.clone(),
      Arc::clone(&self.fs),
    ));
    let plugin_driver = PluginDriver::new_shared(
      self.plugins.to_vec(),
      resolver,
      Arc::clone(&self.resolve_cache),
      Arc::clone(&self.options),
      Arc::clone(&diagnostics),
    );

    let result = self.run_build(&plugin_driver, &token, is_write).await;

    if self.options.cache {
      self.resolve_cache.retain_resolved();
    } else {
      self.resolve_cache.clear();
      self.transform_cache.clear();
    }

    match result {
      Ok(assets) => {
        self.state = BundlerState::Done;
        tracing::info!(outputs = assets.len(), "build finished");
        Ok(BundleOutput { assets, warnings: diagnostics.warnings() })
      }
      Err(errors) => {
        self.state = BundlerState::Failed;
        if token.is_cancelled() {
          tracing::warn!("build cancelled");
          *self.cancel_token.lock().unwrap_or_else(PoisonError::into_inner) =
            CancellationToken::new();
        }
        for diagnostic in errors.into_vec() {
          diagnostics.push(diagnostic);
        }
        Err(diagnostics.to_failure())
      }
    }
  }

  async fn run_build(
    &mut self,
    plugin_driver: &SharedPluginDriver,
    token: &CancellationToken,
    is_write: bool,
  ) -> BuildResult<Vec<Output>> {
    let mut link_output = match self.scan_and_link(plugin_driver, token).await {
      Ok(link_output) => link_output,
      Err(errors) => {
        if !token.is_cancelled() {
          let reported = errors.errors().cloned().collect_vec();
          if let Err(err) = plugin_driver.build_end(Some(&reported)).await {
            plugin_driver.diagnostics().push(err);
          }
        }
        return Err(errors);
      }
    };
    for warning in std::mem::take(&mut link_output.warnings) {
      plugin_driver.diagnostics().push(warning);
    }
    cancellable(token, plugin_driver.build_end(None)).await?;

    cancellable(token, plugin_driver.render_start()).await?;
    let generate_stage = GenerateStage::new(&link_output, &self.options, plugin_driver);
    let chunk_graph = generate_stage.generate_chunk_graph()?;
    self.state = BundlerState::Chunked;
    tracing::debug!(chunks = chunk_graph.chunk_table.len(), "chunk graph generated");

    let rendered = cancellable(token, generate_stage.render(&chunk_graph)).await?;
    self.state = BundlerState::Rendered;
    tracing::debug!("chunks rendered");

    let outputs = cancellable(token, assemble_output(plugin_driver, rendered, is_write)).await?;
    self.state = BundlerState::Assembled;
    tracing::debug!(outputs = outputs.len(), "output assembled");

    if is_write {
      if token.is_cancelled() {
        return Err(BuildDiagnostic::cancelled().into());
      }
      self.write_outputs(&outputs)?;
      let mut outputs = outputs;
      cancellable(token, plugin_driver.write_bundle(&mut outputs)).await?;
      return Ok(outputs);
    }
    Ok(outputs)
  }

  async fn scan_and_link(
    &mut self,
    plugin_driver: &SharedPluginDriver,
    token: &CancellationToken,
  ) -> BuildResult<LinkStageOutput> {
    self.state = BundlerState::Resolving;
    cancellable(token, plugin_driver.build_start()).await?;

    let scan_stage = ScanStage::new(
      Arc::clone(&self.fs),
      Arc::clone(&self.options),
      Arc::clone(plugin_driver),
      Arc::clone(&self.transform_cache),
    );
    let entries = cancellable(token, scan_stage.resolve_user_defined_entries()).await?;

    self.state = BundlerState::Loading;
    tracing::debug!("loading modules");
    let scan_output = cancellable(token, scan_stage.scan(entries)).await?;
    tracing::debug!(modules = scan_output.module_table.len(), "modules loaded");

    let link_output = LinkStage::new(scan_output, &self.options).link();
    for module in link_output.module_table.iter().filter(|module| module.is_included()) {
      plugin_driver.module_infos().insert(module.id().into(), Arc::new(module.to_module_info()));
    }
    self.state = BundlerState::GraphBuilt;
    Ok(link_output)
  }

  fn write_outputs(&self, outputs: &[Output]) -> Result<(), BuildDiagnostic> {
    let out_dir = self.options.out_dir();
    for output in outputs {
      let path = out_dir.join(output.file_name().as_str());
      if let Some(parent) = path.parent() {
        self
          .fs
          .create_dir_all(parent)
          .map_err(|err| BuildDiagnostic::io_error(&parent.to_string_lossy(), err))?;
      }
      self
        .fs
        .write(&path, output.content_as_bytes())
        .map_err(|err| BuildDiagnostic::io_error(&path.to_string_lossy(), err))?;
    }
    tracing::debug!(files = outputs.len(), dir = %out_dir.display(), "output written");
    Ok(())
  }
}

/// Runs `fut` unless `token` fires first. The future is dropped on cancellation, which aborts the
/// module tasks it owns.
async fn cancellable<T, E>(
  token: &CancellationToken,
  fut: impl Future<Output = Result<T, E>>,
) -> BuildResult<T>
where
  E: Into<rollpack_error::BatchedBuildDiagnostic>,
{
  tokio::select! {
    biased;
    () = token.cancelled() => Err(BuildDiagnostic::cancelled().into()),
    result = fut => result.map_err(Into::into),
  }
}

/// Bundles `options` with `plugins` in one call.
pub async fn build(options: BundlerOptions, plugins: PluginRegistry) -> BuildResult<BundleOutput> {
  let mut bundler = Bundler::with_plugins(options, plugins)?;
  let output = bundler.generate().await;
  bundler.close();
  output
}
