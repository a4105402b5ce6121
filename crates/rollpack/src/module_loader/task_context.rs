use std::sync::Arc;

use rollpack_common::ModuleLoaderMsg;
use rollpack_fs::SharedFileSystem;
use rollpack_plugin::SharedPluginDriver;

use super::transform_cache::TransformCache;
use crate::types::SharedOptions;

/// Used to store common data shared between all tasks.
pub struct TaskContext {
  pub fs: SharedFileSystem,
  pub options: SharedOptions,
  pub plugin_driver: SharedPluginDriver,
  pub transform_cache: Arc<TransformCache>,
  pub tx: tokio::sync::mpsc::Sender<ModuleLoaderMsg>,
}
