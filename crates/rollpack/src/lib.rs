mod bundler;
mod graph;
mod module_loader;
mod stages;
mod types;
mod utils;

pub use crate::{
  bundler::{build, Bundler, BundlerState, CancelHandle},
  types::bundle_output::BundleOutput,
};
pub use rollpack_common::*;
pub use rollpack_error::*;
pub use rollpack_fs::{FileSystem, MemoryFileSystem, OsFileSystem, SharedFileSystem};
pub use rollpack_plugin::*;
