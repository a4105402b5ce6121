mod file_system;
mod memory;
mod os;
mod resolver_fs;

pub use crate::{
  file_system::FileSystem, memory::MemoryFileSystem, os::OsFileSystem,
  resolver_fs::ResolverFileSystem,
};

pub type SharedFileSystem = std::sync::Arc<dyn FileSystem>;
