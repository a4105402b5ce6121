use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use oxc_resolver::FileMetadata;

use crate::SharedFileSystem;

/// Lets `oxc_resolver` walk any [`FileSystem`](crate::FileSystem), the in-memory one included.
#[derive(Clone)]
pub struct ResolverFileSystem(SharedFileSystem);

impl ResolverFileSystem {
  pub fn new(fs: &SharedFileSystem) -> Self {
    Self(Arc::clone(fs))
  }
}

impl std::fmt::Debug for ResolverFileSystem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("ResolverFileSystem").finish_non_exhaustive()
  }
}

impl oxc_resolver::FileSystem for ResolverFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    self.0.read_to_string(path)
  }

  fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    if self.0.is_file(path) {
      Ok(FileMetadata::new(true, false, false))
    } else if self.0.is_dir(path) {
      Ok(FileMetadata::new(false, true, false))
    } else {
      Err(io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display())))
    }
  }

  fn symlink_metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    if self.0.is_symlink(path) {
      return Ok(FileMetadata::new(false, false, true));
    }
    self.metadata(path)
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    self.0.read_link(path)
  }
}

#[cfg(test)]
mod tests {
  use oxc_resolver::FileSystem as _;

  use super::*;
  use crate::MemoryFileSystem;

  #[test]
  fn reports_memory_entries_to_the_resolver() {
    let memory: SharedFileSystem =
      Arc::new(MemoryFileSystem::new([("/project/src/main.js", "export {}")]));
    let fs = ResolverFileSystem::new(&memory);

    assert!(fs.metadata(Path::new("/project/src/main.js")).is_ok());
    assert!(fs.symlink_metadata(Path::new("/project/src")).is_ok());
    assert_eq!(
      fs.metadata(Path::new("/project/missing.js")).unwrap_err().kind(),
      io::ErrorKind::NotFound
    );
    assert_eq!(fs.read_to_string(Path::new("/project/src/main.js")).unwrap(), "export {}");
    assert!(fs.read_link(Path::new("/project/src/main.js")).is_err());
  }
}
