use std::{
  io,
  path::{Path, PathBuf},
};

/// File access used by the built-in resolver, the loader and `Bundler::write`.
///
/// Implementations must be cheap to share between module tasks.
pub trait FileSystem: Send + Sync + 'static {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let bytes = self.read(path)?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn is_file(&self, path: &Path) -> bool;

  fn is_dir(&self, path: &Path) -> bool;

  fn exists(&self, path: &Path) -> bool {
    self.is_file(path) || self.is_dir(path)
  }

  /// Whether `path` itself is a symbolic link. `is_file` and `is_dir` follow links.
  fn is_symlink(&self, _path: &Path) -> bool {
    false
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    Err(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("{} is not a symbolic link", path.display()),
    ))
  }
}
