use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use dashmap::{DashMap, DashSet};
use sugar_path::SugarPath;

use crate::FileSystem;

/// In-memory file system. Directories exist implicitly as ancestors of added files.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
  files: DashMap<PathBuf, Arc<[u8]>>,
  dirs: DashSet<PathBuf>,
}

impl MemoryFileSystem {
  pub fn new<P: AsRef<Path>, C: AsRef<[u8]>>(files: impl IntoIterator<Item = (P, C)>) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(path.as_ref(), content.as_ref());
    }
    fs
  }

  pub fn add_file(&self, path: &Path, content: impl AsRef<[u8]>) {
    let path = path.normalize();
    self.add_ancestors(&path);
    self.files.insert(path, Arc::from(content.as_ref()));
  }

  fn add_ancestors(&self, path: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
      if !self.dirs.insert(dir.to_path_buf()) {
        break;
      }
      current = dir.parent();
    }
  }
}

impl FileSystem for MemoryFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.files.get(&path.normalize()).map(|content| content.to_vec()).ok_or_else(|| {
      io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display()))
    })
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    self.add_file(path, content);
    Ok(())
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    let path = path.normalize();
    self.add_ancestors(&path);
    self.dirs.insert(path);
    Ok(())
  }

  fn is_file(&self, path: &Path) -> bool {
    self.files.contains_key(&path.normalize())
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.dirs.contains(&path.normalize())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn directories_are_implied_by_files() {
    let fs = MemoryFileSystem::new([("/project/src/main.js", "export {}")]);
    assert!(fs.is_dir(Path::new("/project")));
    assert!(fs.is_dir(Path::new("/project/src")));
    assert!(fs.is_file(Path::new("/project/src/../src/main.js")));
    assert!(!fs.is_file(Path::new("/project/src")));
    assert_eq!(fs.read_to_string(Path::new("/project/src/main.js")).unwrap(), "export {}");
  }

  #[test]
  fn missing_files_are_not_found() {
    let fs = MemoryFileSystem::default();
    let err = fs.read(Path::new("/nope.js")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
  }
}
