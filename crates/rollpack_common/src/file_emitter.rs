use std::{path::Path, sync::Arc};

use arcstr::ArcStr;
use dashmap::DashMap;
use rollpack_utils::xxhash::{xxhash_base64_url, xxhash_fixed_len};

use crate::{AssetSource, NormalizedBundlerOptions, OutputAsset};

/// An asset emitted by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmittedAsset {
  /// Fills `[name]` and `[extname]` of `asset_filenames`.
  pub name: Option<String>,
  /// Used as-is, bypassing `asset_filenames`.
  pub file_name: Option<String>,
  pub source: AssetSource,
}

/// Collects the assets emitted during one build. Emitting the same asset twice returns the same
/// reference id.
#[derive(Debug)]
pub struct FileEmitter {
  options: Arc<NormalizedBundlerOptions>,
  files: DashMap<ArcStr, OutputAsset>,
}

pub type SharedFileEmitter = Arc<FileEmitter>;

impl FileEmitter {
  pub fn new(options: Arc<NormalizedBundlerOptions>) -> Self {
    Self { options, files: DashMap::default() }
  }

  pub fn emit_asset(&self, asset: EmittedAsset) -> anyhow::Result<ArcStr> {
    let reference_id = Self::reference_id(&asset);
    if self.files.contains_key(&reference_id) {
      return Ok(reference_id);
    }

    let file_name: ArcStr = match &asset.file_name {
      Some(file_name) => file_name.as_str().into(),
      None => {
        let name = asset.name.as_deref().unwrap_or("asset");
        let path = Path::new(name);
        let extname =
          path.extension().map(|ext| format!(".{}", ext.to_string_lossy())).unwrap_or_default();
        let stem = name.strip_suffix(extname.as_str()).unwrap_or(name);
        let source = asset.source.as_bytes();
        self
          .options
          .asset_filenames
          .render(stem, &extname, |len| Some(xxhash_fixed_len(source, len)))
          .ok_or_else(|| anyhow::anyhow!("Failed to generate a file name for asset {name:?}"))?
          .into()
      }
    };

    ensure_inside_output_dir(&file_name)?;

    self.files.entry(reference_id.clone()).or_insert_with(|| OutputAsset {
      name: asset.name,
      file_name,
      source: asset.source,
    });
    Ok(reference_id)
  }

  pub fn get_file_name(&self, reference_id: &str) -> anyhow::Result<ArcStr> {
    self
      .files
      .get(reference_id)
      .map(|asset| asset.file_name.clone())
      .ok_or_else(|| anyhow::anyhow!("Unable to get file name for unknown file {reference_id:?}"))
  }

  pub fn reference_ids(&self) -> Vec<ArcStr> {
    self.files.iter().map(|entry| entry.key().clone()).collect()
  }

  pub fn asset(&self, reference_id: &str) -> Option<OutputAsset> {
    self.files.get(reference_id).map(|asset| asset.value().clone())
  }

  /// Every emitted asset, sorted by file name.
  pub fn assets(&self) -> Vec<OutputAsset> {
    let mut assets = self.files.iter().map(|entry| entry.value().clone()).collect::<Vec<_>>();
    assets.sort_by(|a, b| {
      a.file_name.cmp(&b.file_name).then_with(|| a.source.as_bytes().cmp(b.source.as_bytes()))
    });
    assets
  }

  fn reference_id(asset: &EmittedAsset) -> ArcStr {
    let mut key = Vec::with_capacity(asset.source.as_bytes().len() + 32);
    key.extend_from_slice(asset.name.as_deref().unwrap_or_default().as_bytes());
    key.push(0);
    key.extend_from_slice(asset.file_name.as_deref().unwrap_or_default().as_bytes());
    key.push(0);
    key.extend_from_slice(asset.source.as_bytes());
    let hash = xxhash_base64_url(&key);
    hash[..8].into()
  }
}

/// Asset file names are joined onto the output directory, so they must stay relative and never
/// climb out of it.
fn ensure_inside_output_dir(file_name: &str) -> anyhow::Result<()> {
  let escapes = file_name.is_empty()
    || file_name.starts_with(['/', '\\'])
    || Path::new(file_name).is_absolute()
    || file_name.split(['/', '\\']).any(|segment| segment == "..");
  if escapes {
    anyhow::bail!(
      "The file name {file_name:?} of an emitted asset must be a relative path inside the output \
       directory"
    );
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::ensure_inside_output_dir;

  #[test]
  fn file_names_stay_inside_the_output_dir() {
    for file_name in ["style.css", "assets/style-1234.css", "nested/./a.txt", "a..b.txt"] {
      assert!(ensure_inside_output_dir(file_name).is_ok(), "{file_name}");
    }
    for file_name in ["", "../outside.txt", "assets/../../outside.txt", "/etc/passwd", "a\\..\\..\\b"] {
      assert!(ensure_inside_output_dir(file_name).is_err(), "{file_name}");
    }
  }
}
