use arcstr::ArcStr;

use crate::{OutputAsset, OutputChunk};

/// One file of the output set.
#[derive(Debug, Clone)]
pub enum Output {
  Chunk(Box<OutputChunk>),
  Asset(Box<OutputAsset>),
}

impl Output {
  pub fn file_name(&self) -> &ArcStr {
    match self {
      Self::Chunk(chunk) => &chunk.file_name,
      Self::Asset(asset) => &asset.file_name,
    }
  }

  pub fn content_as_bytes(&self) -> &[u8] {
    match self {
      Self::Chunk(chunk) => chunk.code.as_bytes(),
      Self::Asset(asset) => asset.content_as_bytes(),
    }
  }

  pub fn as_chunk(&self) -> Option<&OutputChunk> {
    match self {
      Self::Chunk(chunk) => Some(chunk),
      Self::Asset(_) => None,
    }
  }

  pub fn as_asset(&self) -> Option<&OutputAsset> {
    match self {
      Self::Asset(asset) => Some(asset),
      Self::Chunk(_) => None,
    }
  }
}
