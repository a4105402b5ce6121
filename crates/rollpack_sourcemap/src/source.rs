use crate::{lines_count, SourceMap};

pub trait Source {
  fn content(&self) -> &str;

  fn sourcemap(&self) -> Option<&SourceMap> {
    None
  }

  fn lines_count(&self) -> u32 {
    lines_count(self.content())
  }
}

impl Source for &str {
  fn content(&self) -> &str {
    self
  }
}

impl Source for String {
  fn content(&self) -> &str {
    self
  }
}

/// Code together with the map describing where it came from.
#[derive(Debug)]
pub struct SourceMapSource {
  content: String,
  sourcemap: SourceMap,
}

impl SourceMapSource {
  pub fn new(content: String, sourcemap: SourceMap) -> Self {
    Self { content, sourcemap }
  }
}

impl Source for SourceMapSource {
  fn content(&self) -> &str {
    &self.content
  }

  fn sourcemap(&self) -> Option<&SourceMap> {
    Some(&self.sourcemap)
  }
}

impl Source for Box<dyn Source + Send + Sync> {
  fn content(&self) -> &str {
    self.as_ref().content()
  }

  fn sourcemap(&self) -> Option<&SourceMap> {
    self.as_ref().sourcemap()
  }

  fn lines_count(&self) -> u32 {
    self.as_ref().lines_count()
  }
}
