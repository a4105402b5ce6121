use crate::{
  map_writer::{IdTranslation, MapWriter},
  Source, SourceMap,
};

/// Concatenates sources with `\n`, shifting each source's mappings by the lines before it.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
  prepend_source: Vec<Box<dyn Source + Send + 'source>>,
  enable_sourcemap: bool,
}

impl<'source> SourceJoiner<'source> {
  pub fn new(enable_sourcemap: bool) -> Self {
    Self { enable_sourcemap, ..Self::default() }
  }

  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn prepend_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.prepend_source.push(Box::new(source));
  }

  pub fn join(&self) -> (String, Option<SourceMap>) {
    let sources = self.prepend_source.iter().chain(self.inner.iter());
    let capacity = self.prepend_source.iter().chain(self.inner.iter()).map(|s| s.content().len() + 1).sum();
    let mut code = String::with_capacity(capacity);
    let mut writer = self.enable_sourcemap.then(MapWriter::default);
    let mut line_offset = 0;

    for (index, source) in sources.enumerate() {
      if index > 0 {
        code.push('\n');
        line_offset += 1;
      }
      code.push_str(source.content());
      if let (Some(writer), Some(map)) = (writer.as_mut(), source.sourcemap()) {
        let mut translation = IdTranslation::default();
        for token in map.get_tokens() {
          let source_id =
            token.get_source_id().and_then(|id| writer.import_source(&mut translation, map, id));
          let name_id =
            token.get_name_id().and_then(|id| writer.import_name(&mut translation, map, id));
          writer.add_token(
            token.get_dst_line() + line_offset,
            token.get_dst_col(),
            token.get_src_line(),
            token.get_src_col(),
            source_id,
            name_id,
          );
        }
      }
      line_offset += source.lines_count();
    }

    (code, writer.map(MapWriter::into_sourcemap))
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use string_wizard::{MagicString, SourceMapOptions};

  use super::*;
  use crate::{SourceMapLookup, SourceMapSource};

  #[test]
  fn offsets_mappings_by_previous_lines() {
    let module = "export const a = 1;\nexport const b = 2;";
    let mut magic_string = MagicString::new(module);
    magic_string.remove(20, 27);
    let map = magic_string
      .source_map(SourceMapOptions { source: "src/b.js".into(), ..Default::default() });

    let mut joiner = SourceJoiner::new(true);
    joiner.append_source("// runtime\nvar x;");
    joiner.append_source(SourceMapSource::new(magic_string.to_string(), map));
    joiner.prepend_source("/* banner */");
    let (code, map) = joiner.join();

    assert_eq!(code, "/* banner */\n// runtime\nvar x;\nexport const a = 1;\nconst b = 2;");
    let lookup = SourceMapLookup::new(&map.unwrap());
    let location = lookup.original_location(4, 6).unwrap();
    assert_eq!((location.line, location.column), (1, 7));
  }
}
