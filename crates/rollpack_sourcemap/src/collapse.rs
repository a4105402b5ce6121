use crate::{
  lines_count,
  lookup::SourceMapLookup,
  map_writer::{IdTranslation, MapWriter},
  SourceMap,
};

/// Composes `chain` into a single map from the last generated code back to the sources of the
/// first map. `chain[0]` is the map closest to the original files.
pub fn collapse_sourcemaps(chain: &[&SourceMap]) -> Option<SourceMap> {
  let (last, rest) = chain.split_last()?;
  if rest.is_empty() {
    return Some((*last).clone());
  }

  let lookups = rest.iter().map(|map| SourceMapLookup::new(map)).collect::<Vec<_>>();
  let first = rest[0];
  let mut writer = MapWriter::default();
  let mut translation = IdTranslation::default();

  for token in last.get_tokens() {
    if token.get_source_id().is_none() {
      continue;
    }
    let mut line = token.get_src_line();
    let mut column = token.get_src_col();
    let mut original = None;
    for lookup in lookups.iter().rev() {
      let Some(location) = lookup.original_location(line, column) else {
        original = None;
        break;
      };
      line = location.line;
      column = location.column;
      original = Some(location);
    }
    let Some(original) = original else {
      continue;
    };
    let source_id = writer.import_source(&mut translation, first, original.source_id);
    let name_id =
      original.name_id.and_then(|name_id| writer.import_name(&mut translation, first, name_id));
    writer.add_token(
      token.get_dst_line(),
      token.get_dst_col(),
      original.line,
      original.column,
      source_id,
      name_id,
    );
  }

  Some(writer.into_sourcemap())
}

/// Maps the start of every line of `code` to the same line of `original`.
pub fn line_identity_map(source: &str, original: &str, code: &str) -> SourceMap {
  let mut writer = MapWriter::default();
  let source_id = writer.source_id(source, original);
  let original_lines = lines_count(original);
  for line in 0..=lines_count(code).min(original_lines) {
    writer.add_token(line, 0, line, 0, Some(source_id), None);
  }
  writer.into_sourcemap()
}

/// Points every mapping of `map` at a single `source` with the given content.
pub fn retarget_single_source(map: &SourceMap, source: &str, content: &str) -> SourceMap {
  let mut writer = MapWriter::default();
  let source_id = writer.source_id(source, content);
  let mut translation = IdTranslation::default();
  for token in map.get_tokens() {
    let name_id = token.get_name_id().and_then(|id| writer.import_name(&mut translation, map, id));
    writer.add_token(
      token.get_dst_line(),
      token.get_dst_col(),
      token.get_src_line(),
      token.get_src_col(),
      token.get_source_id().map(|_| source_id),
      name_id,
    );
  }
  writer.into_sourcemap()
}

/// Renames every source of `map`, keeping all mappings.
pub fn rewrite_sources(map: &SourceMap, mut rename: impl FnMut(&str) -> String) -> SourceMap {
  let mut writer = MapWriter::default();
  let mut source_ids = rustc_hash::FxHashMap::default();
  let mut translation = IdTranslation::default();
  for token in map.get_tokens() {
    let source_id = token.get_source_id().and_then(|id| {
      if let Some(translated) = source_ids.get(&id) {
        return Some(*translated);
      }
      let source = map.get_source(id).map(|source| source.to_string())?;
      let content = map.get_source_content(id).map(|content| content.to_string()).unwrap_or_default();
      let translated = writer.source_id(&rename(&source), &content);
      source_ids.insert(id, translated);
      Some(translated)
    });
    let name_id = token.get_name_id().and_then(|id| writer.import_name(&mut translation, map, id));
    writer.add_token(
      token.get_dst_line(),
      token.get_dst_col(),
      token.get_src_line(),
      token.get_src_col(),
      source_id,
      name_id,
    );
  }
  writer.into_sourcemap()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{SourceMapBuilder, SourceMapLookup};

  fn shift_map(source: &str, content: &str, line_offset: u32) -> SourceMap {
    let mut builder = SourceMapBuilder::default();
    let id = builder.set_source_and_content(source, content);
    for line in 0..=lines_count(content) {
      builder.add_token(line + line_offset, 0, line, 0, Some(id), None);
    }
    builder.into_sourcemap()
  }

  #[test]
  fn collapses_a_chain_back_to_the_first_source() {
    // original -> +1 line -> +2 lines
    let original = "a\nb\nc";
    let first = shift_map("src/a.js", original, 1);
    let second = shift_map("intermediate.js", "\na\nb\nc", 2);
    let collapsed = collapse_sourcemaps(&[&first, &second]).unwrap();

    let lookup = SourceMapLookup::new(&collapsed);
    let location = lookup.original_location(4, 0).unwrap();
    assert_eq!(location.line, 1);
    assert_eq!(collapsed.get_source(location.source_id).map(|s| s.to_string()).as_deref(), Some("src/a.js"));
  }

  #[test]
  fn identity_map_stops_at_the_original_line_count() {
    let map = line_identity_map("a.js", "x\ny", "x\ny\nz\nw");
    assert_eq!(map.get_tokens().count(), 2);
  }

  #[test]
  fn rewrites_source_names() {
    let map = shift_map("/project/src/a.js", "a", 0);
    let rewritten = rewrite_sources(&map, |source| source.trim_start_matches("/project/").to_string());
    assert_eq!(rewritten.get_source(0).map(|s| s.to_string()).as_deref(), Some("src/a.js"));
  }
}
