use crate::SourceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalLocation {
  pub source_id: u32,
  pub line: u32,
  pub column: u32,
  pub name_id: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct LineToken {
  dst_col: u32,
  location: OriginalLocation,
}

/// Per-line index over the tokens of a map for `(line, column)` queries on the generated side.
#[derive(Debug)]
pub struct SourceMapLookup {
  lines: Vec<Vec<LineToken>>,
}

impl SourceMapLookup {
  pub fn new(map: &SourceMap) -> Self {
    let mut lines: Vec<Vec<LineToken>> = Vec::new();
    for token in map.get_tokens() {
      let Some(source_id) = token.get_source_id() else {
        continue;
      };
      let line = token.get_dst_line() as usize;
      if lines.len() <= line {
        lines.resize_with(line + 1, Vec::new);
      }
      lines[line].push(LineToken {
        dst_col: token.get_dst_col(),
        location: OriginalLocation {
          source_id,
          line: token.get_src_line(),
          column: token.get_src_col(),
          name_id: token.get_name_id(),
        },
      });
    }
    for line in &mut lines {
      line.sort_by_key(|token| token.dst_col);
    }
    Self { lines }
  }

  /// The closest mapping at or before `column` on `line`. Mappings never span lines.
  pub fn original_location(&self, line: u32, column: u32) -> Option<OriginalLocation> {
    let tokens = self.lines.get(line as usize)?;
    let idx = tokens.partition_point(|token| token.dst_col <= column);
    if idx == 0 {
      return None;
    }
    Some(tokens[idx - 1].location)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SourceMapBuilder;

  #[test]
  fn finds_nearest_token_on_the_same_line() {
    let mut builder = SourceMapBuilder::default();
    let id = builder.set_source_and_content("a.js", "let a = 1;\nlet b = 2;");
    builder.add_token(0, 0, 0, 0, Some(id), None);
    builder.add_token(0, 4, 0, 4, Some(id), None);
    builder.add_token(1, 2, 1, 0, Some(id), None);
    let lookup = SourceMapLookup::new(&builder.into_sourcemap());

    let found = lookup.original_location(0, 6).unwrap();
    assert_eq!((found.line, found.column), (0, 4));
    assert!(lookup.original_location(1, 1).is_none());
    assert_eq!(lookup.original_location(1, 9).unwrap().line, 1);
    assert!(lookup.original_location(5, 0).is_none());
  }
}
