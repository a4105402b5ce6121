use rustc_hash::FxHashMap;

use crate::{SourceMap, SourceMapBuilder};

/// `SourceMapBuilder` that deduplicates sources and names copied over from other maps.
#[derive(Default)]
pub(crate) struct MapWriter {
  builder: SourceMapBuilder,
  sources: FxHashMap<String, u32>,
  names: FxHashMap<String, u32>,
}

/// Translates source and name ids of one foreign map into ids of a `MapWriter`.
#[derive(Default)]
pub(crate) struct IdTranslation {
  sources: FxHashMap<u32, Option<u32>>,
  names: FxHashMap<u32, Option<u32>>,
}

impl MapWriter {
  pub fn source_id(&mut self, source: &str, content: &str) -> u32 {
    if let Some(id) = self.sources.get(source) {
      return *id;
    }
    let id = self.builder.set_source_and_content(source, content);
    self.sources.insert(source.to_string(), id);
    id
  }

  pub fn name_id(&mut self, name: &str) -> u32 {
    if let Some(id) = self.names.get(name) {
      return *id;
    }
    let id = self.builder.add_name(name);
    self.names.insert(name.to_string(), id);
    id
  }

  pub fn import_source(
    &mut self,
    translation: &mut IdTranslation,
    map: &SourceMap,
    id: u32,
  ) -> Option<u32> {
    if let Some(translated) = translation.sources.get(&id) {
      return *translated;
    }
    let translated = map.get_source(id).map(|source| source.to_string()).map(|source| {
      let content =
        map.get_source_content(id).map(|content| content.to_string()).unwrap_or_default();
      self.source_id(&source, &content)
    });
    translation.sources.insert(id, translated);
    translated
  }

  pub fn import_name(
    &mut self,
    translation: &mut IdTranslation,
    map: &SourceMap,
    id: u32,
  ) -> Option<u32> {
    if let Some(translated) = translation.names.get(&id) {
      return *translated;
    }
    let translated =
      map.get_name(id).map(|name| name.to_string()).map(|name| self.name_id(&name));
    translation.names.insert(id, translated);
    translated
  }

  pub fn add_token(
    &mut self,
    dst_line: u32,
    dst_col: u32,
    src_line: u32,
    src_col: u32,
    source_id: Option<u32>,
    name_id: Option<u32>,
  ) {
    self.builder.add_token(dst_line, dst_col, src_line, src_col, source_id, name_id);
  }

  pub fn into_sourcemap(self) -> SourceMap {
    self.builder.into_sourcemap()
  }
}
