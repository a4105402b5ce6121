mod collapse;
mod lines_count;
mod lookup;
mod map_writer;
mod source;
mod source_joiner;

pub use oxc_sourcemap::{SourceMap, SourceMapBuilder};

pub use crate::{
  collapse::{collapse_sourcemaps, line_identity_map, retarget_single_source, rewrite_sources},
  lines_count::lines_count,
  lookup::{OriginalLocation, SourceMapLookup},
  source::{Source, SourceMapSource},
  source_joiner::SourceJoiner,
};

/// `data:` URL used by inline sourcemaps.
pub fn to_data_url(map: &SourceMap) -> String {
  let base64 = rollpack_utils::base64::to_standard_base64(map.to_json_string());
  rollpack_utils::concat_string!("data:application/json;charset=utf-8;base64,", base64)
}
