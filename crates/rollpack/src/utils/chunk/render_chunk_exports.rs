use rollpack_common::{Chunk, IndexModules, OutputFormat};
use rollpack_utils::{
  concat_string,
  ecmascript::{property_access_str, to_js_string_literal, to_module_import_export_name},
};

use crate::stages::link::external_star_exports;

const ENTRY_BINDING: &str = "__rollpack_entry";

/// Names the chunk exports. Only user defined entries export anything.
pub fn get_chunk_export_names(chunk: &Chunk, module_table: &IndexModules) -> Vec<String> {
  chunk
    .user_defined_entry_module_idx()
    .and_then(|idx| module_table[idx].as_normal())
    .map(|module| module.resolved_exports.iter().map(ToString::to_string).collect())
    .unwrap_or_default()
}

/// Code at the end of an entry chunk that runs the entry module and exposes its exports.
///
/// ```js
/// var __rollpack_entry = __rollpack_require("src/main.js");
/// var __rollpack_export_0 = __rollpack_entry.foo;
/// export { __rollpack_export_0 as foo };
/// ```
pub fn render_chunk_exports(
  chunk: &Chunk,
  module_table: &IndexModules,
  format: OutputFormat,
) -> Option<String> {
  let entry = chunk.user_defined_entry_module_idx()?;
  let module = module_table[entry].as_normal()?;
  let require = concat_string!("__rollpack_require(", to_js_string_literal(&module.stable_id), ")");

  if !format.keep_esm_import_export_syntax() {
    return Some(concat_string!("module.exports = ", require, ";"));
  }

  let mut code = concat_string!("var ", ENTRY_BINDING, " = ", require, ";");
  if !module.resolved_exports.is_empty() {
    let mut specifiers = Vec::with_capacity(module.resolved_exports.len());
    for (idx, name) in module.resolved_exports.iter().enumerate() {
      let local = concat_string!("__rollpack_export_", itoa::Buffer::new().format(idx));
      code.push_str(&concat_string!(
        "\nvar ",
        local,
        " = ",
        property_access_str(ENTRY_BINDING, name),
        ";"
      ));
      specifiers.push(concat_string!(local, " as ", to_module_import_export_name(name)));
    }
    code.push_str(&concat_string!("\nexport { ", specifiers.join(", "), " };"));
  }
  for external in external_star_exports(module_table, entry) {
    code.push_str(&concat_string!(
      "\nexport * from ",
      to_js_string_literal(module_table[external].id()),
      ";"
    ));
  }
  Some(code)
}
