use rollpack_sourcemap::SourceMap;
use rollpack_utils::{
  concat_string,
  ecmascript::{property_access_str, to_js_string_literal, to_module_import_export_name},
};

use string_wizard::{MagicString, SourceMapOptions};

use crate::{ExportEntry, ImportedName, ScanResult};

/// Local holding the value of `export default <expression>`.
pub const DEFAULT_EXPORT_BINDING: &str = "__rollpack_default";

/// How the renderer should treat one import record of the module.
#[derive(Debug, Clone)]
pub enum RecordResolution {
  /// Another module of the bundle, reachable through the registry.
  Internal { stable_id: String },
  /// An external module bound to a chunk-level variable.
  External { binding: String },
  /// Replace the `import(..)` expression with `expression`.
  DynamicImport { expression: String },
  /// Leave the record untouched. Used for dynamic imports of externals.
  Keep,
  /// A plain import of a module that was dropped by tree shaking.
  Pruned,
}

pub struct FactoryRenderInput<'a> {
  pub stable_id: &'a str,
  /// Indexed like `ScanResult::import_records`.
  pub records: &'a [RecordResolution],
  /// Name of the source in the produced map. No map is produced when `None`.
  pub source_name: Option<&'a str>,
}

fn import_var(record: usize) -> String {
  concat_string!("__rollpack_import_", itoa::Buffer::new().format(record))
}

fn record_base(records: &[RecordResolution], record: usize) -> Option<String> {
  match records.get(record)? {
    RecordResolution::Internal { .. } => Some(import_var(record)),
    RecordResolution::External { binding } => Some(binding.clone()),
    RecordResolution::DynamicImport { .. } | RecordResolution::Keep | RecordResolution::Pruned => {
      None
    }
  }
}

/// Empty ranges insert after the code before them and empty contents remove the range.
fn apply_edit(
  magic_string: &mut MagicString<'_>,
  start: u32,
  end: u32,
  content: impl Into<String>,
) {
  let (start, end) = (start as usize, end as usize);
  let content: String = content.into();
  if start == end {
    magic_string.append_left(start, content);
  } else if content.is_empty() {
    magic_string.remove(start, end);
  } else {
    magic_string.update(start, end, content);
  }
}

fn access(base: &str, imported: &ImportedName) -> String {
  match imported {
    ImportedName::Namespace => base.to_string(),
    ImportedName::Named(name) => property_access_str(base, name),
  }
}

/// Rewrites a scanned module into a `__rollpack_define(..)` call.
///
/// Import declarations become registry lookups, reads of imported bindings become live property
/// accesses and exports become getters on the `exports` object.
pub fn render_factory(
  source: &str,
  scan: &ScanResult,
  input: &FactoryRenderInput<'_>,
) -> (String, Option<SourceMap>) {
  let mut magic_string = MagicString::new(source);
  for edit in &scan.module_syntax_edits {
    apply_edit(&mut magic_string, edit.start, edit.end, edit.content.as_str());
  }

  let mut binding_access = Vec::with_capacity(scan.import_bindings.len());
  for binding in &scan.import_bindings {
    let expr = record_base(input.records, binding.record)
      .map_or_else(|| "void 0".to_string(), |base| access(&base, &binding.imported));
    for reference in &binding.references {
      let content = if reference.shorthand {
        concat_string!(binding.local, ": ", expr)
      } else {
        expr.clone()
      };
      apply_edit(&mut magic_string, reference.span.start, reference.span.end, content);
    }
    binding_access.push((binding.local.as_str(), expr));
  }

  for (idx, record) in scan.import_records.iter().enumerate() {
    if !record.is_dynamic {
      continue;
    }
    if let Some(RecordResolution::DynamicImport { expression }) = input.records.get(idx) {
      apply_edit(&mut magic_string, record.span.start, record.span.end, expression.as_str());
    }
  }

  let mut intro = concat_string!(
    "__rollpack_define(",
    to_js_string_literal(input.stable_id),
    ", function (exports, __rollpack_require) {\n"
  );

  if !scan.exports.is_empty() {
    intro.push_str("__rollpack_export(exports, {\n");
    for entry in &scan.exports {
      let expr = match entry {
        ExportEntry::Local { local, .. } => binding_access
          .iter()
          .find(|(name, _)| name == local)
          .map_or_else(|| local.clone(), |(_, expr)| expr.clone()),
        ExportEntry::ReExport { record, imported, .. } => record_base(input.records, *record)
          .map_or_else(|| "void 0".to_string(), |base| access(&base, imported)),
      };
      intro.push_str(&concat_string!(
        "  ",
        to_module_import_export_name(entry.exported()),
        ": () => ",
        expr,
        ",\n"
      ));
    }
    intro.push_str("});\n");
  }

  for (idx, record) in scan.import_records.iter().enumerate() {
    if record.is_dynamic {
      continue;
    }
    if let Some(RecordResolution::Internal { stable_id }) = input.records.get(idx) {
      let require = concat_string!("__rollpack_require(", to_js_string_literal(stable_id), ");\n");
      if record.is_plain {
        intro.push_str(&require);
      } else {
        intro.push_str(&concat_string!("var ", import_var(idx), " = ", require));
      }
    }
  }

  for &record in &scan.star_exports {
    if let Some(base) = record_base(input.records, record) {
      intro.push_str(&concat_string!("__rollpack_reexport(exports, ", base, ");\n"));
    }
  }

  magic_string.prepend(intro);
  magic_string.append(if source.ends_with('\n') { "});" } else { "\n});" });
  let map = input.source_name.map(|source_name| {
    magic_string.source_map(SourceMapOptions {
      include_content: true,
      source: source_name.into(),
      ..Default::default()
    })
  });
  (magic_string.to_string(), map)
}

#[cfg(test)]
mod tests {
  use rollpack_sourcemap::SourceMapLookup;

  use super::*;
  use crate::EcmaScanner;

  fn render(source: &str, records: &[RecordResolution]) -> String {
    let scan = EcmaScanner::scan(source).unwrap();
    let input = FactoryRenderInput { stable_id: "src/main.js", records, source_name: None };
    render_factory(source, &scan, &input).0
  }

  #[test]
  fn rewrites_imports_and_exports() {
    let code = render(
      "import { a } from './a';\nexport const b = a + 1;\n",
      &[RecordResolution::Internal { stable_id: "src/a.js".to_string() }],
    );
    assert_eq!(
      code,
      "__rollpack_define(\"src/main.js\", function (exports, __rollpack_require) {\n\
       __rollpack_export(exports, {\n  b: () => b,\n});\n\
       var __rollpack_import_0 = __rollpack_require(\"src/a.js\");\n\
       \nconst b = __rollpack_import_0.a + 1;\n});"
    );
  }

  #[test]
  fn external_and_shorthand_and_default() {
    let code = render(
      "import ext, * as ns from 'ext';\nexport default { ext, ns };\n",
      &[RecordResolution::External { binding: "__rollpack_external_0".to_string() }],
    );
    assert!(code.contains("default: () => __rollpack_default"));
    assert!(code.contains(
      "var __rollpack_default = { ext: __rollpack_external_0.default, ns: __rollpack_external_0 };"
    ));
    assert!(!code.contains("__rollpack_require("));
  }

  #[test]
  fn dynamic_and_star_and_pruned() {
    let code = render(
      "import './side';\nexport * from './star';\nexport const load = () => import('./lazy');\n",
      &[
        RecordResolution::Pruned,
        RecordResolution::Internal { stable_id: "star.js".to_string() },
        RecordResolution::DynamicImport { expression: "LAZY".to_string() },
      ],
    );
    assert!(!code.contains("side"));
    assert!(code.contains("var __rollpack_import_1 = __rollpack_require(\"star.js\");\n"));
    assert!(code.contains("__rollpack_reexport(exports, __rollpack_import_1);"));
    assert!(code.contains("const load = () => LAZY;"));
  }

  #[test]
  fn produces_a_map_when_asked() {
    let source = "export const a = 1;\n";
    let scan = EcmaScanner::scan(source).unwrap();
    let input = FactoryRenderInput { stable_id: "a.js", records: &[], source_name: Some("a.js") };
    let (_, map) = render_factory(source, &scan, &input);
    let map = map.unwrap();
    assert_eq!(map.get_source(0).map(ToString::to_string), Some("a.js".to_string()));
  }

  #[test]
  fn maps_rewritten_lines_back_to_the_module() {
    let source = "import { a } from './a';\nexport const b = a;\nexport default function () {}\n";
    let scan = EcmaScanner::scan(source).unwrap();
    let records = [RecordResolution::Internal { stable_id: "src/a.js".to_string() }];
    let input =
      FactoryRenderInput { stable_id: "b.js", records: &records, source_name: Some("b.js") };
    let (code, map) = render_factory(source, &scan, &input);
    assert!(code.contains("var __rollpack_default = function () {};"));

    let lookup = SourceMapLookup::new(&map.unwrap());
    let line = code.lines().position(|line| line.starts_with("const b")).unwrap();
    let location = lookup.original_location(u32::try_from(line).unwrap(), 0).unwrap();
    assert_eq!((location.line, location.column), (1, 7));
  }
}
