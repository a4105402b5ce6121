mod binding_pattern;
mod module_syntax;
mod references;

use oxc::{
  allocator::Allocator, ast_visit::Visit, parser::Parser, semantic::SemanticBuilder,
  span::{SourceType, Span},
};
use rustc_hash::FxHashMap;

use crate::EcmaError;

use self::{module_syntax::ModuleSyntaxCollector, references::ReferenceCollector};

/// Name imported from another module. `import x from` imports `Named("default")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportedName {
  Namespace,
  Named(String),
}

#[derive(Debug, Clone)]
pub struct ScannedImportRecord {
  pub specifier: String,
  /// The whole statement for static records, the `import(..)` expression for dynamic ones.
  pub span: Span,
  pub is_dynamic: bool,
  /// `import './x'` or `import {} from './x'`.
  pub is_plain: bool,
  /// `export * from './x'`.
  pub is_export_star: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRef {
  pub span: Span,
  /// `{ a }` in an object literal, which has to become `{ a: <access> }`.
  pub shorthand: bool,
}

#[derive(Debug, Clone)]
pub struct ImportBinding {
  pub record: usize,
  pub imported: ImportedName,
  pub local: String,
  pub references: Vec<IdentifierRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
  /// Exports a binding declared in, or imported into, this module.
  Local { exported: String, local: String },
  /// `export { a as b } from './x'` and `export * as ns from './x'`.
  ReExport { exported: String, record: usize, imported: ImportedName },
}

impl ExportEntry {
  pub fn exported(&self) -> &str {
    match self {
      Self::Local { exported, .. } | Self::ReExport { exported, .. } => exported,
    }
  }
}

/// Replacement of module syntax that the factory wrapper cannot keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
  pub start: u32,
  pub end: u32,
  pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
  pub import_records: Vec<ScannedImportRecord>,
  pub import_bindings: Vec<ImportBinding>,
  pub exports: Vec<ExportEntry>,
  /// Records of `export * from` statements, in source order.
  pub star_exports: Vec<usize>,
  pub module_syntax_edits: Vec<TextEdit>,
}

impl ScanResult {
  pub fn export_names(&self) -> impl Iterator<Item = &str> {
    self.exports.iter().map(ExportEntry::exported)
  }

  pub fn binding_by_local(&self, local: &str) -> Option<&ImportBinding> {
    self.import_bindings.iter().find(|binding| binding.local == local)
  }
}

pub struct EcmaScanner;

impl EcmaScanner {
  /// Parses `source` as an ES module and collects everything needed to resolve its imports and
  /// to rewrite it into a registry factory.
  pub fn scan(source: &str) -> Result<ScanResult, Vec<EcmaError>> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
      return Err(EcmaError::from_oxc_list(&ret.errors));
    }
    let program = ret.program;

    let semantic_ret = SemanticBuilder::new().build(&program);
    if !semantic_ret.errors.is_empty() {
      return Err(EcmaError::from_oxc_list(&semantic_ret.errors));
    }
    let scoping = semantic_ret.semantic.scoping();

    let mut collector = ModuleSyntaxCollector::default();
    for stmt in &program.body {
      collector.collect_statement(stmt);
    }
    let ModuleSyntaxCollector { mut result, import_symbols } = collector;

    let symbol_to_binding =
      import_symbols.into_iter().collect::<FxHashMap<_, _>>();
    let mut references = ReferenceCollector::new(scoping, &symbol_to_binding);
    references.visit_program(&program);
    let ReferenceCollector { found, dynamic_imports, .. } = references;

    for (binding_idx, reference) in found {
      result.import_bindings[binding_idx].references.push(reference);
    }
    result.import_records.extend(dynamic_imports);

    Ok(result)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn scan(source: &str) -> ScanResult {
    EcmaScanner::scan(source).unwrap()
  }

  #[test]
  fn collects_static_and_dynamic_records_in_order() {
    let result = scan(
      "import a from './a';\nimport './side';\nexport * from './star';\nconst lazy = () => import('./lazy');\n",
    );
    let specifiers =
      result.import_records.iter().map(|rec| rec.specifier.as_str()).collect::<Vec<_>>();
    assert_eq!(specifiers, vec!["./a", "./side", "./star", "./lazy"]);
    assert!(result.import_records[1].is_plain);
    assert!(result.import_records[2].is_export_star);
    assert!(result.import_records[3].is_dynamic);
    assert_eq!(result.star_exports, vec![2]);
  }

  #[test]
  fn tracks_references_of_import_bindings_only() {
    let source = "import { a, b as c } from './x';\nconsole.log(a, { c });\nfunction f(a) { return a; }\n";
    let result = scan(source);
    let a = result.binding_by_local("a").unwrap();
    assert_eq!(a.references.len(), 1);
    assert_eq!(&source[a.references[0].span.start as usize..a.references[0].span.end as usize], "a");
    let c = result.binding_by_local("c").unwrap();
    assert_eq!(c.imported, ImportedName::Named("b".to_string()));
    assert_eq!(c.references, vec![IdentifierRef { span: c.references[0].span, shorthand: true }]);
  }

  #[test]
  fn collects_exports() {
    let result = scan(
      "export const x = 1, { y } = {};\nexport function f() {}\nexport default 42;\nlet z = 1;\nexport { z as w };\nexport { q } from './q';\nexport * as ns from './ns';\n",
    );
    assert_eq!(
      result.export_names().collect::<Vec<_>>(),
      vec!["x", "y", "f", "default", "w", "q", "ns"]
    );
    assert_eq!(
      result.exports[3],
      ExportEntry::Local { exported: "default".to_string(), local: "__rollpack_default".to_string() }
    );
  }

  #[test]
  fn reports_syntax_errors() {
    assert!(EcmaScanner::scan("export const = 1;").is_err());
  }
}
