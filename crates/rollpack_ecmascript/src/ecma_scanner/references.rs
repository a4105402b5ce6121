use oxc::{
  ast::ast::{
    ExportNamedDeclaration, Expression, IdentifierReference, ImportDeclaration, ImportExpression,
    ObjectProperty,
  },
  ast_visit::{walk, Visit},
  semantic::{Scoping, SymbolId},
};
use rustc_hash::FxHashMap;

use super::{IdentifierRef, ScannedImportRecord};

/// Finds every read of an import binding, plus `import('literal')` expressions.
pub struct ReferenceCollector<'s> {
  scoping: &'s Scoping,
  symbol_to_binding: &'s FxHashMap<SymbolId, usize>,
  pub found: Vec<(usize, IdentifierRef)>,
  pub dynamic_imports: Vec<ScannedImportRecord>,
}

impl<'s> ReferenceCollector<'s> {
  pub fn new(scoping: &'s Scoping, symbol_to_binding: &'s FxHashMap<SymbolId, usize>) -> Self {
    Self { scoping, symbol_to_binding, found: Vec::new(), dynamic_imports: Vec::new() }
  }

  fn binding_of(&self, ident: &IdentifierReference<'_>) -> Option<usize> {
    let reference_id = ident.reference_id.get()?;
    let symbol_id = self.scoping.get_reference(reference_id).symbol_id()?;
    self.symbol_to_binding.get(&symbol_id).copied()
  }
}

impl<'a> Visit<'a> for ReferenceCollector<'_> {
  fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
    if let Some(binding) = self.binding_of(it) {
      self.found.push((binding, IdentifierRef { span: it.span, shorthand: false }));
    }
  }

  fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
    if it.shorthand {
      if let Expression::Identifier(ident) = &it.value {
        if let Some(binding) = self.binding_of(ident) {
          self.found.push((binding, IdentifierRef { span: ident.span, shorthand: true }));
          return;
        }
      }
    }
    walk::walk_object_property(self, it);
  }

  fn visit_import_expression(&mut self, it: &ImportExpression<'a>) {
    if let Expression::StringLiteral(source) = &it.source {
      self.dynamic_imports.push(ScannedImportRecord {
        specifier: source.value.to_string(),
        span: it.span,
        is_dynamic: true,
        is_plain: false,
        is_export_star: false,
      });
      return;
    }
    walk::walk_import_expression(self, it);
  }

  // Specifiers of `export { a }` are removed with the statement.
  fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
    if let Some(declaration) = &it.declaration {
      self.visit_declaration(declaration);
    }
  }

  fn visit_import_declaration(&mut self, _it: &ImportDeclaration<'a>) {}
}
