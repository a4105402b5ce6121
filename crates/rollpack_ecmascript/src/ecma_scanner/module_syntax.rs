use oxc::{
  ast::ast::{ExportDefaultDeclarationKind, ImportDeclarationSpecifier, ModuleExportName, Statement},
  semantic::SymbolId,
  span::{GetSpan, Span},
};

use super::{
  binding_pattern::declared_names, ExportEntry, ImportBinding, ImportedName, ScanResult,
  ScannedImportRecord, TextEdit,
};
use crate::DEFAULT_EXPORT_BINDING;

#[derive(Default)]
pub struct ModuleSyntaxCollector {
  pub result: ScanResult,
  /// Symbols of import bindings, paired with their index in `result.import_bindings`.
  pub import_symbols: Vec<(SymbolId, usize)>,
}

fn export_name(name: &ModuleExportName<'_>) -> String {
  name.name().to_string()
}

impl ModuleSyntaxCollector {
  fn add_record(&mut self, specifier: &str, span: Span) -> usize {
    self.result.import_records.push(ScannedImportRecord {
      specifier: specifier.to_string(),
      span,
      is_dynamic: false,
      is_plain: false,
      is_export_star: false,
    });
    self.result.import_records.len() - 1
  }

  fn remove(&mut self, start: u32, end: u32) {
    self.overwrite(start, end, String::new());
  }

  fn overwrite(&mut self, start: u32, end: u32, content: String) {
    self.result.module_syntax_edits.push(TextEdit { start, end, content });
  }

  fn add_local_export(&mut self, exported: impl Into<String>, local: impl Into<String>) {
    self.result.exports.push(ExportEntry::Local { exported: exported.into(), local: local.into() });
  }

  pub fn collect_statement(&mut self, stmt: &Statement<'_>) {
    match stmt {
      Statement::ImportDeclaration(decl) => {
        let record = self.add_record(&decl.source.value, decl.span);
        self.remove(decl.span.start, decl.span.end);
        let specifiers = decl.specifiers.iter().flatten().collect::<Vec<_>>();
        self.result.import_records[record].is_plain = specifiers.is_empty();
        for specifier in specifiers {
          let (imported, local) = match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(s) => {
              (ImportedName::Named(export_name(&s.imported)), &s.local)
            }
            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
              (ImportedName::Named("default".to_string()), &s.local)
            }
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
              (ImportedName::Namespace, &s.local)
            }
          };
          let binding_idx = self.result.import_bindings.len();
          self.result.import_bindings.push(ImportBinding {
            record,
            imported,
            local: local.name.to_string(),
            references: Vec::new(),
          });
          if let Some(symbol_id) = local.symbol_id.get() {
            self.import_symbols.push((symbol_id, binding_idx));
          }
        }
      }
      Statement::ExportNamedDeclaration(decl) => {
        if let Some(source) = &decl.source {
          let record = self.add_record(&source.value, decl.span);
          self.remove(decl.span.start, decl.span.end);
          for specifier in &decl.specifiers {
            self.result.exports.push(ExportEntry::ReExport {
              exported: export_name(&specifier.exported),
              record,
              imported: ImportedName::Named(export_name(&specifier.local)),
            });
          }
        } else if let Some(declaration) = &decl.declaration {
          // `export const a = 1` keeps the declaration.
          self.remove(decl.span.start, declaration.span().start);
          let mut names = Vec::new();
          declared_names(declaration, &mut names);
          for name in names {
            self.add_local_export(name.clone(), name);
          }
        } else {
          self.remove(decl.span.start, decl.span.end);
          for specifier in &decl.specifiers {
            self.add_local_export(export_name(&specifier.exported), export_name(&specifier.local));
          }
        }
      }
      Statement::ExportDefaultDeclaration(decl) => {
        let named_declaration = match &decl.declaration {
          ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
            Some((func.span, func.id.as_ref().map(|id| id.name.to_string())))
          }
          ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            Some((class.span, class.id.as_ref().map(|id| id.name.to_string())))
          }
          _ => None,
        };
        match named_declaration {
          Some((span, Some(name))) => {
            self.remove(decl.span.start, span.start);
            self.add_local_export("default", name);
          }
          Some((span, None)) => {
            self.overwrite(decl.span.start, span.start, format!("var {DEFAULT_EXPORT_BINDING} = "));
            self.overwrite(span.end, span.end, ";".to_string());
            self.add_local_export("default", DEFAULT_EXPORT_BINDING);
          }
          None => {
            let expression_start = decl.declaration.span().start;
            self.overwrite(
              decl.span.start,
              expression_start,
              format!("var {DEFAULT_EXPORT_BINDING} = "),
            );
            self.add_local_export("default", DEFAULT_EXPORT_BINDING);
          }
        }
      }
      Statement::ExportAllDeclaration(decl) => {
        let record = self.add_record(&decl.source.value, decl.span);
        self.remove(decl.span.start, decl.span.end);
        match &decl.exported {
          Some(exported) => self.result.exports.push(ExportEntry::ReExport {
            exported: export_name(exported),
            record,
            imported: ImportedName::Namespace,
          }),
          None => {
            self.result.import_records[record].is_export_star = true;
            self.result.star_exports.push(record);
          }
        }
      }
      _ => {}
    }
  }
}
