mod ecma_compiler;
mod ecma_error;
mod ecma_scanner;
mod factory_renderer;

pub use crate::{
  ecma_compiler::{CompiledJs, EcmaCompiler, EcmaSyntax},
  ecma_error::EcmaError,
  ecma_scanner::{
    EcmaScanner, ExportEntry, IdentifierRef, ImportBinding, ImportedName, ScanResult,
    ScannedImportRecord, TextEdit,
  },
  factory_renderer::{
    render_factory, FactoryRenderInput, RecordResolution, DEFAULT_EXPORT_BINDING,
  },
};
pub use oxc::span::Span;
