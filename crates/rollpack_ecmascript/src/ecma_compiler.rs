use std::path::{Path, PathBuf};

use oxc::{
  allocator::Allocator,
  codegen::{Codegen, CodegenOptions},
  parser::Parser,
  semantic::SemanticBuilder,
  span::SourceType,
  transformer::{ESTarget, TransformOptions, Transformer},
};
use rollpack_sourcemap::SourceMap;

use crate::EcmaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaSyntax {
  Js,
  Jsx,
  Ts,
  Tsx,
}

impl EcmaSyntax {
  fn source_type(self) -> SourceType {
    let default = SourceType::default().with_module(true);
    match self {
      Self::Js => default,
      Self::Jsx => default.with_jsx(true),
      Self::Ts => default.with_typescript(true),
      Self::Tsx => default.with_typescript(true).with_jsx(true),
    }
  }
}

#[derive(Debug)]
pub struct CompiledJs {
  pub code: String,
  /// Maps `code` back to the compiled input, with `path` as its only source.
  pub map: Option<SourceMap>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Lowers TypeScript and JSX to plain ESM. Plain JS is returned untouched and without a map.
  pub fn compile_to_js(
    source: &str,
    path: &str,
    syntax: EcmaSyntax,
  ) -> Result<CompiledJs, Vec<EcmaError>> {
    if syntax == EcmaSyntax::Js {
      return Ok(CompiledJs { code: source.to_string(), map: None });
    }

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, syntax.source_type()).parse();
    if !ret.errors.is_empty() {
      return Err(EcmaError::from_oxc_list(&ret.errors));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let transformer_return =
      Transformer::new(&allocator, Path::new(path), &TransformOptions::from(ESTarget::ESNext))
        .build_with_scoping(scoping, &mut program);
    if !transformer_return.errors.is_empty() {
      return Err(EcmaError::from_oxc_list(&transformer_return.errors));
    }

    let ret = Codegen::new()
      .with_options(CodegenOptions {
        source_map_path: Some(PathBuf::from(path)),
        ..CodegenOptions::default()
      })
      .build(&program);

    // The printer's map type is pinned by oxc, so it crosses over as JSON.
    let map = ret
      .map
      .and_then(|map| SourceMap::from_json_string(&map.to_json_string()).ok())
      .map(|map| rollpack_sourcemap::retarget_single_source(&map, path, source));

    Ok(CompiledJs { code: ret.code, map })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_type_annotations() {
    let compiled =
      EcmaCompiler::compile_to_js("export const a: number = 1;\n", "/src/a.ts", EcmaSyntax::Ts)
        .unwrap();
    assert!(compiled.code.contains("export const a = 1"));
    assert!(!compiled.code.contains("number"));
    assert!(compiled.map.is_some());
  }

  #[test]
  fn plain_js_is_returned_as_is() {
    let compiled = EcmaCompiler::compile_to_js("let a = 1", "/a.js", EcmaSyntax::Js).unwrap();
    assert_eq!(compiled.code, "let a = 1");
    assert!(compiled.map.is_none());
  }

  #[test]
  fn reports_syntax_errors() {
    let errors = EcmaCompiler::compile_to_js("let a: = ;", "/a.ts", EcmaSyntax::Ts).unwrap_err();
    assert!(!errors.is_empty());
  }
}
