use rollpack_common::ModuleType;
use rollpack_ecmascript::{EcmaCompiler, EcmaError, EcmaSyntax};
use rollpack_error::{BuildDiagnostic, DiagnosticLocation};
use rollpack_sourcemap::{line_identity_map, SourceMap};
use rollpack_utils::{concat_string, ecmascript::to_js_string_literal};

/// Turns the transformed code of a module into plain JavaScript. The returned map, if any, maps
/// the JavaScript back to `code`.
pub fn convert_to_js(
  id: &str,
  stable_id: &str,
  code: String,
  module_type: ModuleType,
) -> Result<(String, Option<SourceMap>), BuildDiagnostic> {
  let syntax = match module_type {
    ModuleType::Js => return Ok((code, None)),
    ModuleType::Jsx => EcmaSyntax::Jsx,
    ModuleType::Ts => EcmaSyntax::Ts,
    ModuleType::Tsx => EcmaSyntax::Tsx,
    ModuleType::Json => {
      if let Err(err) = serde_json::from_str::<serde_json::Value>(&code) {
        let location = DiagnosticLocation {
          id: stable_id.into(),
          line: u32::try_from(err.line()).unwrap_or(u32::MAX),
          column: u32::try_from(err.column().saturating_sub(1)).unwrap_or(u32::MAX),
        };
        return Err(BuildDiagnostic::parse_error(stable_id, err, Some(location)));
      }
      let js = concat_string!("export default ", code.trim_end(), ";\n");
      let map = line_identity_map(id, &code, &js);
      return Ok((js, Some(map)));
    }
    ModuleType::Text => {
      let js = concat_string!("export default ", to_js_string_literal(&code), ";\n");
      let map = line_identity_map(id, &code, &js);
      return Ok((js, Some(map)));
    }
  };

  let compiled = EcmaCompiler::compile_to_js(&code, id, syntax)
    .map_err(|errors| parse_error(stable_id, &code, &errors))?;
  Ok((compiled.code, compiled.map))
}

/// Reports the first error, located in `source` when the parser gave an offset.
pub fn parse_error(stable_id: &str, source: &str, errors: &[EcmaError]) -> BuildDiagnostic {
  let Some(first) = errors.first() else {
    return BuildDiagnostic::parse_error(stable_id, "unknown syntax error", None);
  };
  let location = first.offset.map(|offset| location_at(stable_id, source, offset));
  BuildDiagnostic::parse_error(stable_id, &first.message, location)
}

fn location_at(stable_id: &str, source: &str, offset: u32) -> DiagnosticLocation {
  let end = usize::try_from(offset).map_or(source.len(), |offset| offset.min(source.len()));
  let prefix = &source.as_bytes()[..end];
  let line = memchr::memchr_iter(b'\n', prefix).count() + 1;
  let column = memchr::memrchr(b'\n', prefix).map_or(end, |newline| end - newline - 1);
  DiagnosticLocation {
    id: stable_id.into(),
    line: u32::try_from(line).unwrap_or(u32::MAX),
    column: u32::try_from(column).unwrap_or(u32::MAX),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn json_becomes_a_default_export() {
    let (code, map) =
      convert_to_js("/p/data.json", "data.json", "{ \"a\": 1 }\n".to_string(), ModuleType::Json)
        .unwrap();
    assert_eq!(code, "export default { \"a\": 1 };\n");
    assert!(map.is_some());
  }

  #[test]
  fn invalid_json_is_located() {
    let err =
      convert_to_js("/p/data.json", "data.json", "{\n  a: 1 }".to_string(), ModuleType::Json)
        .unwrap_err();
    assert_eq!(err.code(), "PARSE_ERROR");
    assert_eq!(err.location().map(|location| location.line), Some(2));
  }

  #[test]
  fn text_becomes_a_string_literal() {
    let (code, _) =
      convert_to_js("/p/a.txt", "a.txt", "hi \"there\"\n".to_string(), ModuleType::Text).unwrap();
    assert_eq!(code, "export default \"hi \\\"there\\\"\\n\";\n");
  }

  #[test]
  fn locates_offsets() {
    let location = location_at("a.js", "let a;\nlet b = ;", 15);
    assert_eq!((location.line, location.column), (2, 8));
  }
}
