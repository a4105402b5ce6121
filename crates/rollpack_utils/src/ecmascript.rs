use oxc::syntax::identifier;

use crate::concat_string;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// Renders `value` as a double-quoted JavaScript string literal.
pub fn to_js_string_literal(value: &str) -> String {
  serde_json::Value::String(value.to_string()).to_string()
}

pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_validate_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", to_js_string_literal(prop), "]")
  }
}

/// Key usable inside an object literal or an `export { .. }` clause.
pub fn to_module_import_export_name(name: &str) -> String {
  if identifier::is_identifier_name(name) { name.to_string() } else { to_js_string_literal(name) }
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("m", "foo"), "m.foo");
  assert_eq!(property_access_str("m", "a-b"), "m[\"a-b\"]");
  assert_eq!(to_module_import_export_name("a b"), "\"a b\"");
}
