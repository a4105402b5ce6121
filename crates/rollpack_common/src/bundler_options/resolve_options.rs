use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AliasItem {
  pub find: String,
  pub replacement: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveOptions {
  /// Tried in order, the first matching `find` wins.
  pub alias: Option<Vec<AliasItem>>,
  pub extensions: Option<Vec<String>>,
  pub main_fields: Option<Vec<String>>,
}
