use std::{borrow::Cow, sync::Arc};

use crate::{Plugin, SharedPluginable};

/// Plugins in dispatch order. The list is copied into a [`crate::PluginDriver`] when a build
/// starts, so changes made during a build only affect later builds.
#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
  plugins: Vec<SharedPluginable>,
}

impl PluginRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<P: Plugin>(&mut self, plugin: P) -> &mut Self {
    self.register_shared(Arc::new(plugin))
  }

  pub fn register_shared(&mut self, plugin: SharedPluginable) -> &mut Self {
    self.plugins.push(plugin);
    self
  }

  /// `index` past the end appends.
  pub fn insert<P: Plugin>(&mut self, index: usize, plugin: P) -> &mut Self {
    self.insert_shared(index, Arc::new(plugin))
  }

  pub fn insert_shared(&mut self, index: usize, plugin: SharedPluginable) -> &mut Self {
    self.plugins.insert(index.min(self.plugins.len()), plugin);
    self
  }

  pub fn len(&self) -> usize {
    self.plugins.len()
  }

  pub fn is_empty(&self) -> bool {
    self.plugins.is_empty()
  }

  pub fn names(&self) -> Vec<Cow<'static, str>> {
    self.plugins.iter().map(|plugin| plugin.call_name()).collect()
  }

  pub fn to_vec(&self) -> Vec<SharedPluginable> {
    self.plugins.clone()
  }
}

impl From<Vec<SharedPluginable>> for PluginRegistry {
  fn from(plugins: Vec<SharedPluginable>) -> Self {
    Self { plugins }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug)]
  struct Named(&'static str);

  impl Plugin for Named {
    fn name(&self) -> Cow<'static, str> {
      Cow::Borrowed(self.0)
    }
  }

  #[test]
  fn register_and_insert_keep_order() {
    let mut registry = PluginRegistry::new();
    registry.register(Named("a")).register(Named("c"));
    registry.insert(1, Named("b"));
    registry.insert(0, Named("first"));
    registry.insert(99, Named("last"));
    assert_eq!(registry.names(), ["first", "a", "b", "c", "last"]);
    assert_eq!(registry.len(), 5);
  }

  #[derive(Debug)]
  struct Unnamed;

  impl Plugin for Unnamed {}

  #[test]
  fn plugins_default_to_their_type_name() {
    let mut registry = PluginRegistry::new();
    registry.register(Unnamed).register(Named("named"));
    assert_eq!(registry.names(), ["Unnamed", "named"]);
  }
}
