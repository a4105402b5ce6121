// A wrapper around `oxc_resolver` adding aliases, externals, `sideEffects` and rollup-compatible
// entry lookup.

mod builtin_modules;
mod error;
mod package_json;
mod resolver;

pub use crate::{
  error::ResolveError,
  package_json::{PackageJson, SideEffects},
  resolver::{ResolveReturn, Resolver},
};

pub use rollpack_common::ResolveOptions;
