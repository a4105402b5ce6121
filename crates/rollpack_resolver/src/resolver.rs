use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use arcstr::ArcStr;
use dashmap::DashMap;
use itertools::Itertools;
use oxc_resolver::{FsCache, ResolveOptions as OxcResolverOptions, ResolverGeneric};
use sugar_path::SugarPath;

use rollpack_common::{Platform, ResolveOptions};
use rollpack_fs::{ResolverFileSystem, SharedFileSystem};

use crate::{builtin_modules::is_builtin_module, PackageJson, ResolveError};

const DEFAULT_EXTENSIONS: [&str; 6] = [".js", ".mjs", ".ts", ".tsx", ".jsx", ".json"];

pub struct Resolver {
  cwd: PathBuf,
  platform: Platform,
  alias: Vec<(String, String)>,
  fs: SharedFileSystem,
  import_resolver: ResolverGeneric<FsCache<ResolverFileSystem>>,
  /// Parsed package.json files keyed by their path.
  package_json_cache: DashMap<PathBuf, Arc<PackageJson>>,
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver")
      .field("cwd", &self.cwd)
      .field("platform", &self.platform)
      .field("alias", &self.alias)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveReturn {
  pub path: ArcStr,
  pub is_external: bool,
  /// From the `sideEffects` field of the closest package.json.
  pub side_effects: Option<bool>,
}

impl ResolveReturn {
  fn external(specifier: &str) -> Self {
    Self { path: specifier.into(), is_external: true, side_effects: None }
  }
}

impl Resolver {
  pub fn new(
    raw_options: ResolveOptions,
    platform: Platform,
    cwd: PathBuf,
    fs: SharedFileSystem,
  ) -> Self {
    let mut default_conditions = vec!["default".to_string()];
    match platform {
      Platform::Node => default_conditions.push("node".to_string()),
      Platform::Browser => default_conditions.push("browser".to_string()),
      Platform::Neutral => {}
    }
    let import_conditions = std::iter::once("import".to_string())
      .chain(default_conditions)
      .unique()
      .collect::<Vec<_>>();

    let main_fields = raw_options.main_fields.unwrap_or_else(|| {
      let fields: &[&str] = match platform {
        Platform::Node => &["main", "module"],
        Platform::Browser => &["browser", "module", "main"],
        Platform::Neutral => &[],
      };
      fields.iter().map(ToString::to_string).collect()
    });

    let alias_fields = match platform {
      Platform::Browser => vec![vec!["browser".to_string()]],
      Platform::Node | Platform::Neutral => vec![],
    };

    let extensions = raw_options
      .extensions
      .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect())
      .into_iter()
      .map(|ext| if ext.starts_with('.') { ext } else { format!(".{ext}") })
      .collect();

    // Builtins are told apart before the specifier reaches `oxc_resolver`.
    let resolve_options = OxcResolverOptions {
      main_fields,
      alias_fields,
      builtin_modules: false,
      condition_names: import_conditions,
      extensions,
      ..Default::default()
    };

    let import_resolver = ResolverGeneric::new_with_cache(
      Arc::new(FsCache::new(ResolverFileSystem::new(&fs))),
      resolve_options,
    );

    let alias = raw_options
      .alias
      .unwrap_or_default()
      .into_iter()
      .map(|item| (item.find, item.replacement))
      .collect();

    Self { cwd, platform, alias, fs, import_resolver, package_json_cache: DashMap::default() }
  }

  pub fn cwd(&self) -> &PathBuf {
    &self.cwd
  }

  /// Resolution order: alias, URLs and builtins as externals, then `oxc_resolver` for paths,
  /// extensions, index files and packages (`exports` and the main fields).
  pub fn resolve(
    &self,
    importer: Option<&Path>,
    specifier: &str,
    is_user_defined_entry: bool,
  ) -> Result<ResolveReturn, ResolveError> {
    let specifier = self.apply_alias(specifier)?;
    let specifier = specifier.as_str();

    if is_url(specifier) {
      return Ok(ResolveReturn::external(specifier));
    }
    if is_builtin_module(specifier, matches!(self.platform, Platform::Node)) {
      return Ok(ResolveReturn::external(specifier));
    }

    let dir = importer
      .and_then(|importer| importer.parent())
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    let mut resolution = self.import_resolver.resolve(dir, specifier);

    // Handle `{ input: 'main' }` -> `<CWD>/main.{js,mjs}`
    if resolution.is_err() && is_user_defined_entry && !is_path_like(specifier) {
      let normalized_specifier = self.cwd.join(specifier).normalize();
      let result = self.import_resolver.resolve(dir, &normalized_specifier.to_string_lossy());
      if result.is_ok() {
        resolution = result;
      }
    }

    let resolution = resolution.map_err(|err| ResolveError::from_oxc(specifier, &err))?;

    let side_effects = match resolution.package_json() {
      Some(package_json) => {
        self.read_package_json(&package_json.path)?.check_side_effects_for(resolution.path())
      }
      None => None,
    };

    Ok(ResolveReturn {
      path: resolution.full_path().to_string_lossy().into(),
      is_external: false,
      side_effects,
    })
  }

  fn apply_alias(&self, specifier: &str) -> Result<String, ResolveError> {
    for (find, replacement) in &self.alias {
      let rest = if specifier == find {
        ""
      } else if let Some(rest) = specifier.strip_prefix(find.as_str()) {
        if !rest.starts_with('/') {
          continue;
        }
        rest
      } else {
        continue;
      };
      if replacement == find {
        return Err(ResolveError::RecursiveAlias {
          find: find.clone(),
          specifier: specifier.to_string(),
        });
      }
      return Ok(format!("{replacement}{rest}"));
    }
    Ok(specifier.to_string())
  }

  /// `oxc_resolver` locates the package.json, its `sideEffects` field is read here.
  fn read_package_json(&self, path: &Path) -> Result<Arc<PackageJson>, ResolveError> {
    if let Some(cached) = self.package_json_cache.get(path) {
      return Ok(Arc::clone(cached.value()));
    }
    let invalid =
      |reason: String| ResolveError::InvalidPackageJson { path: path.to_path_buf(), reason };
    let json = self.fs.read_to_string(path).map_err(|err| invalid(err.to_string()))?;
    let package_json = PackageJson::parse(path.to_path_buf(), &json)
      .map(Arc::new)
      .map_err(|err| invalid(err.to_string()))?;
    self.package_json_cache.insert(path.to_path_buf(), Arc::clone(&package_json));
    Ok(package_json)
  }
}

fn is_url(specifier: &str) -> bool {
  specifier.starts_with("http://")
    || specifier.starts_with("https://")
    || specifier.starts_with("//")
    || specifier.starts_with("data:")
}

fn is_path_like(specifier: &str) -> bool {
  specifier.starts_with('.') || Path::new(specifier).is_absolute()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use rollpack_common::AliasItem;
  use rollpack_fs::MemoryFileSystem;

  use super::*;

  fn resolver(files: &[(&str, &str)], options: ResolveOptions, platform: Platform) -> Resolver {
    let fs = MemoryFileSystem::new(files.iter().copied());
    Resolver::new(options, platform, PathBuf::from("/project"), Arc::new(fs))
  }

  fn resolve_path(resolver: &Resolver, importer: &str, specifier: &str) -> String {
    resolver.resolve(Some(Path::new(importer)), specifier, false).unwrap().path.to_string()
  }

  #[test]
  fn tries_extensions_then_index() {
    let resolver = resolver(
      &[("/project/src/a.ts", ""), ("/project/src/lib/index.js", ""), ("/project/src/b.js", "")],
      ResolveOptions::default(),
      Platform::Browser,
    );
    assert_eq!(resolve_path(&resolver, "/project/src/main.js", "./a"), "/project/src/a.ts");
    assert_eq!(
      resolve_path(&resolver, "/project/src/main.js", "./lib"),
      "/project/src/lib/index.js"
    );
    assert_eq!(
      resolve_path(&resolver, "/project/src/main.js", "./b.js?raw"),
      "/project/src/b.js?raw"
    );
    assert_eq!(
      resolver.resolve(Some(Path::new("/project/src/main.js")), "./missing", false),
      Err(ResolveError::NotFound { specifier: "./missing".to_string() })
    );
  }

  #[test]
  fn alias_wins_over_node_modules() {
    let options = ResolveOptions {
      alias: Some(vec![AliasItem {
        find: "lib".to_string(),
        replacement: "/project/vendor/lib".to_string(),
      }]),
      ..ResolveOptions::default()
    };
    let resolver = resolver(
      &[
        ("/project/vendor/lib/x.js", ""),
        ("/project/node_modules/lib/x.js", ""),
        ("/project/node_modules/lib/package.json", "{}"),
      ],
      options,
      Platform::Browser,
    );
    assert_eq!(resolve_path(&resolver, "/project/main.js", "lib/x"), "/project/vendor/lib/x.js");
    assert!(resolver.resolve(Some(Path::new("/project/main.js")), "library/x", false).is_err());
  }

  #[test]
  fn main_fields_follow_the_platform() {
    let files = [
      (
        "/project/node_modules/pkg/package.json",
        r#"{ "main": "cjs.js", "module": "esm.js", "browser": "browser.js" }"#,
      ),
      ("/project/node_modules/pkg/cjs.js", ""),
      ("/project/node_modules/pkg/esm.js", ""),
      ("/project/node_modules/pkg/browser.js", ""),
      ("/project/node_modules/@scope/pkg/lib/a.js", ""),
    ];
    let browser = resolver(&files, ResolveOptions::default(), Platform::Browser);
    assert_eq!(
      resolve_path(&browser, "/project/src/main.js", "pkg"),
      "/project/node_modules/pkg/browser.js"
    );
    let node = resolver(&files, ResolveOptions::default(), Platform::Node);
    assert_eq!(
      resolve_path(&node, "/project/src/main.js", "pkg"),
      "/project/node_modules/pkg/cjs.js"
    );
    assert_eq!(
      resolve_path(&node, "/project/src/main.js", "@scope/pkg/lib/a"),
      "/project/node_modules/@scope/pkg/lib/a.js"
    );
  }

  #[test]
  fn urls_and_builtins_are_external() {
    let node = resolver(&[], ResolveOptions::default(), Platform::Node);
    assert!(node.resolve(None, "fs", false).unwrap().is_external);
    assert!(node.resolve(None, "https://esm.sh/react", false).unwrap().is_external);
    let browser = resolver(&[], ResolveOptions::default(), Platform::Browser);
    assert!(browser.resolve(None, "node:path", false).unwrap().is_external);
    assert!(browser.resolve(None, "fs", false).is_err());
  }

  #[test]
  fn bare_entries_fall_back_to_cwd() {
    let resolver =
      resolver(&[("/project/main.js", "")], ResolveOptions::default(), Platform::Browser);
    assert_eq!(resolver.resolve(None, "main", true).unwrap().path, "/project/main.js");
    assert!(resolver.resolve(None, "main", false).is_err());
  }

  #[test]
  fn reads_side_effects_of_the_closest_package() {
    let resolver = resolver(
      &[
        ("/project/node_modules/pure/package.json", r#"{ "sideEffects": false }"#),
        ("/project/node_modules/pure/index.js", ""),
        ("/project/src/a.js", ""),
      ],
      ResolveOptions::default(),
      Platform::Browser,
    );
    let pure = resolver.resolve(Some(Path::new("/project/src/a.js")), "pure", false).unwrap();
    assert_eq!(pure.side_effects, Some(false));
    let local = resolver.resolve(Some(Path::new("/project/src/main.js")), "./a", false).unwrap();
    assert_eq!(local.side_effects, None);
  }

  #[test]
  fn exports_only_packages() {
    let resolver = resolver(
      &[
        (
          "/project/node_modules/exp/package.json",
          r#"{
            "name": "exp",
            "exports": {
              ".": { "import": "./dist/index.mjs", "require": "./dist/index.cjs" },
              "./utils": "./dist/utils.js"
            }
          }"#,
        ),
        ("/project/node_modules/exp/dist/index.mjs", ""),
        ("/project/node_modules/exp/dist/index.cjs", ""),
        ("/project/node_modules/exp/dist/utils.js", ""),
      ],
      ResolveOptions::default(),
      Platform::Browser,
    );
    assert_eq!(
      resolve_path(&resolver, "/project/src/main.js", "exp"),
      "/project/node_modules/exp/dist/index.mjs"
    );
    assert_eq!(
      resolve_path(&resolver, "/project/src/main.js", "exp/utils"),
      "/project/node_modules/exp/dist/utils.js"
    );
    let importer = Path::new("/project/src/main.js");
    let hidden = resolver.resolve(Some(importer), "exp/dist/utils.js", false);
    assert!(matches!(hidden, Err(ResolveError::Failed { .. })));
  }
}
