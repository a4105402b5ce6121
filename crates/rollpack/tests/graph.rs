mod common;

use common::{chunk, codes, define_count, generate, options, project, stable_ids};
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rollpack::{
  BundlerOptions, DynamicImportFallback, ManualChunk, PluginRegistry, SharedChunkStrategy,
  TreeshakeOptions,
};

#[tokio::test]
async fn unreachable_modules_are_left_out() {
  let fs = project(&[
    ("src/main.js", "import { a } from './a.js';\nimport('./lazy.js');\nconsole.log(a);\n"),
    ("src/a.js", "export const a = 'a';\n"),
    ("src/lazy.js", "export const lazy = 1;\n"),
    ("src/unused.js", "export const unused = 'unused';\n"),
  ]);
  let output = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();

  assert_eq!(stable_ids(chunk(&output, "main")), vec!["src/a.js", "src/main.js"]);
  assert_eq!(stable_ids(chunk(&output, "lazy")), vec!["src/lazy.js"]);

  let mut all = output.chunks().flat_map(stable_ids).collect_vec();
  all.sort();
  assert_eq!(all, vec!["src/a.js", "src/lazy.js", "src/main.js"]);
  assert!(output.chunks().all(|chunk| !chunk.code.contains("unused")));
}

#[tokio::test]
async fn modules_shared_by_entries_are_hoisted() {
  let fs = project(&[
    ("src/main.js", "import('./a.js');\nimport('./b.js');\n"),
    ("src/a.js", "import { shared } from './shared.js';\nexport const a = shared + 'a';\n"),
    ("src/b.js", "import { shared } from './shared.js';\nexport const b = shared + 'b';\n"),
    ("src/shared.js", "export const shared = 'shared';\n"),
  ]);
  let output = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();

  let names = output.chunks().map(|chunk| chunk.name.to_string()).sorted().collect_vec();
  assert_eq!(names, vec!["a", "b", "main", "shared"]);

  let main = chunk(&output, "main");
  let shared = chunk(&output, "shared");
  assert_eq!(stable_ids(main), vec!["src/main.js"]);
  assert_eq!(stable_ids(shared), vec!["src/shared.js"]);
  assert_eq!(define_count(&main.code, "src/shared.js"), 0);
  assert!(main.imports.is_empty());
  assert_eq!(main.dynamic_imports.len(), 2);

  for name in ["a", "b"] {
    let entry = chunk(&output, name);
    assert!(entry.is_dynamic_entry);
    assert_eq!(entry.imports, vec![shared.file_name.clone()]);
    assert!(entry.code.contains(&format!("import \"./{}\";", shared.file_name)));
  }

  let rendered = output.chunks().map(|chunk| define_count(&chunk.code, "src/shared.js")).sum::<usize>();
  assert_eq!(rendered, 1);
}

fn three_entries() -> std::sync::Arc<rollpack::MemoryFileSystem> {
  project(&[
    ("src/main.js", "import('./a.js');\nimport('./b.js');\nimport('./c.js');\n"),
    ("src/a.js", "import './s1.js';\n"),
    ("src/b.js", "import './s1.js';\nimport './s2.js';\n"),
    ("src/c.js", "import './s2.js';\n"),
    ("src/s1.js", "globalThis.s1 = true;\n"),
    ("src/s2.js", "globalThis.s2 = true;\n"),
  ])
}

#[tokio::test]
async fn single_shared_chunk_by_default() {
  let output =
    generate(options(&["./src/main.js"]), PluginRegistry::new(), &three_entries()).await.unwrap();
  assert_eq!(output.chunks().count(), 5);
  assert_eq!(stable_ids(chunk(&output, "shared")), vec!["src/s1.js", "src/s2.js"]);
}

#[tokio::test]
async fn one_shared_chunk_per_combination() {
  let options = BundlerOptions {
    shared_chunks: Some(SharedChunkStrategy::PerCombination),
    ..options(&["./src/main.js"])
  };
  let output = generate(options, PluginRegistry::new(), &three_entries()).await.unwrap();
  assert_eq!(output.chunks().count(), 6);
  assert_eq!(stable_ids(chunk(&output, "s1")), vec!["src/s1.js"]);
  assert_eq!(stable_ids(chunk(&output, "s2")), vec!["src/s2.js"]);
  assert_eq!(chunk(&output, "b").imports.len(), 2);
  assert_eq!(chunk(&output, "a").imports.len(), 1);
}

#[tokio::test]
async fn manual_chunks_take_matching_modules() {
  let fs = project(&[
    ("src/main.js", "import { lib } from './vendor/lib.js';\nconsole.log(lib);\n"),
    ("src/vendor/lib.js", "export const lib = 'lib';\n"),
  ]);
  let options = BundlerOptions {
    manual_chunks: Some(vec![ManualChunk { name: "vendor".into(), test: "/vendor/".into() }]),
    ..options(&["./src/main.js"])
  };
  let output = generate(options, PluginRegistry::new(), &fs).await.unwrap();

  let vendor = chunk(&output, "vendor");
  assert_eq!(stable_ids(vendor), vec!["src/vendor/lib.js"]);
  assert_eq!(chunk(&output, "main").imports, vec![vendor.file_name.clone()]);
}

#[tokio::test]
async fn circular_imports_warn_and_render_once() {
  let fs = project(&[
    ("src/main.js", "import { a } from './a.js';\nconsole.log(a);\n"),
    ("src/a.js", "import { b } from './b.js';\nexport const a = 'a';\nexport const useB = () => b;\n"),
    ("src/b.js", "import { a } from './a.js';\nexport const b = 'b';\nexport const useA = () => a;\n"),
  ]);
  let output = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();

  assert_eq!(codes(&output.warnings), vec!["CIRCULAR_DEPENDENCY"]);
  assert!(output.warnings[0].message().contains("src/a.js -> src/b.js -> src/a.js"));

  let main = chunk(&output, "main");
  assert_eq!(stable_ids(main), vec!["src/b.js", "src/a.js", "src/main.js"]);
  assert_eq!(define_count(&main.code, "src/a.js"), 1);
  assert_eq!(define_count(&main.code, "src/b.js"), 1);
}

#[tokio::test]
async fn identical_inputs_give_identical_output() {
  let fs = project(&[
    ("src/main.js", "import { x } from './x.js';\nexport const load = () => [import('./a.js'), import('./b.js')];\nconsole.log(x);\n"),
    ("src/a.js", "import { x } from './x.js';\nexport const a = x;\n"),
    ("src/b.js", "import { x } from './x.js';\nimport { y } from './y.js';\nexport const b = x + y;\n"),
    ("src/x.js", "export const x = 'x';\n"),
    ("src/y.js", "export const y = 'y';\n"),
  ]);
  let snapshot = |output: &rollpack::BundleOutput| {
    output
      .assets
      .iter()
      .map(|output| {
        (output.file_name().to_string(), String::from_utf8_lossy(output.content_as_bytes()).into_owned())
      })
      .collect_vec()
  };

  let first = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();
  for _ in 0..3 {
    let again = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();
    assert_eq!(snapshot(&first), snapshot(&again));
  }
}

#[tokio::test]
async fn side_effect_free_plain_imports_are_pruned() {
  let files = [
    ("src/main.js", "import './polyfill.js';\nimport { used } from './used.js';\nconsole.log(used);\n"),
    ("src/polyfill.js", "globalThis.polyfilled = true;\n"),
    ("src/used.js", "export const used = 1;\n"),
  ];

  let kept = generate(options(&["./src/main.js"]), PluginRegistry::new(), &project(&files))
    .await
    .unwrap();
  assert_eq!(
    stable_ids(chunk(&kept, "main")),
    vec!["src/polyfill.js", "src/used.js", "src/main.js"]
  );

  let options = BundlerOptions {
    treeshake: Some(TreeshakeOptions { enabled: true, module_side_effects: false }),
    ..options(&["./src/main.js"])
  };
  let pruned = generate(options, PluginRegistry::new(), &project(&files)).await.unwrap();
  let main = chunk(&pruned, "main");
  assert_eq!(stable_ids(main), vec!["src/used.js", "src/main.js"]);
  assert!(!main.code.contains("polyfill"));
}

#[tokio::test]
async fn missing_exports_are_reported() {
  let fs = project(&[
    ("src/main.js", "import { nope } from './a.js';\nexport { gone } from './a.js';\nconsole.log(nope);\n"),
    ("src/a.js", "export const yes = 1;\n"),
  ]);
  let output = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();

  assert_eq!(codes(&output.warnings), vec!["MISSING_EXPORT", "MISSING_EXPORT"]);
  assert!(output.warnings.iter().any(|warning| warning.message().contains("\"nope\"")));
  assert!(output.warnings.iter().any(|warning| warning.message().contains("\"gone\"")));
}

#[tokio::test]
async fn unresolved_imports_fail_the_build() {
  let fs = project(&[("src/main.js", "import './missing.js';\n")]);
  let errors = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap_err();
  assert_eq!(codes(&errors), vec!["UNRESOLVED_IMPORT"]);
  assert!(errors[0].message().contains("./missing.js"));
  assert!(errors[0].message().contains("src/main.js"));

  let errors = generate(options(&["./src/nope.js"]), PluginRegistry::new(), &fs).await.unwrap_err();
  assert_eq!(codes(&errors), vec!["UNRESOLVED_ENTRY"]);
}

#[tokio::test]
async fn unresolved_dynamic_imports_can_stay_external() {
  let fs = project(&[("src/main.js", "export const load = () => import('./not-built.js');\n")]);

  let errors = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap_err();
  assert_eq!(codes(&errors), vec!["UNRESOLVED_IMPORT"]);

  let options = BundlerOptions {
    dynamic_import_fallback: Some(DynamicImportFallback::External),
    ..options(&["./src/main.js"])
  };
  let output = generate(options, PluginRegistry::new(), &fs).await.unwrap();
  let main = chunk(&output, "main");
  assert_eq!(output.chunks().count(), 1);
  assert!(main.code.contains("import('./not-built.js')"));
}

#[tokio::test]
async fn packages_resolve_through_their_exports() {
  let fs = project(&[
    ("src/main.js", "import { version } from 'exp';\nimport { helper } from 'exp/utils';\nhelper(version);\n"),
    (
      "node_modules/exp/package.json",
      r#"{ "exports": { ".": { "import": "./esm/index.js", "require": "./cjs/index.js" }, "./utils": "./esm/utils.js" } }"#,
    ),
    ("node_modules/exp/esm/index.js", "export const version = 'esm';\n"),
    ("node_modules/exp/cjs/index.js", "exports.version = 'cjs';\n"),
    ("node_modules/exp/esm/utils.js", "export const helper = (v) => console.log(v);\n"),
  ]);
  let output = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();

  assert_eq!(
    stable_ids(chunk(&output, "main")),
    vec!["node_modules/exp/esm/index.js", "node_modules/exp/esm/utils.js", "src/main.js"]
  );
}
