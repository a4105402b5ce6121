mod common;

use std::{borrow::Cow, path::Path};

use common::{bundler, chunk, generate, options, project, CWD};
use pretty_assertions::assert_eq;
use rollpack::{
  BundlerOptions, EmittedAsset, FileSystem, HookGenerateBundleArgs, HookNoopReturn,
  HookRenderChunkArgs, HookRenderChunkOutput, HookRenderChunkReturn, OutputFormat, Plugin,
  PluginContext, PluginRegistry, SourceMapType,
};

#[tokio::test]
async fn esm_entries_export_their_bindings() {
  let fs = project(&[
    ("src/main.js", "import { join } from 'lodash';\nexport * from './more.js';\nexport const answer = join([4, 2]);\nexport default 'main';\n"),
    ("src/more.js", "export const more = true;\n"),
  ]);
  let options = BundlerOptions {
    external: Some(vec!["lodash".to_string()]),
    ..options(&["./src/main.js"])
  };
  let output = generate(options, PluginRegistry::new(), &fs).await.unwrap();
  let main = chunk(&output, "main");

  assert_eq!(main.file_name.as_str(), "main.js");
  assert!(main.is_entry);
  assert_eq!(main.exports, vec!["answer", "default", "more"]);
  assert!(main.code.starts_with("import * as __rollpack_external_0 from \"lodash\";\n"));
  assert!(main.code.contains("__rollpack_external_0.join([4, 2])"));
  assert!(main.code.ends_with(
    "var __rollpack_entry = __rollpack_require(\"src/main.js\");\n\
     var __rollpack_export_0 = __rollpack_entry.answer;\n\
     var __rollpack_export_1 = __rollpack_entry.default;\n\
     var __rollpack_export_2 = __rollpack_entry.more;\n\
     export { __rollpack_export_0 as answer, __rollpack_export_1 as default, __rollpack_export_2 as more };"
  ));
}

#[tokio::test]
async fn cjs_entries_assign_module_exports() {
  let fs = project(&[(
    "src/main.js",
    "import { readFileSync } from 'fs';\nexport const read = () => readFileSync('x');\nexport const lazy = () => import('./lazy.js');\n",
  ), ("src/lazy.js", "export const lazy = 1;\n")]);
  let options =
    BundlerOptions { format: Some(OutputFormat::Cjs), ..options(&["./src/main.js"]) };
  let output = generate(options, PluginRegistry::new(), &fs).await.unwrap();
  let main = chunk(&output, "main");
  let lazy = chunk(&output, "lazy");

  assert!(main.code.starts_with(
    "\"use strict\";\nvar __rollpack_external_0 = __rollpack_to_esm(require(\"fs\"));\n"
  ));
  assert!(main.code.contains("__rollpack_external_0.readFileSync('x')"));
  assert!(main.code.contains(&format!(
    "Promise.resolve().then(function () {{ require(\"./{}\"); return __rollpack_require(\"src/lazy.js\"); }})",
    lazy.file_name
  )));
  assert!(main.code.ends_with("module.exports = __rollpack_require(\"src/main.js\");"));
  assert!(!lazy.code.contains("module.exports"));
}

#[tokio::test]
async fn hashes_follow_content_and_dependencies() {
  let files = |lazy: &str| {
    project(&[
      ("src/main.js", "export const load = () => [import('./a.js'), import('./b.js')];\n"),
      ("src/a.js", lazy),
      ("src/b.js", "export const b = 'b';\n"),
    ])
  };
  let first = generate(options(&["./src/main.js"]), PluginRegistry::new(), &files("export const a = 1;\n"))
    .await
    .unwrap();
  let second = generate(options(&["./src/main.js"]), PluginRegistry::new(), &files("export const a = 2;\n"))
    .await
    .unwrap();
  let again = generate(options(&["./src/main.js"]), PluginRegistry::new(), &files("export const a = 1;\n"))
    .await
    .unwrap();

  let a = chunk(&first, "a");
  assert!(a.file_name.starts_with("a-"));
  assert_eq!(a.file_name.len(), "a-12345678.js".len());
  assert!(!a.file_name.contains("!~{"));
  assert_ne!(a.file_name, chunk(&second, "a").file_name);
  assert_eq!(chunk(&first, "b").file_name, chunk(&again, "b").file_name);
  // Every chunk names the registry of its build, so `b` moves with `a`.
  assert_ne!(chunk(&first, "b").file_name, chunk(&second, "b").file_name);
  assert_eq!(chunk(&first, "main").file_name.as_str(), "main.js");

  let main = chunk(&first, "main");
  assert!(main.code.contains(&format!("import(\"./{}\")", a.file_name)));
  assert_eq!(main.dynamic_imports, vec![a.file_name.clone(), chunk(&first, "b").file_name.clone()]);
}

fn build_key(code: &str) -> &str {
  let start = code.find("var __rollpack_build = \"").unwrap() + "var __rollpack_build = \"".len();
  &code[start..start + code[start..].find('"').unwrap()]
}

#[tokio::test]
async fn builds_of_different_code_use_separate_registries() {
  let app = |greeting: &str| {
    project(&[
      ("src/main.js", "import { greet } from './greet.js';\nexport const load = () => import('./lazy.js');\ngreet();\n"),
      ("src/greet.js", &format!("export const greet = () => console.log('{greeting}');\n")),
      ("src/lazy.js", "export const lazy = 1;\n"),
    ])
  };
  let first = generate(options(&["./src/main.js"]), PluginRegistry::new(), &app("hello")).await.unwrap();
  let second = generate(options(&["./src/main.js"]), PluginRegistry::new(), &app("goodbye")).await.unwrap();
  let rebuilt = generate(options(&["./src/main.js"]), PluginRegistry::new(), &app("hello")).await.unwrap();

  let key = build_key(&chunk(&first, "main").code);
  assert!(!key.is_empty());
  assert_eq!(build_key(&chunk(&first, "lazy").code), key);
  assert_ne!(build_key(&chunk(&second, "main").code), key);
  assert_eq!(build_key(&chunk(&rebuilt, "main").code), key);

  let main = &chunk(&first, "main").code;
  let registry = main.find("__rollpack_registries[__rollpack_build]").unwrap();
  assert!(main.find("var __rollpack_build = ").unwrap() < registry);
  assert!(!main.contains("globalThis.__rollpack_registry "));
}

#[tokio::test]
async fn banner_and_footer_wrap_the_chunk() {
  let fs = project(&[("src/main.js", "console.log('main');\n")]);
  let options = BundlerOptions {
    banner: Some("/* banner */".to_string()),
    footer: Some("/* footer */".to_string()),
    entry_filenames: Some("js/[name].mjs".to_string()),
    ..options(&["./src/main.js"])
  };
  let output = generate(options, PluginRegistry::new(), &fs).await.unwrap();
  let main = chunk(&output, "main");
  assert_eq!(main.file_name.as_str(), "js/main.mjs");
  assert!(main.code.starts_with("/* banner */\n"));
  assert!(main.code.ends_with("\n/* footer */"));
}

fn sourcemap_options(sourcemap: SourceMapType) -> BundlerOptions {
  BundlerOptions { sourcemap: Some(sourcemap), ..options(&["./src/main.js"]) }
}

#[tokio::test]
async fn sourcemap_modes() {
  let fs = project(&[("src/main.js", "export const a = 1;\n")]);

  let file = generate(sourcemap_options(SourceMapType::File), PluginRegistry::new(), &fs).await.unwrap();
  let main = chunk(&file, "main");
  assert!(main.code.ends_with("\n//# sourceMappingURL=main.js.map"));
  assert_eq!(main.sourcemap_file_name.as_deref(), Some("main.js.map"));
  let map_asset = file.get("main.js.map").and_then(|output| output.as_asset()).unwrap();
  let json = map_asset.source.as_str().unwrap();
  assert!(json.contains("\"../src/main.js\""));

  let hidden = generate(sourcemap_options(SourceMapType::Hidden), PluginRegistry::new(), &fs).await.unwrap();
  assert!(!chunk(&hidden, "main").code.contains("sourceMappingURL"));
  assert!(hidden.get("main.js.map").is_some());

  let inline = generate(sourcemap_options(SourceMapType::Inline), PluginRegistry::new(), &fs).await.unwrap();
  assert!(chunk(&inline, "main")
    .code
    .contains("\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,"));
  assert_eq!(inline.assets.len(), 1);

  let none = generate(options(&["./src/main.js"]), PluginRegistry::new(), &fs).await.unwrap();
  assert!(chunk(&none, "main").map.is_none());
  assert_eq!(none.assets.len(), 1);
}

/// Adds a comment to every chunk and a manifest listing the bundle.
#[derive(Debug)]
struct Manifest;

impl Plugin for Manifest {
  fn name(&self) -> Cow<'static, str> {
    "manifest".into()
  }

  async fn render_chunk(&self, _ctx: &PluginContext, args: &HookRenderChunkArgs<'_>) -> HookRenderChunkReturn {
    Ok(Some(HookRenderChunkOutput {
      code: format!("{}\n// rendered {}", args.code, args.chunk.name),
      map: None,
    }))
  }

  async fn generate_bundle(&self, ctx: &PluginContext, args: &mut HookGenerateBundleArgs<'_>) -> HookNoopReturn {
    let files = args.bundle.iter().map(|output| output.file_name().to_string()).collect::<Vec<_>>();
    ctx.emit_asset(EmittedAsset {
      name: None,
      file_name: Some("manifest.json".to_string()),
      source: format!("{files:?}").into(),
    })?;
    Ok(())
  }
}

#[tokio::test]
async fn write_puts_every_output_on_disk() {
  let fs = project(&[("src/main.js", "export const a = 1;\n")]);
  let mut plugins = PluginRegistry::new();
  plugins.register(Manifest);
  let options = BundlerOptions { sourcemap: Some(SourceMapType::File), ..options(&["./src/main.js"]) };

  let mut bundler = bundler(options, plugins, &fs);
  let output = bundler.write().await.unwrap();

  let file_names = output.assets.iter().map(|output| output.file_name().to_string()).collect::<Vec<_>>();
  assert_eq!(file_names, vec!["main.js", "main.js.map", "manifest.json"]);
  assert!(chunk(&output, "main").code.contains("\n// rendered main\n//# sourceMappingURL=main.js.map"));

  for output in &output.assets {
    let path = Path::new(CWD).join("dist").join(output.file_name().as_str());
    assert_eq!(fs.read(&path).unwrap(), output.content_as_bytes());
  }
  assert_eq!(
    fs.read_to_string(Path::new("/project/dist/manifest.json")).unwrap(),
    "[\"main.js\", \"main.js.map\"]"
  );
}
