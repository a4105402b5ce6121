use rollpack_common::{
  Chunk, ChunkIdx, Module, ModuleId, ModuleIdx, NormalModule, RenderedModule,
};
use rollpack_ecmascript::{render_factory, FactoryRenderInput, RecordResolution};
use rollpack_sourcemap::{collapse_sourcemaps, SourceJoiner, SourceMap, SourceMapSource};
use rollpack_utils::{
  concat_string,
  ecmascript::to_js_string_literal,
  rayon::{IntoParallelRefIterator, ParallelIterator},
};
use rustc_hash::FxHashMap;

use crate::{graph::ChunkGraph, utils::chunk::render_chunk_exports::render_chunk_exports};

use super::GenerateStage;

const RUNTIME: &str = include_str!("../../runtime/runtime.js");

pub(super) struct ChunkRenderOutput {
  pub code: String,
  pub map: Option<SourceMap>,
  pub rendered_modules: Vec<(ModuleId, RenderedModule)>,
}

impl GenerateStage<'_> {
  /// Banner, external and cross-chunk imports, the runtime, one factory per module in execution
  /// order, the entry footer and the footer, joined with their mappings.
  pub(super) fn render_chunk(&self, chunk_idx: ChunkIdx, chunk_graph: &ChunkGraph) -> ChunkRenderOutput {
    let module_table = &self.link_output.module_table;
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    let format = self.options.format;
    let mut joiner = SourceJoiner::new(self.options.sourcemap_enabled());

    if let Some(banner) = &self.options.banner {
      joiner.append_source(banner.clone());
    }
    if !format.keep_esm_import_export_syntax() {
      joiner.append_source("\"use strict\";");
    }

    let external_bindings = chunk
      .imports_from_external_modules
      .iter()
      .enumerate()
      .map(|(k, idx)| (*idx, concat_string!("__rollpack_external_", itoa::Buffer::new().format(k))))
      .collect::<FxHashMap<_, _>>();

    for idx in &chunk.imports_from_external_modules {
      let binding = &external_bindings[idx];
      let specifier = to_js_string_literal(module_table[*idx].id());
      joiner.append_source(if format.keep_esm_import_export_syntax() {
        concat_string!("import * as ", binding, " from ", specifier, ";")
      } else {
        concat_string!("var ", binding, " = __rollpack_to_esm(require(", specifier, "));")
      });
    }

    for importee in &chunk.cross_chunk_imports {
      let path = to_js_string_literal(&chunk.import_path_for(&chunk_graph.chunk_table[*importee]));
      joiner.append_source(if format.keep_esm_import_export_syntax() {
        concat_string!("import ", path, ";")
      } else {
        concat_string!("require(", path, ");")
      });
    }

    let build_key = to_js_string_literal(&self.build_key);
    joiner.append_source(concat_string!("var __rollpack_build = ", build_key, ";"));
    joiner.append_source(RUNTIME.trim_end());

    let rendered = chunk
      .modules
      .par_iter()
      .filter_map(|idx| module_table[*idx].as_normal())
      .map(|module| self.render_module(module, chunk, chunk_graph, &external_bindings))
      .collect::<Vec<_>>();

    let mut rendered_modules = Vec::with_capacity(rendered.len());
    for (module, code, map) in rendered {
      rendered_modules
        .push((module.id.clone(), RenderedModule { exec_order: module.exec_order, code: code.clone() }));
      match map {
        Some(map) => joiner.append_source(SourceMapSource::new(code, map)),
        None => joiner.append_source(code),
      }
    }

    if let Some(exports) = render_chunk_exports(chunk, module_table, format) {
      joiner.append_source(exports);
    }
    if let Some(footer) = &self.options.footer {
      joiner.append_source(footer.clone());
    }

    let (code, map) = joiner.join();
    ChunkRenderOutput { code, map, rendered_modules }
  }

  fn render_module<'m>(
    &self,
    module: &'m NormalModule,
    chunk: &Chunk,
    chunk_graph: &ChunkGraph,
    external_bindings: &FxHashMap<ModuleIdx, String>,
  ) -> (&'m NormalModule, String, Option<SourceMap>) {
    let records = module
      .import_records
      .iter()
      .map(|record| {
        if record.is_pruned() {
          return RecordResolution::Pruned;
        }
        let importee = record.resolved_module();
        match &self.link_output.module_table[importee] {
          Module::External(_) if record.kind.is_static() => external_bindings
            .get(&importee)
            .map_or(RecordResolution::Keep, |binding| RecordResolution::External {
              binding: binding.clone(),
            }),
          Module::External(_) => RecordResolution::Keep,
          Module::Normal(importee) if record.kind.is_static() => {
            RecordResolution::Internal { stable_id: importee.stable_id.clone() }
          }
          Module::Normal(importee) => RecordResolution::DynamicImport {
            expression: self.render_dynamic_import(importee, chunk, chunk_graph),
          },
        }
      })
      .collect::<Vec<_>>();

    let source_name =
      (self.options.sourcemap_enabled() && !module.is_virtual()).then_some(&*module.id);
    let input = FactoryRenderInput { stable_id: &module.stable_id, records: &records, source_name };
    let (code, edit_map) = render_factory(&module.source, &module.scan, &input);

    let map = edit_map.and_then(|edit_map| {
      let chain = module.sourcemap_chain.iter().chain(std::iter::once(&edit_map)).collect::<Vec<_>>();
      collapse_sourcemaps(&chain)
    });
    (module, code, map)
  }

  /// `import('./x')` loads the chunk of `x` when it lives elsewhere, then requires the module.
  fn render_dynamic_import(
    &self,
    importee: &NormalModule,
    chunk: &Chunk,
    chunk_graph: &ChunkGraph,
  ) -> String {
    let require = concat_string!(
      "function () { return __rollpack_require(",
      to_js_string_literal(&importee.stable_id),
      "); }"
    );
    let importee_chunk = chunk_graph.module_to_chunk[importee.idx]
      .map(|idx| &chunk_graph.chunk_table[idx])
      .filter(|importee_chunk| !std::ptr::eq(*importee_chunk, chunk));
    let Some(importee_chunk) = importee_chunk else {
      return concat_string!("Promise.resolve().then(", require, ")");
    };

    let path = to_js_string_literal(&chunk.import_path_for(importee_chunk));
    if self.options.format.keep_esm_import_export_syntax() {
      concat_string!("import(", path, ").then(", require, ")")
    } else {
      concat_string!(
        "Promise.resolve().then(function () { require(",
        path,
        "); return __rollpack_require(",
        to_js_string_literal(&importee.stable_id),
        "); })"
      )
    }
  }
}
