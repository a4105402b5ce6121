mod bundler_options;
mod chunk;
mod file_emitter;
mod module;
mod module_loader;
mod types;

pub use bundler_options::{
  external::ExternalMatcher,
  filename_template::FilenameTemplate,
  input_item::InputItem,
  manual_chunk::{ManualChunk, NormalizedManualChunk},
  module_type::ModuleType,
  normalized_bundler_options::NormalizedBundlerOptions,
  output_format::OutputFormat,
  output_option_types::{DynamicImportFallback, LogLevel, SharedChunkStrategy, SourceMapType},
  platform::Platform,
  resolve_options::{AliasItem, ResolveOptions},
  treeshake_options::TreeshakeOptions,
  BundlerOptions,
};

pub use crate::{
  chunk::{types::preliminary_filename::PreliminaryFilename, Chunk},
  file_emitter::{EmittedAsset, FileEmitter, SharedFileEmitter},
  module::{external_module::ExternalModule, normal_module::NormalModule, Module},
  module_loader::{task_result::NormalModuleTaskResult, ModuleLoaderMsg},
  types::{
    chunk_kind::ChunkKind,
    entry_point::{EntryPoint, EntryPointKind},
    import_kind::ImportKind,
    import_record::{ImportRecord, ImportRecordMeta, RawImportRecord, ResolvedImportRecord},
    module_id::{stabilize_module_id, ModuleId},
    module_info::{ModuleInfo, SharedModuleInfos},
    output::Output,
    output_asset::{AssetSource, OutputAsset},
    output_chunk::{Modules, OutputChunk},
    raw_idx::{ChunkIdx, ImportRecordIdx, ModuleIdx},
    rendered_chunk::RenderedChunk,
    rendered_module::RenderedModule,
    resolved_id::ResolvedId,
    side_effects,
  },
};

pub type IndexModules = oxc_index::IndexVec<ModuleIdx, Module>;
pub type SharedNormalizedBundlerOptions = std::sync::Arc<NormalizedBundlerOptions>;
