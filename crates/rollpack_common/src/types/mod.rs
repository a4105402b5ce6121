pub mod chunk_kind;
pub mod entry_point;
pub mod import_kind;
pub mod import_record;
pub mod module_id;
pub mod module_info;
pub mod output;
pub mod output_asset;
pub mod output_chunk;
pub mod raw_idx;
pub mod rendered_chunk;
pub mod rendered_module;
pub mod resolved_id;
pub mod side_effects;
