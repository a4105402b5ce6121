pub mod hook_build_end_args;
pub mod hook_generate_bundle_args;
pub mod hook_load;
pub mod hook_render_chunk;
pub mod hook_resolve_id;
pub mod hook_transform;
pub mod hook_usage;
pub mod plugin_idx;
