pub mod assemble_output;
pub mod chunk;
pub mod convert_to_js;
pub mod load_source;
pub mod normalize_options;
