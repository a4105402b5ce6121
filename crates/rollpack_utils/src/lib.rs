pub mod base64;
pub mod bitset;
pub mod ecmascript;
pub mod hash_placeholder;
pub mod indexmap;
pub mod make_unique_name;
pub mod option_ext;
pub mod path_ext;
pub mod pretty_type_name;
pub mod rayon;
pub mod sanitize_file_name;
pub mod xxhash;

pub use concat_string::concat_string;
