pub mod bundle_output;
pub mod instantiated_chunk;

use std::sync::Arc;

use rollpack_common::NormalizedBundlerOptions;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
