pub mod finalize_chunks;
pub mod generate_rendered_chunk;
pub mod render_chunk_exports;
