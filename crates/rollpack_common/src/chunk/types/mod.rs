pub mod preliminary_filename;
