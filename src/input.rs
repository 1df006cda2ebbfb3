//! Reading and writing catalog files.

/// Loading and saving catalog files.
mod catalog_file;
/// Target language from file names.
mod language;

pub use catalog_file::{
    load_catalog_file,
    read_catalog_file,
    save_catalog_file,
};
pub use language::detect_language_from_path;
