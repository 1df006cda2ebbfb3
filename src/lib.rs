//! ts-catalog
//!
//! Loading, lookup, merging and byte-stable serialization of Qt Linguist
//! `.ts` translation catalogs, plus the quality checks and statistics the
//! `ts-catalog` tool reports on them.

pub mod catalog;
pub mod check;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod lookup;
pub mod merge;
pub mod stats;
pub mod types;
pub mod workspace;

pub use catalog::{
    Catalog,
    Context,
    Message,
};
pub use error::CatalogError;
pub use format::{
    parse_catalog,
    write_catalog,
};
pub use lookup::Translator;
pub use merge::merge;
