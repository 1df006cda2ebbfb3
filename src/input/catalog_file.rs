//! Catalog files on disk.

use std::path::Path;

use super::detect_language_from_path;
use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::format::{
    parse_catalog,
    write_catalog,
};

/// Reads and parses a catalog exactly as written.
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid `.ts` document.
pub fn read_catalog_file(file_path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|source| CatalogError::Read { path: file_path.to_path_buf(), source })?;

    parse_catalog(&content).map_err(|source| CatalogError::Parse {
        path: file_path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Reads a catalog and fills in its target language from the file name when
/// the document does not declare one.
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid `.ts` document.
pub fn load_catalog_file(file_path: &Path) -> Result<Catalog, CatalogError> {
    let mut catalog = read_catalog_file(file_path)?;

    if catalog.language.is_none() {
        catalog.language = detect_language_from_path(file_path);
        tracing::debug!(
            "Inferred language {:?} for {}",
            catalog.language,
            file_path.display()
        );
    }

    tracing::debug!(
        path = %file_path.display(),
        contexts = catalog.contexts.len(),
        messages = catalog.message_count(),
        "Loaded catalog"
    );
    Ok(catalog)
}

/// Writes `catalog` in its recorded layout.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn save_catalog_file(file_path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    std::fs::write(file_path, write_catalog(catalog))
        .map_err(|source| CatalogError::Write { path: file_path.to_path_buf(), source })
}
