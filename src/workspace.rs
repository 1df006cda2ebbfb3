//! Discovery of catalog files on disk.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use crate::config::{
    FileMatcher,
    MatcherError,
    TranslationFilesConfig,
};

/// File extension of Qt Linguist catalogs.
const CATALOG_EXTENSION: &str = "ts";

/// Walks `root` and returns every catalog file `matcher` accepts,
/// honouring `.gitignore` files along the way.
#[must_use]
pub fn find_catalog_files(root: &Path, matcher: &FileMatcher) -> Vec<PathBuf> {
    let mut found_files = Vec::new();

    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(root) else {
            continue;
        };
        if !matcher.matches(relative_path) {
            continue;
        }

        found_files.push(path.to_path_buf());
    }

    found_files.sort();
    tracing::debug!("Found {} catalog files under {:?}", found_files.len(), root);
    found_files
}

/// Expands command-line paths into catalog files.
///
/// Directories are walked with the `translationFiles` patterns. Files named
/// explicitly are taken as they are when they carry the `.ts` extension and
/// skipped with a warning otherwise.
pub fn expand_paths(
    paths: &[PathBuf],
    config: &TranslationFilesConfig,
) -> Result<Vec<PathBuf>, MatcherError> {
    let matcher = FileMatcher::new(config)?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(find_catalog_files(path, &matcher));
        } else if has_catalog_extension(path) {
            files.push(path.clone());
        } else {
            tracing::warn!("Skipping {}: not a .ts catalog", path.display());
        }
    }

    files.dedup();
    Ok(files)
}

/// Whether `path` ends in `.ts`, in any case.
fn has_catalog_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(CATALOG_EXTENSION))
}
