//! Operations behind the `ts-catalog` subcommands.
//!
//! Each function does the file work and returns what the binary prints, so
//! that the command-line layer stays a thin argument parser.

use std::path::{
    Path,
    PathBuf,
};

use crate::check::{
    Finding,
    check_catalog,
};
use crate::config::TsCatalogSettings;
use crate::error::CatalogError;
use crate::format::{
    parse_catalog,
    write_catalog,
};
use crate::input::{
    load_catalog_file,
    read_catalog_file,
    save_catalog_file,
};
use crate::lookup::{
    LookupOutcome,
    Translator,
};
use crate::merge::{
    MergeOptions,
    MergeReport,
    merge,
};
use crate::stats::CatalogStats;
use crate::workspace::expand_paths;

/// Arguments of a single lookup.
#[derive(Debug, Clone, Copy)]
pub struct LookupQuery<'a> {
    /// Context name.
    pub context: &'a str,
    /// Source text.
    pub source: &'a str,
    /// Disambiguating comment.
    pub comment: Option<&'a str>,
    /// Count for a numerus message; `None` looks up a plain message.
    pub count: Option<i64>,
}

/// Text found by [`lookup`], with how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupAnswer {
    /// Translation, or the source text on a miss.
    pub text: String,
    /// Whether a translation was used.
    pub outcome: LookupOutcome,
}

/// Looks up one message in the catalog at `file`.
pub fn lookup(file: &Path, query: LookupQuery<'_>) -> Result<LookupAnswer, CatalogError> {
    let catalog = load_catalog_file(file)?;
    let translator = Translator::new(&catalog);

    let answer = query.count.map_or_else(
        || {
            let found = translator.lookup_with_comment(query.context, query.source, query.comment);
            LookupAnswer { text: found.text.to_string(), outcome: found.outcome }
        },
        |count| {
            let found = translator.lookup_plural(query.context, query.source, query.comment, count);
            LookupAnswer { text: found.text, outcome: found.outcome }
        },
    );
    Ok(answer)
}

/// Merges `extraction` into the catalog at `old` and writes the result to
/// `output`, or back over `old` when no output is given.
pub fn merge_files(
    old: &Path,
    extraction: &Path,
    output: Option<&Path>,
    options: &MergeOptions,
) -> Result<MergeReport, CatalogError> {
    let previous = load_catalog_file(old)?;
    let extracted = read_catalog_file(extraction)?;

    let outcome = merge(&previous, &extracted, options);
    let target = output.unwrap_or(old);
    save_catalog_file(target, &outcome.catalog)?;

    tracing::info!("Merged {} into {}: {}", extraction.display(), target.display(), outcome.report);
    Ok(outcome.report)
}

/// Findings for one checked file.
#[derive(Debug, Clone)]
pub struct FileFindings {
    /// Checked catalog.
    pub path: PathBuf,
    /// Its findings, possibly none.
    pub findings: Vec<Finding>,
}

/// Checks every catalog named by `paths`, walking directories.
pub fn check_paths(
    paths: &[PathBuf],
    settings: &TsCatalogSettings,
) -> Result<Vec<FileFindings>, CatalogError> {
    let options = settings.check.to_options();
    let files = expand_paths(paths, &settings.translation_files)?;

    files
        .into_iter()
        .map(|path| {
            let catalog = read_catalog_file(&path)?;
            let findings = check_catalog(&catalog, &options);
            tracing::debug!("{} findings in {}", findings.len(), path.display());
            Ok(FileFindings { path, findings })
        })
        .collect()
}

/// Counts translation progress of the catalog at `file`.
pub fn stats(file: &Path) -> Result<CatalogStats, CatalogError> {
    load_catalog_file(file).map(|catalog| CatalogStats::collect(&catalog))
}

/// Rewrites each file in the layout it was read with. With `check` set nothing is
/// written. Returns the files whose content would change.
pub fn format_files(files: &[PathBuf], check: bool) -> Result<Vec<PathBuf>, CatalogError> {
    let mut changed = Vec::new();

    for path in files {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.clone(), source })?;
        let catalog = parse_catalog(&content).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source: Box::new(source),
        })?;

        let rewritten = write_catalog(&catalog);
        if rewritten == content {
            continue;
        }

        if !check {
            save_catalog_file(path, &catalog)?;
            tracing::debug!("Reformatted {}", path.display());
        }
        changed.push(path.clone());
    }

    Ok(changed)
}
