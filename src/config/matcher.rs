//! `translationFiles` include/exclude patterns.

use std::path::Path;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::TranslationFilesConfig;

/// A `translationFiles` pattern globset rejects.
#[derive(Debug, thiserror::Error)]
#[error("Invalid translation file pattern '{pattern}': {source}")]
pub struct MatcherError {
    /// The pattern as configured.
    pub pattern: String,
    /// Why it was rejected.
    #[source]
    pub source: globset::Error,
}

/// Compiled patterns, matched against paths relative to a walked directory.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Paths that are catalogs.
    include: GlobSet,
    /// Paths skipped even when included.
    exclude: GlobSet,
}

impl FileMatcher {
    /// Compiles both pattern lists.
    ///
    /// # Errors
    /// Returns the first pattern that does not compile.
    pub fn new(config: &TranslationFilesConfig) -> Result<Self, MatcherError> {
        Ok(Self {
            include: compile(&config.include_patterns)?,
            exclude: compile(&config.exclude_patterns)?,
        })
    }

    /// Whether `relative_path` is included and not excluded.
    #[must_use]
    pub fn matches(&self, relative_path: &Path) -> bool {
        self.include.is_match(relative_path) && !self.exclude.is_match(relative_path)
    }
}

/// Builds one set from `patterns`.
fn compile(patterns: &[String]) -> Result<GlobSet, MatcherError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|source| MatcherError { pattern: pattern.clone(), source })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| MatcherError { pattern: patterns.join(", "), source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn config(include: &[&str], exclude: &[&str]) -> TranslationFilesConfig {
        TranslationFilesConfig {
            include_patterns: include.iter().copied().map(String::from).collect(),
            exclude_patterns: exclude.iter().copied().map(String::from).collect(),
        }
    }

    #[rstest]
    #[case::nested("src/Mod/Arch/Resources/translations/Arch_uk.ts", true)]
    #[case::top_level("Arch.ts", true)]
    #[case::compiled("translations/Arch_uk.qm", false)]
    #[case::node_modules("node_modules/pkg/index.ts", false)]
    fn test_default_patterns(#[case] path: &str, #[case] expected: bool) {
        let matcher = FileMatcher::new(&TranslationFilesConfig::default()).unwrap();

        assert_eq!(matcher.matches(Path::new(path)), expected);
    }

    #[rstest]
    #[case::included("Arch/translations/Arch_uk.ts", true)]
    #[case::excluded("build/translations/Arch_uk.ts", false)]
    #[case::not_included("Arch/Arch_uk.ts", false)]
    fn test_exclude_wins_over_include(#[case] path: &str, #[case] expected: bool) {
        let matcher =
            FileMatcher::new(&config(&["**/translations/*.ts"], &["build/**"])).unwrap();

        assert_eq!(matcher.matches(Path::new(path)), expected);
    }

    #[rstest]
    #[case::include(&["**/*.{ts"], &[])]
    #[case::exclude(&["**/*.ts"], &["[invalid"])]
    fn test_invalid_pattern_is_named(#[case] include: &[&str], #[case] exclude: &[&str]) {
        let error = FileMatcher::new(&config(include, exclude)).unwrap_err();

        let bad = include.iter().chain(exclude).find(|p| Glob::new(p).is_err()).unwrap();
        assert_eq!(error.pattern, *bad);
    }
}
