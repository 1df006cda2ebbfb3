use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::check::{
    CheckOptions,
    LengthRatio,
    Rule,
    Severity,
};
use crate::merge::{
    DEFAULT_SIMILARITY_PERCENT,
    LocationPolicy,
    MergeOptions,
    ObsoletePolicy,
};

/// One invalid setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.includePatterns[0]")
    pub field_path: String,
    /// What is wrong, with an example of a valid value.
    pub message: String,
}

impl ValidationError {
    /// Creates an error for the field at `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Failure to load settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more settings are out of range.
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The file could not be read.
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid JSON for the settings.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of `.ts-catalog.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TsCatalogSettings {
    /// `merge` section.
    pub merge: MergeConfig,
    /// `check` section.
    pub check: CheckConfig,
    /// `translationFiles` section.
    pub translation_files: TranslationFilesConfig,
}

/// Merge behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeConfig {
    /// `keep` leaves translated leftovers as obsolete messages, `drop`
    /// removes them.
    pub obsolete_policy: ObsoletePolicy,
    /// Carry translations over to slightly changed sources.
    pub match_similar: bool,
    /// Minimum source similarity (1-100) for carrying a translation over.
    pub similarity_percent: u32,
    /// Which `<location>` elements the merged messages keep.
    pub locations: LocationPolicy,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            obsolete_policy: ObsoletePolicy::Keep,
            match_similar: true,
            similarity_percent: DEFAULT_SIMILARITY_PERCENT,
            locations: LocationPolicy::Keep,
        }
    }
}

impl MergeConfig {
    /// Options for [`crate::merge::merge`].
    #[must_use]
    pub const fn to_options(&self) -> MergeOptions {
        MergeOptions {
            obsolete_policy: self.obsolete_policy,
            match_similar: self.match_similar,
            similarity_percent: self.similarity_percent,
            locations: self.locations,
        }
    }
}

/// Check behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConfig {
    /// Per-rule severity, keyed by rule id (e.g. `"length-ratio": "warning"`).
    pub severity: BTreeMap<Rule, Severity>,
    /// Bounds for the `length-ratio` rule.
    pub length_ratio: LengthRatio,
}

impl CheckConfig {
    /// Options for [`crate::check::check_catalog`].
    #[must_use]
    pub fn to_options(&self) -> CheckOptions {
        CheckOptions { severities: self.severity.clone(), length_ratio: self.length_ratio }
    }
}

/// Which files directory arguments expand to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    /// Globs a catalog must match.
    pub include_patterns: Vec<String>,
    /// Globs that rule a file out.
    pub exclude_patterns: Vec<String>,
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.ts".to_string()],
            exclude_patterns: vec!["**/node_modules/**".to_string()],
        }
    }
}

impl TsCatalogSettings {
    /// # Errors
    /// - Similarity threshold out of range
    /// - Inverted length ratio bounds
    /// - Missing or invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !(1..=100).contains(&self.merge.similarity_percent) {
            errors.push(ValidationError::new(
                "merge.similarityPercent",
                format!(
                    "Must be between 1 and 100, got {}. Example: 75",
                    self.merge.similarity_percent
                ),
            ));
        }

        let ratio = self.check.length_ratio;
        if ratio.min_percent > ratio.max_percent {
            errors.push(ValidationError::new(
                "check.lengthRatio",
                format!(
                    "minPercent ({}) cannot be greater than maxPercent ({})",
                    ratio.min_percent, ratio.max_percent
                ),
            ));
        }

        let files = &self.translation_files;
        if files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/translations/*.ts\"]",
            ));
        }

        for (index, pattern) in files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
