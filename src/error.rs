//! Errors surfaced by file-level operations and the command-line tool.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{
    ConfigError,
    MatcherError,
};
use crate::format::ParseError;

/// Failure of a file-level catalog operation.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid `.ts` document.
    #[error("{}: {source}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Position and cause.
        #[source]
        source: Box<ParseError>,
    },

    /// The configuration file is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A file pattern is invalid.
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ParseErrorKind;

    #[test]
    fn test_parse_error_names_file_and_position() {
        let error = CatalogError::Parse {
            path: PathBuf::from("translations/Arch_uk.ts"),
            source: Box::new(ParseError {
                line: 12,
                context: Some("Arch_Wall".to_string()),
                message: Some(2),
                kind: ParseErrorKind::Empty,
            }),
        };

        let text = error.to_string();

        assert!(
            text.starts_with("translations/Arch_uk.ts: line 12 (context 'Arch_Wall', message #2)")
        );
    }
}
