//! Provenance types shared by the catalog, merge and check modules.

use std::fmt;
use std::str::FromStr;

/// A line reference in a `<location>` element.
///
/// `lupdate` writes absolute lines (`line="172"`) by default and relative
/// lines (`line="+3"`) when asked to; both are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineNumber {
    /// 1-based line.
    Absolute(u32),
    /// Offset from the previous location in the same file.
    Relative(i32),
}

impl LineNumber {
    /// Returns the absolute line, if this is one.
    #[must_use]
    pub const fn absolute(self) -> Option<u32> {
        match self {
            Self::Absolute(line) => Some(line),
            Self::Relative(_) => None,
        }
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(line) => write!(f, "{line}"),
            Self::Relative(offset) if *offset >= 0 => write!(f, "+{offset}"),
            Self::Relative(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for LineNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(['+', '-']) {
            s.parse::<i32>().map(Self::Relative)
        } else {
            s.parse::<u32>().map(Self::Absolute)
        }
    }
}

/// Where a source string appears in the host application's code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Path relative to the catalog, as `lupdate` wrote it.
    pub filename: Option<String>,
    /// Line in `filename`.
    pub line: Option<LineNumber>,
}

impl Location {
    /// A location with an absolute line.
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self { filename: Some(filename.into()), line: Some(LineNumber::Absolute(line)) }
    }

    /// Two locations point at the same place when both the file and the
    /// absolute line are known and equal.
    #[must_use]
    pub fn same_place(&self, other: &Self) -> bool {
        let (Some(file), Some(other_file)) = (&self.filename, &other.filename) else {
            return false;
        };
        let (Some(line), Some(other_line)) = (self.absolute_line(), other.absolute_line()) else {
            return false;
        };
        file == other_file && line == other_line
    }

    /// The line, when it is absolute.
    #[must_use]
    pub fn absolute_line(&self) -> Option<u32> {
        self.line.and_then(LineNumber::absolute)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => write!(f, "{file}"),
            (None, Some(line)) => write!(f, "<unknown>:{line}"),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}
