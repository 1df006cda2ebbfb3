//! Layout conventions of a `.ts` document.
//!
//! Different tools write the same catalog differently: Crowdin indents
//! contexts by two spaces and leaves quotes literal, `lupdate` starts
//! contexts at column zero, indents by four and spells quotes as entities.
//! The reader records what it saw so that saving writes the file back the
//! way it came in.

/// Prolog written in front of the `<TS>` root by both `lupdate` and Crowdin.
pub const DEFAULT_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

/// Line terminator used throughout a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Newline {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`, as left by a Windows checkout.
    CrLf,
}

/// Quote characters that element text spells as entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuoteEscapes {
    /// `"` is written as `&quot;`.
    pub quote: bool,
    /// `'` is written as `&apos;`.
    pub apostrophe: bool,
}

impl QuoteEscapes {
    /// What attribute values need inside double quotes.
    pub const ATTRIBUTE: Self = Self { quote: true, apostrophe: false };
    /// Both quote characters as entities, the way `lupdate` writes text.
    pub const ALL: Self = Self { quote: true, apostrophe: true };
}

/// How a document is laid out, recorded on load and reused on save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentStyle {
    /// Everything in front of the `<TS>` root, with `\n` line ends.
    pub prolog: String,
    /// The document starts with a byte order mark.
    pub byte_order_mark: bool,
    /// Line terminator.
    pub newline: Newline,
    /// Indentation of `<context>` elements.
    pub context_indent: String,
    /// Indentation added for each level below `<context>`.
    pub indent_step: String,
    /// Entity spelling of quotes in element text.
    pub quotes: QuoteEscapes,
    /// Empty translations are written `<translation/>` rather than
    /// `<translation></translation>`.
    pub self_closing_empty: bool,
}

impl Default for DocumentStyle {
    /// Crowdin's layout, which the FreeCAD catalogs use.
    fn default() -> Self {
        Self {
            prolog: DEFAULT_PROLOG.to_string(),
            byte_order_mark: false,
            newline: Newline::Lf,
            context_indent: "  ".to_string(),
            indent_step: "  ".to_string(),
            quotes: QuoteEscapes::default(),
            self_closing_empty: false,
        }
    }
}

impl DocumentStyle {
    /// The layout Qt's `lupdate` writes.
    #[must_use]
    pub fn lupdate() -> Self {
        Self {
            context_indent: String::new(),
            indent_step: "    ".to_string(),
            quotes: QuoteEscapes::ALL,
            ..Self::default()
        }
    }
}
