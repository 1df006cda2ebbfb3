//! Qt Linguist `.ts` XML format: reading, writing and escaping.

/// Parse errors with their position.
mod error;
/// Entity escaping and end-of-line handling.
mod escape;
/// Recursive-descent reader over `quick-xml` events.
mod reader;
/// Layout conventions recorded by the reader.
mod style;
/// Serializer reproducing a recorded layout.
mod writer;

pub use error::{
    ParseError,
    ParseErrorKind,
};
pub use escape::{
    escape_attribute,
    escape_text,
    normalize_newlines,
};
pub use reader::parse_catalog;
pub use style::{
    DEFAULT_PROLOG,
    DocumentStyle,
    Newline,
    QuoteEscapes,
};
pub use writer::{
    TsDocument,
    write_catalog,
};
