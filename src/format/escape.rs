//! XML escaping and end-of-line handling.
//!
//! Text content always escapes `&`, `<` and `>`. Quotes and apostrophes are
//! escaped as the document's [`QuoteEscapes`] say. Control characters other
//! than tab and newline become character references so that they survive a
//! load/save cycle.

use std::borrow::Cow;
use std::fmt::Write;

use super::style::QuoteEscapes;

/// Escapes element text.
#[must_use]
pub fn escape_text(text: &str, quotes: QuoteEscapes) -> Cow<'_, str> {
    escape(text, quotes)
}

/// Escapes a double-quoted attribute value.
#[must_use]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, QuoteEscapes::ATTRIBUTE)
}

/// XML end-of-line handling: `\r\n` and a lone `\r` both become `\n`.
///
/// Applies to raw markup only. A `\r` spelled as `&#xd;` is content and is
/// kept by decoding after this step.
#[must_use]
pub fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Control characters that need a character reference.
fn is_escaped_control(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}

/// Whether `c` is written as an entity or character reference.
const fn needs_escape(c: char, quotes: QuoteEscapes) -> bool {
    matches!(c, '&' | '<' | '>') || (quotes.quote && c == '"') || (quotes.apostrophe && c == '\'')
}

/// Shared body of [`escape_text`] and [`escape_attribute`].
fn escape(text: &str, quotes: QuoteEscapes) -> Cow<'_, str> {
    if !text.chars().any(|c| needs_escape(c, quotes) || is_escaped_control(c)) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if quotes.quote => escaped.push_str("&quot;"),
            '\'' if quotes.apostrophe => escaped.push_str("&apos;"),
            c if is_escaped_control(c) => {
                // Writing to a String cannot fail.
                let _ = write!(escaped, "&#x{:x};", u32::from(c));
            }
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
