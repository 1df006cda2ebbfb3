//! `.ts` document writer.
//!
//! Writes one element per line in the layout recorded in the catalog's
//! [`DocumentStyle`]: its prolog, line terminator, indentation, quote
//! escaping and spelling of empty translations. The output depends only on
//! the catalog, so a catalog that was loaded and not changed serializes to
//! the bytes it was read from.

use std::fmt::{
    self,
    Write,
};

use super::escape::{
    escape_attribute,
    escape_text,
};
use super::style::{
    DocumentStyle,
    Newline,
};
use crate::catalog::{
    Catalog,
    Context,
    LENGTH_VARIANT_SEPARATOR,
    Message,
    Translation,
    TranslationText,
};

/// Serializes a catalog in its recorded layout.
#[must_use]
pub fn write_catalog(catalog: &Catalog) -> String {
    TsDocument(catalog).to_string()
}

/// Display adapter writing a catalog as a `.ts` document.
#[derive(Debug, Clone, Copy)]
pub struct TsDocument<'a>(pub &'a Catalog);

impl fmt::Display for TsDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = &self.0.style;
        match style.newline {
            Newline::Lf => TsWriter { out: f, style }.document(self.0),
            Newline::CrLf => TsWriter { out: CrLf(f), style }.document(self.0),
        }
    }
}

/// Turns every `\n` written through it into `\r\n`.
struct CrLf<W>(W);

impl<W: Write> Write for CrLf<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.0.write_str(first)?;
        }
        for line in lines {
            self.0.write_str("\r\n")?;
            self.0.write_str(line)?;
        }
        Ok(())
    }
}

/// Element writer bound to one layout.
struct TsWriter<'s, W> {
    /// Destination.
    out: W,
    /// Layout to reproduce.
    style: &'s DocumentStyle,
}

impl<W: Write> TsWriter<'_, W> {
    /// Writes the whole document.
    fn document(mut self, catalog: &Catalog) -> fmt::Result {
        if self.style.byte_order_mark {
            self.out.write_char('\u{feff}')?;
        }
        self.out.write_str(&self.style.prolog)?;
        write!(self.out, "<TS version=\"{}\"", escape_attribute(&catalog.version))?;
        if let Some(language) = &catalog.language {
            write!(self.out, " language=\"{}\"", escape_attribute(language))?;
        }
        if let Some(source_language) = &catalog.source_language {
            write!(self.out, " sourcelanguage=\"{}\"", escape_attribute(source_language))?;
        }
        self.out.write_str(">\n")?;

        if !catalog.dependencies.is_empty() {
            self.indent(0)?;
            self.out.write_str("<dependencies>\n")?;
            for dependency in &catalog.dependencies {
                self.indent(0)?;
                writeln!(self.out, "<dependency catalog=\"{}\"/>", escape_attribute(dependency))?;
            }
            self.indent(0)?;
            self.out.write_str("</dependencies>\n")?;
        }

        for context in &catalog.contexts {
            self.context(context)?;
        }

        self.out.write_str("</TS>\n")
    }

    /// Indentation for `depth` levels below `<context>`.
    fn indent(&mut self, depth: usize) -> fmt::Result {
        self.out.write_str(&self.style.context_indent)?;
        for _ in 0..depth {
            self.out.write_str(&self.style.indent_step)?;
        }
        Ok(())
    }

    /// Writes one `<context>`.
    fn context(&mut self, context: &Context) -> fmt::Result {
        self.indent(0)?;
        self.out.write_str("<context>\n")?;
        self.element(1, "name", &context.name)?;
        if let Some(comment) = &context.comment {
            self.element(1, "comment", comment)?;
        }
        for message in &context.messages {
            self.message(message)?;
        }
        self.indent(0)?;
        self.out.write_str("</context>\n")
    }

    /// Writes one `<message>` with its children in `lupdate` order.
    fn message(&mut self, message: &Message) -> fmt::Result {
        self.indent(1)?;
        self.out.write_str("<message")?;
        if let Some(id) = &message.id {
            write!(self.out, " id=\"{}\"", escape_attribute(id))?;
        }
        if message.numerus {
            self.out.write_str(" numerus=\"yes\"")?;
        }
        self.out.write_str(">\n")?;

        for location in &message.locations {
            self.indent(2)?;
            self.out.write_str("<location")?;
            if let Some(filename) = &location.filename {
                write!(self.out, " filename=\"{}\"", escape_attribute(filename))?;
            }
            if let Some(line) = location.line {
                write!(self.out, " line=\"{line}\"")?;
            }
            self.out.write_str("/>\n")?;
        }

        self.element(2, "source", &message.source)?;
        let optional = [
            ("oldsource", &message.old_source),
            ("comment", &message.comment),
            ("oldcomment", &message.old_comment),
            ("extracomment", &message.extra_comment),
            ("translatorcomment", &message.translator_comment),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                self.element(2, name, value)?;
            }
        }

        self.translation(&message.translation)?;

        for (key, value) in &message.extras {
            self.element(2, &format!("extra-{key}"), value)?;
        }

        self.indent(1)?;
        self.out.write_str("</message>\n")
    }

    /// Writes `<translation>` with its text, plural forms or length variants.
    fn translation(&mut self, translation: &Translation) -> fmt::Result {
        self.indent(2)?;
        self.out.write_str("<translation")?;
        if let Some(kind) = translation.status.type_attribute() {
            write!(self.out, " type=\"{kind}\"")?;
        }

        match &translation.text {
            TranslationText::Plural(forms) if !forms.is_empty() => {
                self.out.write_str(">\n")?;
                for form in forms {
                    self.indent(3)?;
                    self.out.write_str("<numerusform")?;
                    self.variants(3, form)?;
                    self.out.write_str("</numerusform>\n")?;
                }
                self.indent(2)?;
            }
            // No forms at all is written like an empty single translation.
            text if text.first().is_empty() && self.style.self_closing_empty => {
                return self.out.write_str("/>\n");
            }
            text => self.variants(2, text.first())?,
        }

        self.out.write_str("</translation>\n")
    }

    /// Closes an open `<translation` or `<numerusform` tag and writes its
    /// text, one `<lengthvariant>` per variant when it has several.
    fn variants(&mut self, depth: usize, text: &str) -> fmt::Result {
        if !text.contains(LENGTH_VARIANT_SEPARATOR) {
            return write!(self.out, ">{}", escape_text(text, self.style.quotes));
        }

        self.out.write_str(" variants=\"yes\">\n")?;
        for variant in text.split(LENGTH_VARIANT_SEPARATOR) {
            self.indent(depth + 1)?;
            let variant = escape_text(variant, self.style.quotes);
            writeln!(self.out, "<lengthvariant>{variant}</lengthvariant>")?;
        }
        self.indent(depth)
    }

    /// Writes `<name>text</name>` on its own line.
    fn element(&mut self, depth: usize, name: &str, text: &str) -> fmt::Result {
        self.indent(depth)?;
        writeln!(self.out, "<{name}>{}</{name}>", escape_text(text, self.style.quotes))
    }
}
