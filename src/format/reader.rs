//! `.ts` document reader.
//!
//! Walks the `quick-xml` event stream with a small recursive-descent parser.
//! Text inside `<source>`, `<translation>` and friends is kept as written,
//! after XML end-of-line handling and entity decoding; whitespace between
//! structural elements is ignored. The layout conventions of the document
//! are recorded in its [`DocumentStyle`]. Anything the format does not allow
//! is reported as a [`ParseError`] pointing at the enclosing context and
//! message.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::error::{
    ParseError,
    ParseErrorKind,
};
use super::escape::normalize_newlines;
use super::style::{
    DocumentStyle,
    Newline,
};
use crate::catalog::{
    Catalog,
    Context,
    DEFAULT_VERSION,
    LENGTH_VARIANT_SEPARATOR,
    Message,
    Translation,
    TranslationStatus,
    TranslationText,
};
use crate::types::Location;

/// Parses a whole `.ts` document.
///
/// # Errors
/// Returns [`ParseError`] when the XML is malformed or does not follow the
/// `TS` / `context` / `message` structure.
pub fn parse_catalog(input: &str) -> Result<Catalog, ParseError> {
    let (input, byte_order_mark) =
        input.strip_prefix('\u{feff}').map_or((input, false), |rest| (rest, true));
    TsParser::new(input, byte_order_mark).parse()
}

/// An element start (or self-closing element) handed to a structural loop.
struct Child<'i> {
    /// The start tag.
    start: BytesStart<'i>,
    /// Written as `<name/>`.
    empty: bool,
}

impl Child<'_> {
    /// Element name, for diagnostics.
    fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }
}

/// Which indentation the reader still has to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndentScan {
    /// Waiting for the first `<context>`.
    Context,
    /// Waiting for the first child of the first context.
    Step,
    /// Both measured, or not measurable.
    Done,
}

/// Parser state over one document.
struct TsParser<'i> {
    /// Document text without its byte order mark.
    input: &'i str,
    /// Event source over `input`.
    reader: Reader<&'i [u8]>,
    /// Name of the context being read, for diagnostics.
    context: Option<String>,
    /// 1-based index of the message being read, for diagnostics.
    message: Option<usize>,
    /// Layout seen so far.
    style: DocumentStyle,
    /// Progress of indentation measurement.
    indent: IndentScan,
    /// Indentation in front of the child element returned last, when it
    /// started a line and indentation is still being measured.
    gap: Option<String>,
    /// An empty `<translation>` has fixed `style.self_closing_empty`.
    empty_translation_seen: bool,
}

impl<'i> TsParser<'i> {
    /// Starts a parser at the beginning of `input`.
    fn new(input: &'i str, byte_order_mark: bool) -> Self {
        let newline = if input.split_once('\n').is_some_and(|(line, _)| line.ends_with('\r')) {
            Newline::CrLf
        } else {
            Newline::Lf
        };
        Self {
            input,
            reader: Reader::from_str(input),
            context: None,
            message: None,
            style: DocumentStyle { byte_order_mark, newline, ..DocumentStyle::default() },
            indent: IndentScan::Context,
            gap: None,
            empty_translation_seen: false,
        }
    }

    /// Reads the whole document.
    fn parse(mut self) -> Result<Catalog, ParseError> {
        let root = loop {
            match self.next_event()? {
                Event::Start(start) => break Child { start, empty: false },
                Event::Empty(start) => break Child { start, empty: true },
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.error(ParseErrorKind::UnexpectedText("document".to_string())));
                }
                Event::Eof => return Err(self.error(ParseErrorKind::Empty)),
                _ => {}
            }
        };

        if root.start.name().as_ref() != b"TS" {
            return Err(self.error(ParseErrorKind::NotATsDocument(root.name())));
        }
        self.style.prolog = self.prolog();

        let mut catalog = self.read_root_attributes(&root)?;
        if !root.empty {
            while let Some(child) = self.next_child("TS")? {
                match child.start.name().as_ref() {
                    b"context" => {
                        self.reject_attributes(&child)?;
                        self.measure_context_indent();
                        let context = self.read_context(&child)?;
                        catalog.contexts.push(context);
                        self.context = None;
                    }
                    b"dependencies" => {
                        self.reject_attributes(&child)?;
                        let dependencies = self.read_dependencies(&child)?;
                        catalog.dependencies.extend(dependencies);
                    }
                    _ => return Err(self.unexpected(&child, "TS")),
                }
            }
        }

        self.expect_document_end()?;
        catalog.style = self.style;
        tracing::debug!(
            contexts = catalog.contexts.len(),
            messages = catalog.message_count(),
            newline = ?catalog.style.newline,
            "Parsed translation catalog"
        );
        Ok(catalog)
    }

    /// Everything in front of the root start tag that was just read.
    fn prolog(&self) -> String {
        let consumed = self.consumed();
        let root_offset = consumed.rfind("<TS").unwrap_or_default();
        normalize_newlines(consumed.get(..root_offset).unwrap_or_default()).into_owned()
    }

    /// Takes the indentation of the first context.
    fn measure_context_indent(&mut self) {
        if self.indent != IndentScan::Context {
            return;
        }
        let Some(indent) = self.gap.take() else {
            self.indent = IndentScan::Done;
            return;
        };
        self.style.context_indent = indent;
        self.indent = IndentScan::Step;
    }

    /// Takes the indentation step from the first child of the first context.
    fn measure_indent_step(&mut self) {
        if self.indent != IndentScan::Step {
            return;
        }
        self.indent = IndentScan::Done;
        let step = self.gap.take().and_then(|gap| {
            gap.strip_prefix(self.style.context_indent.as_str()).map(str::to_string)
        });
        if let Some(step) = step {
            self.style.indent_step = step;
        }
    }

    /// Reads `version`, `language` and `sourcelanguage` off the root.
    fn read_root_attributes(&self, root: &Child<'i>) -> Result<Catalog, ParseError> {
        let mut catalog = Catalog::default();
        let mut version = None;
        for (key, value) in self.attributes(root)? {
            match key.as_str() {
                "version" => version = Some(value),
                "language" => catalog.language = Some(value),
                "sourcelanguage" => catalog.source_language = Some(value),
                _ => return Err(self.unknown_attribute("TS", key)),
            }
        }
        catalog.version = version.unwrap_or_else(|| DEFAULT_VERSION.to_string());
        Ok(catalog)
    }

    /// Reads `<dependencies>`, a list of `<dependency catalog="..."/>`.
    fn read_dependencies(&mut self, element: &Child<'i>) -> Result<Vec<String>, ParseError> {
        let mut catalogs = Vec::new();
        if element.empty {
            return Ok(catalogs);
        }

        while let Some(child) = self.next_child("dependencies")? {
            if child.start.name().as_ref() != b"dependency" {
                return Err(self.unexpected(&child, "dependencies"));
            }
            let mut name = None;
            for (key, value) in self.attributes(&child)? {
                match key.as_str() {
                    "catalog" => name = Some(value),
                    _ => return Err(self.unknown_attribute("dependency", key)),
                }
            }
            let Some(name) = name else {
                return Err(self.error(ParseErrorKind::MissingAttribute {
                    element: "dependency".to_string(),
                    attribute: "catalog".to_string(),
                }));
            };
            if !child.empty
                && let Some(inner) = self.next_child("dependency")?
            {
                return Err(self.unexpected(&inner, "dependency"));
            }
            catalogs.push(name);
        }
        Ok(catalogs)
    }

    /// Reads one `<context>`; its `<name>` must precede its messages.
    fn read_context(&mut self, element: &Child<'i>) -> Result<Context, ParseError> {
        let mut name = None;
        let mut comment = None;
        let mut messages = Vec::new();

        if !element.empty {
            while let Some(child) = self.next_child("context")? {
                self.measure_indent_step();
                match child.start.name().as_ref() {
                    b"name" => {
                        let text = self.read_plain(&child)?;
                        if name.is_some() {
                            return Err(self.duplicate("name", "context"));
                        }
                        self.context = Some(text.clone());
                        name = Some(text);
                    }
                    b"comment" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(&mut comment, text, "comment", "context")?;
                    }
                    b"message" => {
                        if name.is_none() {
                            return Err(self.missing("name", "context"));
                        }
                        self.message = Some(messages.len() + 1);
                        let message = self.read_message(&child)?;
                        messages.push(message);
                        self.message = None;
                    }
                    _ => return Err(self.unexpected(&child, "context")),
                }
            }
        }

        let name = name.ok_or_else(|| self.missing("name", "context"))?;
        Ok(Context { name, comment, messages })
    }

    /// Reads one `<message>` and its children.
    fn read_message(&mut self, element: &Child<'i>) -> Result<Message, ParseError> {
        let mut message = Message::default();
        for (key, value) in self.attributes(element)? {
            match key.as_str() {
                "id" => message.id = Some(value),
                "numerus" => message.numerus = self.flag("message", key, &value)?,
                _ => return Err(self.unknown_attribute("message", key)),
            }
        }

        let mut source = None;
        let mut translation = None;
        if !element.empty {
            while let Some(child) = self.next_child("message")? {
                match child.start.name().as_ref() {
                    b"location" => {
                        let location = self.read_location(&child)?;
                        message.locations.push(location);
                    }
                    b"source" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(&mut source, text, "source", "message")?;
                    }
                    b"oldsource" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(&mut message.old_source, text, "oldsource", "message")?;
                    }
                    b"comment" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(&mut message.comment, text, "comment", "message")?;
                    }
                    b"oldcomment" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(&mut message.old_comment, text, "oldcomment", "message")?;
                    }
                    b"extracomment" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(&mut message.extra_comment, text, "extracomment", "message")?;
                    }
                    b"translatorcomment" => {
                        let text = self.read_plain(&child)?;
                        self.set_once(
                            &mut message.translator_comment,
                            text,
                            "translatorcomment",
                            "message",
                        )?;
                    }
                    b"translation" => {
                        if translation.is_some() {
                            return Err(self.duplicate("translation", "message"));
                        }
                        translation = Some(self.read_translation(&child)?);
                    }
                    name if name.starts_with(b"extra-") => {
                        let key = String::from_utf8_lossy(name.strip_prefix(b"extra-").unwrap_or(name))
                            .into_owned();
                        let text = self.read_plain(&child)?;
                        message.extras.push((key, text));
                    }
                    _ => return Err(self.unexpected(&child, "message")),
                }
            }
        }

        message.source = source.ok_or_else(|| self.missing("source", "message"))?;
        message.translation = translation.ok_or_else(|| self.missing("translation", "message"))?;
        Ok(message)
    }

    /// Reads a `<location filename=".." line=".."/>`.
    fn read_location(&mut self, element: &Child<'i>) -> Result<Location, ParseError> {
        let mut location = Location::default();
        for (key, value) in self.attributes(element)? {
            match key.as_str() {
                "filename" => location.filename = Some(value),
                "line" => match value.parse() {
                    Ok(line) => location.line = Some(line),
                    Err(_) => return Err(self.invalid_attribute("location", key, value)),
                },
                _ => return Err(self.unknown_attribute("location", key)),
            }
        }

        if !element.empty
            && let Some(child) = self.next_child("location")?
        {
            return Err(self.unexpected(&child, "location"));
        }
        Ok(location)
    }

    /// Reads a `<translation>`: plain text, `<numerusform>` children or
    /// `<lengthvariant>` children.
    fn read_translation(&mut self, element: &Child<'i>) -> Result<Translation, ParseError> {
        let mut type_attribute = None;
        for (key, value) in self.attributes(element)? {
            match key.as_str() {
                "type" => type_attribute = Some(value),
                "variants" => {
                    self.flag("translation", key, &value)?;
                }
                _ => return Err(self.unknown_attribute("translation", key)),
            }
        }
        let Some(status) = TranslationStatus::from_type_attribute(type_attribute.as_deref()) else {
            return Err(self.invalid_attribute(
                "translation",
                "type".to_string(),
                type_attribute.unwrap_or_default(),
            ));
        };

        if element.empty {
            self.note_empty_translation(true);
            return Ok(Translation { status, text: TranslationText::default() });
        }

        let mut text = String::new();
        let mut forms = Vec::new();
        let mut variants = Vec::new();
        loop {
            let child = match self.next_event()? {
                Event::Text(raw) => {
                    let decoded = self.element_text(&raw)?;
                    text.push_str(&decoded);
                    continue;
                }
                Event::CData(raw) => {
                    let decoded = self.cdata(&raw)?;
                    text.push_str(&decoded);
                    continue;
                }
                Event::Start(start) => Child { start, empty: false },
                Event::Empty(start) => Child { start, empty: true },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof("translation".to_string())));
                }
                _ => continue,
            };
            match child.start.name().as_ref() {
                b"numerusform" if variants.is_empty() => forms.push(self.read_numerus_form(&child)?),
                b"lengthvariant" if forms.is_empty() => variants.push(self.read_plain(&child)?),
                _ => return Err(self.unexpected(&child, "translation")),
            }
        }

        let has_text = !text.trim().is_empty();
        let text = if !forms.is_empty() && !has_text {
            TranslationText::Plural(forms)
        } else if !variants.is_empty() && !has_text {
            TranslationText::Single(join_variants(&variants))
        } else if forms.is_empty() && variants.is_empty() {
            if text.is_empty() {
                self.note_empty_translation(false);
            }
            TranslationText::Single(text)
        } else {
            return Err(self.error(ParseErrorKind::UnexpectedText("translation".to_string())));
        };
        Ok(Translation { status, text })
    }

    /// Reads a `<numerusform>`, joining any `<lengthvariant>` children.
    fn read_numerus_form(&mut self, element: &Child<'i>) -> Result<String, ParseError> {
        for (key, value) in self.attributes(element)? {
            if key != "variants" {
                return Err(self.unknown_attribute("numerusform", key));
            }
            self.flag("numerusform", key, &value)?;
        }
        if element.empty {
            return Ok(String::new());
        }

        let mut text = String::new();
        let mut variants = Vec::new();
        loop {
            match self.next_event()? {
                Event::Text(raw) => {
                    let decoded = self.element_text(&raw)?;
                    text.push_str(&decoded);
                }
                Event::CData(raw) => {
                    let decoded = self.cdata(&raw)?;
                    text.push_str(&decoded);
                }
                Event::Start(start) if start.name().as_ref() == b"lengthvariant" => {
                    variants.push(self.read_plain(&Child { start, empty: false })?);
                }
                Event::Empty(start) if start.name().as_ref() == b"lengthvariant" => {
                    variants.push(self.read_plain(&Child { start, empty: true })?);
                }
                Event::Start(start) | Event::Empty(start) => {
                    return Err(self.unexpected(&Child { start, empty: true }, "numerusform"));
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof("numerusform".to_string())));
                }
                _ => {}
            }
        }

        if variants.is_empty() {
            Ok(text)
        } else if text.trim().is_empty() {
            Ok(join_variants(&variants))
        } else {
            Err(self.error(ParseErrorKind::UnexpectedText("numerusform".to_string())))
        }
    }

    /// Reads an attribute-less element holding only text.
    fn read_plain(&mut self, element: &Child<'i>) -> Result<String, ParseError> {
        self.reject_attributes(element)?;
        if element.empty {
            return Ok(String::new());
        }

        let name = element.name();
        let mut text = String::new();
        loop {
            match self.next_event()? {
                Event::Text(raw) => {
                    let decoded = self.element_text(&raw)?;
                    text.push_str(&decoded);
                }
                Event::CData(raw) => {
                    let decoded = self.cdata(&raw)?;
                    text.push_str(&decoded);
                }
                Event::End(_) => return Ok(text),
                Event::Start(start) | Event::Empty(start) => {
                    return Err(self.unexpected(&Child { start, empty: true }, &name));
                }
                Event::Eof => return Err(self.error(ParseErrorKind::UnexpectedEof(name))),
                _ => {}
            }
        }
    }

    /// Returns the next child element of a structural element, or `None` at
    /// its end tag. Whitespace between children is skipped.
    fn next_child(&mut self, parent: &str) -> Result<Option<Child<'i>>, ParseError> {
        self.gap = None;
        loop {
            match self.next_event()? {
                Event::Start(start) => return Ok(Some(Child { start, empty: false })),
                Event::Empty(start) => return Ok(Some(Child { start, empty: true })),
                Event::End(_) => return Ok(None),
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {
                    if self.indent != IndentScan::Done {
                        self.gap = line_indent(&text);
                    }
                }
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.error(ParseErrorKind::UnexpectedText(parent.to_string())));
                }
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof(parent.to_string())));
                }
                _ => {}
            }
        }
    }

    /// Accepts only whitespace and markup the format ignores after `</TS>`.
    fn expect_document_end(&mut self) -> Result<(), ParseError> {
        loop {
            match self.next_event()? {
                Event::Eof => return Ok(()),
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                Event::Start(start) | Event::Empty(start) => {
                    return Err(self.unexpected(&Child { start, empty: true }, "document"));
                }
                _ => {
                    return Err(self.error(ParseErrorKind::UnexpectedText("document".to_string())));
                }
            }
        }
    }

    /// Next event that matters to the format; declarations, doctype,
    /// processing instructions and comments are skipped.
    fn next_event(&mut self) -> Result<Event<'i>, ParseError> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Decl(_) | Event::DocType(_) | Event::PI(_) | Event::Comment(_)) => {}
                Ok(event) => return Ok(event),
                Err(e) => return Err(self.xml_error(&e)),
            }
        }
    }

    /// Decoded attributes in document order.
    fn attributes(&self, element: &Child<'i>) -> Result<Vec<(String, String)>, ParseError> {
        element
            .start
            .attributes()
            .map(|attribute| {
                let attribute = attribute.map_err(|e| self.xml_error(&e))?;
                let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                let raw = std::str::from_utf8(&attribute.value).map_err(|e| self.xml_error(&e))?;
                Ok((key, self.unescape(raw)?))
            })
            .collect()
    }

    /// Fails on the first attribute of an element that takes none.
    fn reject_attributes(&self, element: &Child<'i>) -> Result<(), ParseError> {
        self.attributes(element)?
            .into_iter()
            .next()
            .map_or(Ok(()), |(key, _)| Err(self.unknown_attribute(&element.name(), key)))
    }

    /// Parses a `yes`/`no` attribute.
    fn flag(&self, element: &str, key: String, value: &str) -> Result<bool, ParseError> {
        match value {
            "yes" => Ok(true),
            "no" => Ok(false),
            _ => Err(self.invalid_attribute(element, key, value.to_string())),
        }
    }

    /// Decodes element text, noting how the document spells quotes.
    fn element_text(&mut self, raw: &[u8]) -> Result<String, ParseError> {
        let raw = std::str::from_utf8(raw).map_err(|e| self.xml_error(&e))?;
        self.style.quotes.quote |= raw.contains("&quot;");
        self.style.quotes.apostrophe |= raw.contains("&apos;");
        self.unescape(raw)
    }

    /// End-of-line handling, then entity decoding.
    fn unescape(&self, raw: &str) -> Result<String, ParseError> {
        quick_xml::escape::unescape(&normalize_newlines(raw))
            .map(Cow::into_owned)
            .map_err(|e| self.xml_error(&e))
    }

    /// CDATA content with end-of-line handling.
    fn cdata(&self, raw: &[u8]) -> Result<String, ParseError> {
        std::str::from_utf8(raw)
            .map(|text| normalize_newlines(text).into_owned())
            .map_err(|e| self.xml_error(&e))
    }

    /// Records the spelling of the first empty translation.
    const fn note_empty_translation(&mut self, self_closing: bool) {
        if !self.empty_translation_seen {
            self.empty_translation_seen = true;
            self.style.self_closing_empty = self_closing;
        }
    }

    /// Fills a child slot that may appear at most once.
    fn set_once(
        &self,
        slot: &mut Option<String>,
        value: String,
        element: &str,
        parent: &str,
    ) -> Result<(), ParseError> {
        if slot.is_some() {
            return Err(self.duplicate(element, parent));
        }
        *slot = Some(value);
        Ok(())
    }

    /// Input read so far.
    fn consumed(&self) -> &'i str {
        let offset = usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX);
        self.input.get(..offset).unwrap_or(self.input)
    }

    /// 1-based line of the reader position.
    fn current_line(&self) -> usize {
        self.consumed().bytes().filter(|b| *b == b'\n').count() + 1
    }

    /// A [`ParseError`] at the current position.
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.current_line(),
            context: self.context.clone(),
            message: self.message,
            kind,
        }
    }

    /// Wraps an error from `quick-xml` or UTF-8 decoding.
    fn xml_error(&self, error: &dyn std::fmt::Display) -> ParseError {
        self.error(ParseErrorKind::Xml(error.to_string()))
    }

    /// `element` may not appear inside `parent`.
    fn unexpected(&self, element: &Child<'_>, parent: &str) -> ParseError {
        self.error(ParseErrorKind::UnexpectedElement {
            element: element.name(),
            parent: parent.to_string(),
        })
    }

    /// `parent` lacks its required `element`.
    fn missing(&self, element: &str, parent: &str) -> ParseError {
        self.error(ParseErrorKind::MissingElement {
            element: element.to_string(),
            parent: parent.to_string(),
        })
    }

    /// `element` appears twice inside `parent`.
    fn duplicate(&self, element: &str, parent: &str) -> ParseError {
        self.error(ParseErrorKind::DuplicateElement {
            element: element.to_string(),
            parent: parent.to_string(),
        })
    }

    /// `attribute` is not defined for `element`.
    fn unknown_attribute(&self, element: &str, attribute: String) -> ParseError {
        self.error(ParseErrorKind::UnknownAttribute { element: element.to_string(), attribute })
    }

    /// `value` is outside the domain of `attribute`.
    fn invalid_attribute(&self, element: &str, attribute: String, value: String) -> ParseError {
        self.error(ParseErrorKind::InvalidAttribute {
            element: element.to_string(),
            attribute,
            value,
        })
    }
}

/// Indentation after the last line break of a whitespace run.
fn line_indent(whitespace: &[u8]) -> Option<String> {
    let start = whitespace.iter().rposition(|b| *b == b'\n')? + 1;
    whitespace.get(start..).map(|indent| String::from_utf8_lossy(indent).into_owned())
}

/// Joins `<lengthvariant>` texts into one string.
fn join_variants(variants: &[String]) -> String {
    variants.join(&*LENGTH_VARIANT_SEPARATOR.encode_utf8(&mut [0; 4]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::format::QuoteEscapes;
    use crate::types::LineNumber;

    fn wrap(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.0\" language=\"uk\" sourcelanguage=\"en\">\n{body}</TS>\n"
        )
    }

    #[googletest::test]
    fn test_parse_header_and_message() {
        let input = wrap(
            r#"  <context>
    <name>App::Property</name>
    <message>
      <location filename="../../ArchAxis.py" line="172"/>
      <source>The intervals between axes</source>
      <translation>Інтервали між осями</translation>
    </message>
  </context>
"#,
        );

        let catalog = parse_catalog(&input).unwrap();

        expect_that!(catalog.version, eq("2.0"));
        expect_that!(catalog.language, some(eq("uk")));
        expect_that!(catalog.source_language, some(eq("en")));
        assert_that!(catalog.contexts, len(eq(1)));
        let message = &catalog.contexts[0].messages[0];
        expect_that!(catalog.contexts[0].name, eq("App::Property"));
        expect_that!(message.source, eq("The intervals between axes"));
        expect_that!(message.translation, eq(&Translation::finished("Інтервали між осями")));
        expect_that!(
            message.locations,
            elements_are![eq(&Location::new("../../ArchAxis.py", 172))]
        );
    }

    #[googletest::test]
    fn test_parse_preserves_text_exactly() {
        let input = wrap(
            r#"  <context>
    <name>Arch</name>
    <message>
      <location filename="../../ArchBuilding.py" line="237"/>
      <source>There is no valid object in the selection.
Building creation aborted.
</source>
      <translation type="unfinished">  leading &amp; trailing -&gt; "quotes" об'єкт  </translation>
    </message>
  </context>
"#,
        );

        let catalog = parse_catalog(&input).unwrap();
        let message = &catalog.contexts[0].messages[0];

        expect_that!(
            message.source,
            eq("There is no valid object in the selection.\nBuilding creation aborted.\n")
        );
        expect_that!(message.translation.status, eq(TranslationStatus::Unfinished));
        expect_that!(
            message.translation.text.first(),
            eq("  leading & trailing -> \"quotes\" об'єкт  ")
        );
    }

    #[googletest::test]
    fn test_parse_full_message_shape() {
        let input = wrap(
            r#"  <context>
    <name>Arch_Pipe</name>
    <comment>pipes</comment>
    <message id="pipe.count" numerus="yes">
      <location filename="ArchPipe.py" line="+3"/>
      <location/>
      <source>%n pipe(s)</source>
      <oldsource>%n pipes</oldsource>
      <comment>status bar</comment>
      <oldcomment>toolbar</oldcomment>
      <extracomment>shown after creation</extracomment>
      <translatorcomment>check plural</translatorcomment>
      <translation type="unfinished">
        <numerusform>%n труба</numerusform>
        <numerusform>%n труби</numerusform>
        <numerusform></numerusform>
      </translation>
      <extra-po-flags>c-format</extra-po-flags>
    </message>
  </context>
"#,
        );

        let catalog = parse_catalog(&input).unwrap();
        let context = &catalog.contexts[0];
        let message = &context.messages[0];

        expect_that!(context.comment, some(eq("pipes")));
        expect_that!(message.id, some(eq("pipe.count")));
        expect_that!(message.numerus, eq(true));
        expect_that!(message.locations[0].line, some(eq(LineNumber::Relative(3))));
        expect_that!(message.locations[1], eq(&Location::default()));
        expect_that!(message.old_source, some(eq("%n pipes")));
        expect_that!(message.comment, some(eq("status bar")));
        expect_that!(message.old_comment, some(eq("toolbar")));
        expect_that!(message.extra_comment, some(eq("shown after creation")));
        expect_that!(message.translator_comment, some(eq("check plural")));
        expect_that!(
            message.translation.text,
            eq(&TranslationText::Plural(vec![
                "%n труба".to_string(),
                "%n труби".to_string(),
                String::new(),
            ]))
        );
        expect_that!(
            message.extras,
            elements_are![eq(&("po-flags".to_string(), "c-format".to_string()))]
        );
    }

    #[googletest::test]
    fn test_parse_empty_translation_forms() {
        let input = wrap(
            r#"  <context>
    <name>Draft</name>
    <message>
      <source>Snapping</source>
      <translation type="unfinished"/>
    </message>
    <message>
      <source>Utilities</source>
      <translation type="vanished"></translation>
    </message>
  </context>
"#,
        );

        let catalog = parse_catalog(&input).unwrap();
        let messages = &catalog.contexts[0].messages;

        expect_that!(messages[0].translation.text, eq(&TranslationText::default()));
        expect_that!(messages[1].translation.status, eq(TranslationStatus::Vanished));
    }

    #[rstest]
    #[case::missing_source(
        "  <context>\n    <name>Arch_Wall</name>\n    <message>\n      <translation>x</translation>\n    </message>\n  </context>\n",
        Some("Arch_Wall"),
        Some(1),
        "missing its <source>"
    )]
    #[case::missing_translation(
        "  <context>\n    <name>Arch_Wall</name>\n    <message>\n      <source>a</source>\n      <translation>b</translation>\n    </message>\n    <message>\n      <source>c</source>\n    </message>\n  </context>\n",
        Some("Arch_Wall"),
        Some(2),
        "missing its <translation>"
    )]
    #[case::bad_type(
        "  <context>\n    <name>Arch_Roof</name>\n    <message>\n      <source>a</source>\n      <translation type=\"done\">b</translation>\n    </message>\n  </context>\n",
        Some("Arch_Roof"),
        Some(1),
        "invalid value 'done'"
    )]
    #[case::bad_line(
        "  <context>\n    <name>Arch_Roof</name>\n    <message>\n      <location filename=\"a.py\" line=\"ten\"/>\n      <source>a</source>\n      <translation>b</translation>\n    </message>\n  </context>\n",
        Some("Arch_Roof"),
        Some(1),
        "attribute 'line'"
    )]
    #[case::duplicate_source(
        "  <context>\n    <name>Arch_Roof</name>\n    <message>\n      <source>a</source>\n      <source>b</source>\n      <translation>b</translation>\n    </message>\n  </context>\n",
        Some("Arch_Roof"),
        Some(1),
        "more than one <source>"
    )]
    #[case::unknown_element(
        "  <context>\n    <name>Arch_Roof</name>\n    <bogus/>\n  </context>\n",
        Some("Arch_Roof"),
        None,
        "unexpected element <bogus>"
    )]
    #[case::missing_name(
        "  <context>\n    <message>\n      <source>a</source>\n      <translation>b</translation>\n    </message>\n  </context>\n",
        None,
        None,
        "missing its <name>"
    )]
    #[case::stray_text(
        "  <context>\n    <name>Arch_Roof</name>\n    oops\n  </context>\n",
        Some("Arch_Roof"),
        None,
        "unexpected text"
    )]
    fn test_parse_errors_identify_entry(
        #[case] body: &str,
        #[case] context: Option<&str>,
        #[case] message: Option<usize>,
        #[case] fragment: &str,
    ) {
        let error = parse_catalog(&wrap(body)).unwrap_err();

        assert_that!(error.context.as_deref(), eq(context));
        assert_that!(error.message, eq(message));
        assert_that!(error.to_string(), contains_substring(fragment));
    }

    #[googletest::test]
    fn test_parse_error_reports_line() {
        let body = "  <context>\n    <name>Arch_Wall</name>\n    <message>\n      <source>a</source>\n      <translation type=\"done\">b</translation>\n    </message>\n  </context>\n";

        let error = parse_catalog(&wrap(body)).unwrap_err();

        // Header takes three lines; the translation is on line 8.
        expect_that!(error.line, eq(8));
    }

    #[rstest]
    #[case::wrong_root("<html></html>", "root element must be <TS>")]
    #[case::empty_document("<?xml version=\"1.0\"?>\n", "no <TS> element")]
    #[case::mismatched_tags("<TS><context><name>a</context></TS>", "malformed XML")]
    #[case::unclosed("<TS version=\"2.0\"><context>", "")]
    #[case::trailing_element("<TS version=\"2.0\"></TS><TS/>", "unexpected element <TS>")]
    #[case::unknown_root_attribute("<TS flavour=\"x\"></TS>", "unknown attribute 'flavour'")]
    fn test_parse_rejects_malformed_documents(#[case] input: &str, #[case] fragment: &str) {
        let result = parse_catalog(input);

        assert_that!(result, err(displays_as(contains_substring(fragment))));
    }

    #[googletest::test]
    fn test_parse_self_closing_root() {
        let catalog = parse_catalog("<TS version=\"2.1\" language=\"uk\"/>").unwrap();

        expect_that!(catalog.version, eq("2.1"));
        expect_that!(catalog.contexts, is_empty());
    }

    #[googletest::test]
    fn test_parse_defaults_missing_version() {
        let catalog = parse_catalog("\u{feff}<TS></TS>").unwrap();

        expect_that!(catalog.version, eq(DEFAULT_VERSION));
        expect_that!(catalog.language, none());
    }

    #[googletest::test]
    fn test_parse_normalizes_windows_line_ends() {
        let input = wrap(
            "  <context>\n    <name>Arch</name>\n    <message>\n      <source>Line one\nline two</source>\n      <translation>Рядок&#xd;\nперший</translation>\n    </message>\n  </context>\n",
        )
        .replace('\n', "\r\n");

        let catalog = parse_catalog(&input).unwrap();
        let message = &catalog.contexts[0].messages[0];

        expect_that!(message.source, eq("Line one\nline two"));
        expect_that!(message.translation.text.first(), eq("Рядок\r\nперший"));
        expect_that!(catalog.style.newline, eq(Newline::CrLf));
        expect_that!(catalog.style.prolog, eq(crate::format::DEFAULT_PROLOG));
    }

    #[googletest::test]
    fn test_parse_normalizes_lone_carriage_returns_in_attributes() {
        let input = wrap(
            "  <context>\n    <name>Arch</name>\n    <message id=\"a\rb\">\n      <source>a\rb</source>\n      <translation>x</translation>\n    </message>\n  </context>\n",
        );

        let catalog = parse_catalog(&input).unwrap();
        let message = &catalog.contexts[0].messages[0];

        expect_that!(message.id, some(eq("a\nb")));
        expect_that!(message.source, eq("a\nb"));
        expect_that!(catalog.style.newline, eq(Newline::Lf));
    }

    #[googletest::test]
    fn test_parse_records_lupdate_layout() {
        let input = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.1\" language=\"uk\">\n<context>\n    <name>Arch_Wall</name>\n    <message>\n        <source>Don&apos;t use &quot;Width&quot;</source>\n        <translation type=\"unfinished\"/>\n    </message>\n</context>\n</TS>\n";

        let catalog = parse_catalog(input).unwrap();

        expect_that!(catalog.contexts[0].messages[0].source, eq(r#"Don't use "Width""#));
        expect_that!(catalog.style.context_indent, eq(""));
        expect_that!(catalog.style.indent_step, eq("    "));
        expect_that!(catalog.style.quotes, eq(QuoteEscapes::ALL));
        expect_that!(catalog.style.self_closing_empty, eq(true));
    }

    #[googletest::test]
    fn test_parse_records_crowdin_layout_as_default() {
        let input = wrap(
            r#"  <context>
    <name>Arch</name>
    <message>
      <source>the "Objects" column of object's</source>
      <translation type="unfinished"></translation>
    </message>
  </context>
"#,
        );

        let catalog = parse_catalog(&input).unwrap();

        expect_that!(catalog.style, eq(&DocumentStyle::default()));
    }

    #[googletest::test]
    fn test_parse_keeps_prolog_and_byte_order_mark() {
        let input = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- generated -->\n<TS version=\"2.1\"></TS>\n";

        let catalog = parse_catalog(input).unwrap();

        expect_that!(
            catalog.style.prolog,
            eq("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- generated -->\n")
        );
        expect_that!(catalog.style.byte_order_mark, eq(true));
    }

    #[googletest::test]
    fn test_parse_length_variants() {
        let input = wrap(
            r#"  <context>
    <name>Arch</name>
    <message>
      <source>Structure</source>
      <translation variants="yes">
        <lengthvariant>Конструкція</lengthvariant>
        <lengthvariant>Констр.</lengthvariant>
      </translation>
    </message>
    <message numerus="yes">
      <source>%n walls</source>
      <translation>
        <numerusform variants="yes">
          <lengthvariant>%n стіна</lengthvariant>
          <lengthvariant>%n ст.</lengthvariant>
        </numerusform>
        <numerusform>%n стіни</numerusform>
      </translation>
    </message>
  </context>
"#,
        );

        let catalog = parse_catalog(&input).unwrap();
        let messages = &catalog.contexts[0].messages;

        expect_that!(
            messages[0].translation.text,
            eq(&TranslationText::Single("Конструкція\u{9c}Констр.".to_string()))
        );
        expect_that!(
            messages[1].translation.text,
            eq(&TranslationText::Plural(vec![
                "%n стіна\u{9c}%n ст.".to_string(),
                "%n стіни".to_string(),
            ]))
        );
    }

    #[googletest::test]
    fn test_parse_dependencies() {
        let input = "<TS version=\"2.1\">\n<dependencies>\n<dependency catalog=\"qtbase\"/>\n<dependency catalog=\"qtmultimedia\"/>\n</dependencies>\n<context>\n    <name>Arch</name>\n</context>\n</TS>\n";

        let catalog = parse_catalog(input).unwrap();

        expect_that!(catalog.dependencies, elements_are![eq("qtbase"), eq("qtmultimedia")]);
        expect_that!(catalog.contexts, len(eq(1)));
    }

    #[rstest]
    #[case::dependency_without_catalog(
        "<TS><dependencies><dependency/></dependencies></TS>",
        "missing its 'catalog' attribute"
    )]
    #[case::bad_variants_flag(
        "<TS><context><name>a</name><message><source>a</source><translation variants=\"maybe\">b</translation></message></context></TS>",
        "invalid value 'maybe'"
    )]
    #[case::variants_mixed_with_forms(
        "<TS><context><name>a</name><message><source>a</source><translation><numerusform>x</numerusform><lengthvariant>y</lengthvariant></translation></message></context></TS>",
        "unexpected element <lengthvariant>"
    )]
    fn test_parse_rejects_malformed_extensions(#[case] input: &str, #[case] fragment: &str) {
        let result = parse_catalog(input);

        assert_that!(result, err(displays_as(contains_substring(fragment))));
    }
}
