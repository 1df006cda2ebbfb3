//! Errors reported by the reader.

use thiserror::Error;

/// What went wrong while reading a `.ts` document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The XML itself is malformed.
    #[error("malformed XML: {0}")]
    Xml(String),
    /// The root element is not `<TS>`.
    #[error("root element must be <TS>, found <{0}>")]
    NotATsDocument(String),
    /// An element the format does not allow at this place.
    #[error("unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement {
        /// Offending element.
        element: String,
        /// Element it appeared in.
        parent: String,
    },
    /// A required child element is absent.
    #[error("<{parent}> is missing its <{element}> element")]
    MissingElement {
        /// Required element.
        element: String,
        /// Element that lacks it.
        parent: String,
    },
    /// A child element that may appear once appears again.
    #[error("<{parent}> has more than one <{element}> element")]
    DuplicateElement {
        /// Repeated element.
        element: String,
        /// Element holding the repeats.
        parent: String,
    },
    /// A known attribute with a value outside its domain.
    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        /// Element carrying the attribute.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Rejected value.
        value: String,
    },
    /// A required attribute is absent.
    #[error("<{element}> is missing its '{attribute}' attribute")]
    MissingAttribute {
        /// Element lacking the attribute.
        element: String,
        /// Attribute name.
        attribute: String,
    },
    /// An attribute the format does not define for this element.
    #[error("unknown attribute '{attribute}' on <{element}>")]
    UnknownAttribute {
        /// Element carrying the attribute.
        element: String,
        /// Attribute name.
        attribute: String,
    },
    /// Non-whitespace text where only elements may appear.
    #[error("unexpected text inside <{0}>")]
    UnexpectedText(String),
    /// Input ended inside an element.
    #[error("document ended before </{0}>")]
    UnexpectedEof(String),
    /// No root element at all.
    #[error("document has no <TS> element")]
    Empty,
}

/// A malformed resource, with enough position to find the offending entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {kind}", describe_position(.line, .context, .message))]
pub struct ParseError {
    /// 1-based line in the input.
    pub line: usize,
    /// Name of the enclosing context, once its `<name>` has been read.
    pub context: Option<String>,
    /// 1-based index of the enclosing message within its context.
    pub message: Option<usize>,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// Renders the position part of a [`ParseError`] message.
// thiserror hands fields over by reference.
#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn describe_position(line: &usize, context: &Option<String>, message: &Option<usize>) -> String {
    match (context, message) {
        (Some(context), Some(message)) => {
            format!("line {line} (context '{context}', message #{message})")
        }
        (Some(context), None) => format!("line {line} (context '{context}')"),
        (None, Some(message)) => format!("line {line} (message #{message})"),
        (None, None) => format!("line {line}"),
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_display_names_context_and_message() {
        let error = ParseError {
            line: 42,
            context: Some("Arch_Wall".to_string()),
            message: Some(3),
            kind: ParseErrorKind::MissingElement {
                element: "source".to_string(),
                parent: "message".to_string(),
            },
        };

        expect_that!(
            error.to_string(),
            eq("line 42 (context 'Arch_Wall', message #3): <message> is missing its <source> element")
        );
    }

    #[googletest::test]
    fn test_display_without_context() {
        let error = ParseError {
            line: 1,
            context: None,
            message: None,
            kind: ParseErrorKind::NotATsDocument("html".to_string()),
        };

        expect_that!(error.to_string(), eq("line 1: root element must be <TS>, found <html>"));
    }
}
