//! In-memory model of a Qt Linguist translation catalog.
//!
//! A [`Catalog`] is an ordered list of [`Context`]s, each an ordered list of
//! [`Message`]s. Order is significant: it is what keeps serialized output
//! byte-stable across load/save cycles.

/// Messages, translations and their status.
mod message;

pub use message::{
    LENGTH_VARIANT_SEPARATOR,
    Message,
    Translation,
    TranslationStatus,
    TranslationText,
    primary_variant,
};

use crate::format::DocumentStyle;

/// Format version written when a catalog has none of its own.
pub const DEFAULT_VERSION: &str = "2.1";

/// A whole `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Value of the `version` attribute on the `TS` root.
    pub version: String,
    /// Target language (`language` attribute), e.g. `uk`.
    pub language: Option<String>,
    /// Source language (`sourcelanguage` attribute), e.g. `en`.
    pub source_language: Option<String>,
    /// Catalogs this one builds on (`<dependencies>`, format 2.1).
    pub dependencies: Vec<String>,
    /// Contexts in document order.
    pub contexts: Vec<Context>,
    /// Layout the document was read with; saving reuses it.
    pub style: DocumentStyle,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            language: None,
            source_language: None,
            dependencies: Vec::new(),
            contexts: Vec::new(),
            style: DocumentStyle::default(),
        }
    }
}

impl Catalog {
    /// An empty catalog with the given languages.
    #[must_use]
    pub fn new(language: Option<&str>, source_language: Option<&str>) -> Self {
        Self {
            language: language.map(str::to_string),
            source_language: source_language.map(str::to_string),
            ..Self::default()
        }
    }

    /// Finds a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// Finds a context by name, appending an empty one if it does not exist.
    // The index comes from `position` or from the push just above.
    #[allow(clippy::indexing_slicing)]
    pub fn context_mut_or_insert(&mut self, name: &str) -> &mut Context {
        let index = self.contexts.iter().position(|context| context.name == name).unwrap_or_else(|| {
            self.contexts.push(Context::new(name));
            self.contexts.len() - 1
        });
        &mut self.contexts[index]
    }

    /// Iterates over every message together with its context.
    pub fn messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .iter()
            .flat_map(|context| context.messages.iter().map(move |message| (context, message)))
    }

    /// Total number of messages, obsolete ones included.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }
}

/// A named group of messages, usually one dialog, command or object class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    /// Unique name within the catalog, e.g. `App::Property`.
    pub name: String,
    /// Context-level comment.
    pub comment: Option<String>,
    /// Messages in document order.
    pub messages: Vec<Message>,
}

impl Context {
    /// An empty context.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), comment: None, messages: Vec::new() }
    }

    /// Builder-style helper used by tests and by merge.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Messages that are still extracted from the host application.
    pub fn active_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|message| !message.translation.status.is_obsolete())
    }
}
