//! Message and translation types.

use crate::types::Location;

/// Separates length variants inside a translation, longest first.
pub const LENGTH_VARIANT_SEPARATOR: char = '\u{9c}';

/// The first (longest) length variant of `text`, or `text` itself.
#[must_use]
pub fn primary_variant(text: &str) -> &str {
    text.split_once(LENGTH_VARIANT_SEPARATOR).map_or(text, |(first, _)| first)
}

/// One translatable unit within a context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Optional message id (`id` attribute).
    pub id: Option<String>,
    /// Plural message (`numerus="yes"`).
    pub numerus: bool,
    /// Where the host application uses the message.
    pub locations: Vec<Location>,
    /// Source text; the lookup key together with `comment`.
    pub source: String,
    /// Previous source text, left by a merge when the text changed.
    pub old_source: Option<String>,
    /// Disambiguation comment; part of the lookup key.
    pub comment: Option<String>,
    /// Previous disambiguation comment.
    pub old_comment: Option<String>,
    /// Note from the developer to the translator.
    pub extra_comment: Option<String>,
    /// Note kept by translators.
    pub translator_comment: Option<String>,
    /// Status and translated text.
    pub translation: Translation,
    /// `extra-*` elements, in document order, without the `extra-` prefix.
    pub extras: Vec<(String, String)>,
}

impl Message {
    /// A new, untranslated message.
    #[must_use]
    pub fn unfinished(source: impl Into<String>) -> Self {
        Self { source: source.into(), ..Self::default() }
    }

    /// A message with a reviewed translation.
    #[must_use]
    pub fn finished(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation::finished(translation),
            ..Self::default()
        }
    }

    /// A message no longer extracted, keeping its translation.
    #[must_use]
    pub fn obsolete(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation {
                status: TranslationStatus::Obsolete,
                text: TranslationText::Single(translation.into()),
            },
            ..Self::default()
        }
    }

    /// Appends a location at an absolute line.
    #[must_use]
    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location::new(filename, line));
        self
    }

    /// Sets the disambiguation comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// `(source, comment)` pair identifying the message within its context.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.source, self.comment.as_deref().unwrap_or_default())
    }

    /// First location, used when reporting on a message.
    #[must_use]
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations.first()
    }
}

/// Translation status, i.e. the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationStatus {
    /// No `type` attribute: reviewed and usable.
    Finished,
    /// `type="unfinished"`: not yet usable.
    #[default]
    Unfinished,
    /// No longer extracted; kept for reference.
    Obsolete,
    /// Qt 5 spelling of [`TranslationStatus::Obsolete`].
    Vanished,
}

impl TranslationStatus {
    /// Value of the `type` attribute, `None` for finished translations.
    #[must_use]
    pub const fn type_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Parses a `type` attribute; `None` for an unknown value.
    #[must_use]
    pub fn from_type_attribute(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete") => Some(Self::Obsolete),
            Some("vanished") => Some(Self::Vanished),
            Some(_) => None,
        }
    }

    /// Obsolete or vanished.
    #[must_use]
    pub const fn is_obsolete(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationText {
    /// Text of a non-plural message. Length variants are joined with
    /// [`LENGTH_VARIANT_SEPARATOR`].
    Single(String),
    /// One entry per plural form of the target language.
    Plural(Vec<String>),
}

impl Default for TranslationText {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl TranslationText {
    /// True when there is no translated text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Plural(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// The single text, or the first plural form.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(text) => text,
            Self::Plural(forms) => forms.first().map_or("", String::as_str),
        }
    }

    /// Every non-plural text or plural form.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        let forms: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Plural(forms) => forms,
        };
        forms.iter().map(String::as_str)
    }
}

/// Status plus text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Translation {
    /// The `type` attribute.
    pub status: TranslationStatus,
    /// Translated text or plural forms.
    pub text: TranslationText,
}

impl Translation {
    /// A finished, non-plural translation.
    #[must_use]
    pub fn finished(text: impl Into<String>) -> Self {
        Self { status: TranslationStatus::Finished, text: TranslationText::Single(text.into()) }
    }

    /// Finished and carrying text: the only state that lookup treats as a
    /// validated translation.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status == TranslationStatus::Finished && !self.text.is_empty()
    }
}
