//! Context-scoped lookup with fallback to the source text.

/// Plural rules and `%n` substitution.
mod plural;

use std::collections::HashMap;

pub use plural::{
    PluralRule,
    substitute_count,
};

use crate::catalog::{
    Catalog,
    Message,
    TranslationStatus,
    TranslationText,
    primary_variant,
};

/// Why a lookup fell back to the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LookupMiss {
    /// No context with this name.
    #[error("unknown context")]
    UnknownContext,
    /// The context has no message with this key.
    #[error("no message with this source text in the context")]
    UnknownMessage,
    /// `type="unfinished"`.
    #[error("translation is unfinished")]
    Unfinished,
    /// Obsolete or vanished.
    #[error("message is obsolete")]
    Obsolete,
    /// Finished, but without text for the requested form.
    #[error("translation is empty")]
    EmptyTranslation,
}

/// Whether the returned text is a validated translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
    /// A finished, non-empty translation.
    Translated,
    /// The source text, and why.
    Fallback(LookupMiss),
}

/// Result of [`Translator::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    /// Translation or source text.
    pub text: &'a str,
    /// Which of the two `text` is.
    pub outcome: LookupOutcome,
}

impl Lookup<'_> {
    /// `text` is a validated translation.
    #[must_use]
    pub const fn is_translated(&self) -> bool {
        matches!(self.outcome, LookupOutcome::Translated)
    }
}

/// Result of [`Translator::lookup_plural`], with `%n` already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralLookup {
    /// Translation or source text, `%n` substituted.
    pub text: String,
    /// Which of the two `text` is.
    pub outcome: LookupOutcome,
}

/// What the index holds for one message key.
#[derive(Debug, Clone)]
enum Entry {
    /// Finished text.
    Usable(TranslationText),
    /// Why there is none.
    Miss(LookupMiss),
}

impl Entry {
    /// Classifies a message's translation.
    fn from_message(message: &Message) -> Self {
        let translation = &message.translation;
        match translation.status {
            _ if translation.is_usable() => Self::Usable(translation.text.clone()),
            TranslationStatus::Unfinished => Self::Miss(LookupMiss::Unfinished),
            status if status.is_obsolete() => Self::Miss(LookupMiss::Obsolete),
            _ => Self::Miss(LookupMiss::EmptyTranslation),
        }
    }

    /// Preference among duplicates: usable text for a plain lookup beats
    /// usable plural forms only, which beat a miss.
    fn rank(&self) -> u8 {
        match self {
            Self::Usable(text) if !primary_variant(text.first()).is_empty() => 2,
            Self::Usable(_) => 1,
            Self::Miss(_) => 0,
        }
    }
}

/// One disambiguation of a source text.
#[derive(Debug, Clone)]
struct Candidate {
    /// Disambiguation comment, empty when absent.
    comment: String,
    /// Best entry among messages with this key.
    entry: Entry,
}

/// source text -> candidates with distinct disambiguation comments
type ContextIndex = HashMap<String, Vec<Candidate>>;

/// Immutable lookup index built from a catalog.
///
/// Owns all of its text, so it can be shared between threads behind an
/// `Arc` once built.
#[derive(Debug, Clone)]
pub struct Translator {
    /// Target language of the catalog.
    language: Option<String>,
    /// Plural rule for `language`.
    plural_rule: PluralRule,
    /// context name -> index of its messages
    contexts: HashMap<String, ContextIndex>,
}

impl Translator {
    /// Indexes every message of `catalog`.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let mut contexts: HashMap<String, ContextIndex> = HashMap::new();

        for context in &catalog.contexts {
            let index = contexts.entry(context.name.clone()).or_default();
            for message in &context.messages {
                let (source, comment) = message.key();
                let entry = Entry::from_message(message);
                let candidates = index.entry(source.to_string()).or_default();

                // A later duplicate replaces an earlier one only when it ranks higher.
                match candidates.iter_mut().find(|c| c.comment == comment) {
                    Some(existing) if entry.rank() > existing.entry.rank() => existing.entry = entry,
                    Some(_) => {}
                    None => candidates.push(Candidate { comment: comment.to_string(), entry }),
                }
            }
        }

        tracing::debug!(
            contexts = contexts.len(),
            language = catalog.language.as_deref().unwrap_or("<none>"),
            "Built translator"
        );

        Self {
            language: catalog.language.clone(),
            plural_rule: catalog
                .language
                .as_deref()
                .map_or(PluralRule::OneOther, PluralRule::for_language),
            contexts,
        }
    }

    /// Target language of the indexed catalog.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Plural rule picked for the target language.
    #[must_use]
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// Translates `source` within `context`, falling back to `source` itself.
    #[must_use]
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> Lookup<'a> {
        self.lookup_with_comment(context, source, None)
    }

    /// Like [`Translator::lookup`] with a disambiguation comment. A miss on
    /// the commented key retries without the comment.
    #[must_use]
    pub fn lookup_with_comment<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Lookup<'a> {
        let found = self.find(context, source, comment).and_then(|entry| match entry {
            Entry::Usable(text) if primary_variant(text.first()).is_empty() => {
                Err(LookupMiss::EmptyTranslation)
            }
            entry => Ok(entry),
        });
        match found {
            Ok(Entry::Usable(text)) => {
                Lookup { text: primary_variant(text.first()), outcome: LookupOutcome::Translated }
            }
            Ok(&Entry::Miss(miss)) | Err(miss) => {
                tracing::trace!(context, source, reason = %miss, "Lookup fell back to source text");
                Lookup { text: source, outcome: LookupOutcome::Fallback(miss) }
            }
        }
    }

    /// Translates a numerus message for `count` and substitutes `%n`.
    #[must_use]
    pub fn lookup_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
    ) -> PluralLookup {
        let fallback = |miss: LookupMiss| {
            tracing::trace!(context, source, count, reason = %miss, "Plural lookup fell back");
            PluralLookup {
                text: substitute_count(source, count),
                outcome: LookupOutcome::Fallback(miss),
            }
        };

        let text = match self.find(context, source, comment) {
            Ok(Entry::Usable(TranslationText::Single(text))) => primary_variant(text),
            Ok(Entry::Usable(TranslationText::Plural(forms))) => {
                let index = self.plural_rule.form_index(count);
                let form = forms.get(index).or_else(|| forms.last()).map(String::as_str);
                match form.map(primary_variant) {
                    Some(form) if !form.is_empty() => form,
                    _ => return fallback(LookupMiss::EmptyTranslation),
                }
            }
            Ok(&Entry::Miss(miss)) | Err(miss) => return fallback(miss),
        };

        PluralLookup { text: substitute_count(text, count), outcome: LookupOutcome::Translated }
    }

    /// Entry for a key; a commented key falls back to the uncommented one.
    fn find(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Result<&Entry, LookupMiss> {
        let index = self.contexts.get(context).ok_or(LookupMiss::UnknownContext)?;
        let candidates = index.get(source).ok_or(LookupMiss::UnknownMessage)?;
        let comment = comment.unwrap_or_default();

        candidates
            .iter()
            .find(|c| c.comment == comment)
            .or_else(|| candidates.iter().find(|c| c.comment.is_empty()))
            .map(|c| &c.entry)
            .ok_or(LookupMiss::UnknownMessage)
    }
}
