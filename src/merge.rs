//! Merging an existing catalog with a fresh extraction.
//!
//! Contexts are emitted in extraction order, followed by contexts that only
//! exist in the old catalog. Within a context, every extracted message is
//! resolved in two passes:
//!
//! 1. exact match on `(source, comment)`, which keeps the old translation;
//! 2. stale match on a shared location or on similar source text, which keeps
//!    the old translation as an unfinished hint and records `oldsource`.
//!
//! Anything left unmatched is new. Old messages matched by nothing are kept
//! as obsolete or dropped according to [`ObsoletePolicy`].

/// Source text similarity for fuzzy matches.
mod similarity;

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
pub use similarity::similarity_percent;

use crate::catalog::{
    Catalog,
    Context,
    Message,
    Translation,
    TranslationStatus,
    TranslationText,
};
use crate::lookup::PluralRule;

/// What happens to old messages that no longer appear in the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObsoletePolicy {
    /// Keep translated leftovers as obsolete messages without locations.
    #[default]
    Keep,
    /// Remove leftovers from the merged catalog.
    Drop,
}

/// Whether the merged catalog carries `<location>` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationPolicy {
    /// Locations from the extraction.
    #[default]
    Keep,
    /// No `<location>` elements at all.
    None,
}

/// Default minimum similarity for carrying a translation over edited text.
pub const DEFAULT_SIMILARITY_PERCENT: u32 = 75;

/// Knobs of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Fate of old messages missing from the extraction.
    pub obsolete_policy: ObsoletePolicy,
    /// Fall back to source-text similarity when no location is shared.
    pub match_similar: bool,
    /// Minimum [`similarity_percent`] for a similarity match.
    pub similarity_percent: u32,
    /// Whether locations are written.
    pub locations: LocationPolicy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            obsolete_policy: ObsoletePolicy::default(),
            match_similar: true,
            similarity_percent: DEFAULT_SIMILARITY_PERCENT,
            locations: LocationPolicy::default(),
        }
    }
}

/// How each message of a merge was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeReport {
    /// Exact match at the same locations.
    pub kept: usize,
    /// Exact match whose locations changed.
    pub relocated: usize,
    /// Obsolete message that reappeared in the extraction.
    pub revived: usize,
    /// Translation carried over from a changed source text.
    pub stale: usize,
    /// Extracted message with nothing to carry over.
    pub new: usize,
    /// Old message kept as obsolete.
    pub obsoleted: usize,
    /// Old message removed.
    pub dropped: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kept, {} relocated, {} revived, {} stale, {} new, {} obsolete, {} dropped",
            self.kept,
            self.relocated,
            self.revived,
            self.stale,
            self.new,
            self.obsoleted,
            self.dropped
        )
    }
}

/// Result of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged catalog, in the old catalog's layout.
    pub catalog: Catalog,
    /// How each message was resolved.
    pub report: MergeReport,
}

/// Merges `old` with `extraction`.
///
/// The result is deterministic, and merging it again with the same
/// extraction yields the same catalog.
#[must_use]
pub fn merge(old: &Catalog, extraction: &Catalog, options: &MergeOptions) -> MergeOutcome {
    let language = old.language.clone().or_else(|| extraction.language.clone());
    let plural_forms =
        language.as_deref().map_or(PluralRule::OneOther, PluralRule::for_language).form_count();
    let mut merger = Merger { options, plural_forms, report: MergeReport::default() };

    let mut catalog = Catalog {
        version: if old.version.is_empty() {
            extraction.version.clone()
        } else {
            old.version.clone()
        },
        language,
        source_language: old.source_language.clone().or_else(|| extraction.source_language.clone()),
        dependencies: if extraction.dependencies.is_empty() {
            old.dependencies.clone()
        } else {
            extraction.dependencies.clone()
        },
        contexts: Vec::with_capacity(extraction.contexts.len()),
        style: old.style.clone(),
    };

    for extracted in &extraction.contexts {
        catalog.contexts.push(merger.merge_context(old.context(&extracted.name), extracted));
    }

    for old_context in &old.contexts {
        if extraction.context(&old_context.name).is_some() {
            continue;
        }
        let unused = vec![false; old_context.messages.len()];
        let leftovers = merger.leftovers(&old_context.messages, &unused);
        if !leftovers.is_empty() {
            catalog.contexts.push(Context {
                name: old_context.name.clone(),
                comment: old_context.comment.clone(),
                messages: leftovers,
            });
        }
    }

    if options.locations == LocationPolicy::None {
        for context in &mut catalog.contexts {
            for message in &mut context.messages {
                message.locations.clear();
            }
        }
    }

    let report = merger.report;
    tracing::debug!(
        contexts = catalog.contexts.len(),
        messages = catalog.message_count(),
        %report,
        "Merged catalog"
    );

    MergeOutcome { catalog, report }
}

/// Per-merge state shared by all contexts.
struct Merger<'o> {
    /// Caller's options.
    options: &'o MergeOptions,
    /// Plural forms of the target language, for new numerus messages.
    plural_forms: usize,
    /// Counts so far.
    report: MergeReport,
}

impl Merger<'_> {
    /// Merges one extracted context with its old counterpart, if any.
    fn merge_context(&mut self, old: Option<&Context>, extracted: &Context) -> Context {
        let old_messages = old.map_or(&[][..], |context| context.messages.as_slice());
        let mut used = vec![false; old_messages.len()];
        let mut resolved: Vec<Option<Message>> = vec![None; extracted.messages.len()];

        for (slot, message) in resolved.iter_mut().zip(&extracted.messages) {
            if let Some(index) = find_exact(old_messages, &used, message) {
                mark_used(&mut used, index);
                if let Some(previous) = old_messages.get(index) {
                    *slot = Some(self.exact(previous, message));
                }
            }
        }

        for (slot, message) in resolved.iter_mut().zip(&extracted.messages) {
            if slot.is_some() {
                continue;
            }
            let stale = self.find_stale(old_messages, &used, message);
            let Some((index, previous)) =
                stale.and_then(|index| Some((index, old_messages.get(index)?)))
            else {
                *slot = Some(self.new_message(message));
                continue;
            };
            mark_used(&mut used, index);
            *slot = Some(self.stale(previous, message));
        }

        let mut messages: Vec<Message> = resolved.into_iter().flatten().collect();
        messages.extend(self.leftovers(old_messages, &used));

        Context {
            name: extracted.name.clone(),
            comment: extracted.comment.clone().or_else(|| old.and_then(|c| c.comment.clone())),
            messages,
        }
    }

    /// Same key: the old translation stays, revived if it was obsolete.
    fn exact(&mut self, previous: &Message, extracted: &Message) -> Message {
        let mut translation = previous.translation.clone();
        if translation.status.is_obsolete() {
            translation.status = TranslationStatus::Unfinished;
            self.report.revived += 1;
        } else if previous.locations == extracted.locations {
            self.report.kept += 1;
        } else {
            self.report.relocated += 1;
        }
        translation.text = self.fit_shape(translation.text, extracted.numerus);

        Message {
            old_source: previous.old_source.clone(),
            old_comment: previous.old_comment.clone(),
            translator_comment: previous.translator_comment.clone(),
            extras: if extracted.extras.is_empty() {
                previous.extras.clone()
            } else {
                extracted.extras.clone()
            },
            translation,
            ..extracted.clone()
        }
    }

    /// Changed source: the old translation becomes an unfinished hint.
    fn stale(&mut self, previous: &Message, extracted: &Message) -> Message {
        self.report.stale += 1;
        tracing::debug!(
            old = %previous.source,
            new = %extracted.source,
            "Keeping translation as an unfinished hint"
        );

        Message {
            old_source: (previous.source != extracted.source).then(|| previous.source.clone()),
            old_comment: if previous.comment == extracted.comment {
                None
            } else {
                previous.comment.clone()
            },
            translator_comment: previous.translator_comment.clone(),
            translation: Translation {
                status: TranslationStatus::Unfinished,
                text: self.fit_shape(previous.translation.text.clone(), extracted.numerus),
            },
            ..extracted.clone()
        }
    }

    /// Nothing to carry over: an empty unfinished translation.
    fn new_message(&mut self, extracted: &Message) -> Message {
        self.report.new += 1;
        let text = if extracted.numerus {
            TranslationText::Plural(vec![String::new(); self.plural_forms])
        } else {
            TranslationText::default()
        };
        Message {
            translation: Translation { status: TranslationStatus::Unfinished, text },
            ..extracted.clone()
        }
    }

    /// Old messages not marked in `used`, in their original order.
    fn leftovers(&mut self, old_messages: &[Message], used: &[bool]) -> Vec<Message> {
        let mut kept = Vec::new();
        for (message, _) in old_messages.iter().zip(used).filter(|(_, used)| !**used) {
            if self.options.obsolete_policy == ObsoletePolicy::Drop
                || message.translation.text.is_empty()
            {
                self.report.dropped += 1;
                continue;
            }
            self.report.obsoleted += 1;
            let mut obsolete = message.clone();
            obsolete.locations.clear();
            if !obsolete.translation.status.is_obsolete() {
                obsolete.translation.status = TranslationStatus::Obsolete;
            }
            kept.push(obsolete);
        }
        kept
    }

    /// Picks an unused old message to carry over as a hint: one sharing a
    /// location, or else the most similar source text. Only translated,
    /// non-obsolete messages of the same numerus kind qualify.
    fn find_stale(
        &self,
        old_messages: &[Message],
        used: &[bool],
        message: &Message,
    ) -> Option<usize> {
        let candidates = move || {
            old_messages.iter().zip(used).enumerate().filter_map(move |(index, (old, used))| {
                let eligible = !*used
                    && !old.translation.status.is_obsolete()
                    && !old.translation.text.is_empty()
                    && old.numerus == message.numerus;
                eligible.then_some((index, old))
            })
        };

        let by_location = candidates().find(|(_, old)| {
            old.locations
                .iter()
                .any(|location| message.locations.iter().any(|other| location.same_place(other)))
        });
        if let Some((index, _)) = by_location {
            return Some(index);
        }
        if !self.options.match_similar {
            return None;
        }

        let mut best: Option<(usize, u32)> = None;
        for (index, old) in candidates() {
            let score = similarity_percent(&old.source, &message.source);
            if score >= self.options.similarity_percent
                && best.is_none_or(|(_, best_score)| score > best_score)
            {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Converts between single and plural text when the numerus flag changed.
    fn fit_shape(&self, text: TranslationText, numerus: bool) -> TranslationText {
        match (text, numerus) {
            (TranslationText::Single(single), true) => {
                let mut forms = vec![String::new(); self.plural_forms.max(1)];
                if let Some(first) = forms.first_mut() {
                    *first = single;
                }
                TranslationText::Plural(forms)
            }
            (TranslationText::Plural(forms), false) => {
                TranslationText::Single(forms.into_iter().next().unwrap_or_default())
            }
            (text, _) => text,
        }
    }
}

/// First unused old message with the same key, preferring one at the same
/// locations and then one that is not obsolete.
fn find_exact(old_messages: &[Message], used: &[bool], message: &Message) -> Option<usize> {
    let key = message.key();
    let mut candidates = old_messages
        .iter()
        .zip(used)
        .enumerate()
        .filter(|(_, (old, used))| !**used && old.key() == key)
        .map(|(index, (old, _))| (index, old));

    let first = candidates.clone().next().map(|(index, _)| index);
    let same_locations =
        candidates.clone().find(|(_, old)| old.locations == message.locations).map(|(i, _)| i);
    let active = candidates
        .find(|(_, old)| !old.translation.status.is_obsolete())
        .map(|(index, _)| index);

    same_locations.or(active).or(first)
}

/// Marks an old message as matched.
fn mark_used(used: &mut [bool], index: usize) {
    if let Some(flag) = used.get_mut(index) {
        *flag = true;
    }
}
