//! Quality checks over a catalog.
//!
//! Checks never modify the catalog; they report [`Finding`]s for a reviewer.
//! Per-message rules only look at finished, non-obsolete messages.

/// Individual text comparisons.
mod rules;

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::catalog::{
    Catalog,
    Context,
    Message,
    TranslationStatus,
};
use crate::types::Location;

/// Identifier of a check rule, written in kebab-case in configuration and
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// A finished message with an empty translation.
    FinishedEmpty,
    /// `%1`, `%n` or printf conversions differ between source and translation.
    PlaceholderMismatch,
    /// The source has an `&` accelerator and the translation has none, or
    /// the reverse.
    AcceleratorMismatch,
    /// The sentence-ending punctuation differs.
    TrailingPunctuation,
    /// The number of trailing newlines differs.
    NewlineMismatch,
    /// Two different sources share one translation across the catalog.
    SharedTranslation,
    /// The same key and locations appear twice in a context.
    DuplicateMessage,
    /// The same key carries two different usable translations.
    ConflictingTranslation,
    /// The translation is far shorter or longer than its source.
    LengthRatio,
}

impl Rule {
    /// Every rule, in reporting order.
    pub const ALL: [Self; 9] = [
        Self::FinishedEmpty,
        Self::PlaceholderMismatch,
        Self::AcceleratorMismatch,
        Self::TrailingPunctuation,
        Self::NewlineMismatch,
        Self::SharedTranslation,
        Self::DuplicateMessage,
        Self::ConflictingTranslation,
        Self::LengthRatio,
    ];

    /// Kebab-case name used in configuration and output.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FinishedEmpty => "finished-empty",
            Self::PlaceholderMismatch => "placeholder-mismatch",
            Self::AcceleratorMismatch => "accelerator-mismatch",
            Self::TrailingPunctuation => "trailing-punctuation",
            Self::NewlineMismatch => "newline-mismatch",
            Self::SharedTranslation => "shared-translation",
            Self::DuplicateMessage => "duplicate-message",
            Self::ConflictingTranslation => "conflicting-translation",
            Self::LengthRatio => "length-ratio",
        }
    }

    /// Severity when the configuration says nothing about the rule.
    #[must_use]
    pub const fn default_severity(self) -> Severity {
        match self {
            Self::FinishedEmpty | Self::PlaceholderMismatch => Severity::Error,
            Self::AcceleratorMismatch
            | Self::NewlineMismatch
            | Self::SharedTranslation
            | Self::DuplicateMessage
            | Self::ConflictingTranslation => Severity::Warning,
            Self::TrailingPunctuation => Severity::Info,
            Self::LengthRatio => Severity::Off,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How seriously a finding is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Disables the rule.
    Off,
    /// Worth a look.
    Info,
    /// Probably wrong.
    Warning,
    /// Wrong; `check` exits non-zero.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Allowed translation length, in percent of the source length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LengthRatio {
    /// Shortest acceptable translation.
    pub min_percent: u32,
    /// Longest acceptable translation.
    pub max_percent: u32,
}

impl Default for LengthRatio {
    fn default() -> Self {
        Self { min_percent: 20, max_percent: 400 }
    }
}

/// Which rules run and how they report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckOptions {
    /// Overrides of [`Rule::default_severity`].
    pub severities: BTreeMap<Rule, Severity>,
    /// Bounds for [`Rule::LengthRatio`].
    pub length_ratio: LengthRatio,
}

impl CheckOptions {
    /// Effective severity of `rule`.
    #[must_use]
    pub fn severity(&self, rule: Rule) -> Severity {
        self.severities.get(&rule).copied().unwrap_or_else(|| rule.default_severity())
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Rule that fired.
    pub rule: Rule,
    /// Effective severity.
    pub severity: Severity,
    /// Name of the context holding the message.
    pub context: String,
    /// 1-based position of the message within its context.
    pub message_index: usize,
    /// Source text of the message.
    pub source: String,
    /// First location of the message, if it has one.
    #[serde(serialize_with = "serialize_location")]
    pub location: Option<Location>,
    /// Human-readable explanation.
    pub detail: String,
}

/// Writes a location as `file:line`.
#[allow(clippy::ref_option)]
fn serialize_location<S: serde::Serializer>(
    location: &Option<Location>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match location {
        Some(location) => serializer.serialize_str(&location.to_string()),
        None => serializer.serialize_none(),
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(
            f,
            "{}[{}] {} (context '{}', message #{}: {:?})",
            self.severity, self.rule, self.detail, self.context, self.message_index, self.source
        )
    }
}

/// Runs every enabled rule over `catalog`.
///
/// Findings are ordered by context and message, with catalog-wide
/// `shared-translation` findings last.
#[must_use]
pub fn check_catalog(catalog: &Catalog, options: &CheckOptions) -> Vec<Finding> {
    let mut checker = Checker { options, findings: Vec::new() };

    for context in &catalog.contexts {
        for (index, message) in context.messages.iter().enumerate() {
            checker.check_message(context, index, message);
        }
        checker.check_duplicates(context);
    }
    checker.check_shared_translations(catalog);

    tracing::debug!(findings = checker.findings.len(), "Checked catalog");
    checker.findings
}

/// Accumulates findings for one catalog.
struct Checker<'o> {
    /// Rule configuration.
    options: &'o CheckOptions,
    /// Findings so far.
    findings: Vec<Finding>,
}

impl Checker<'_> {
    /// Records a finding unless `rule` is off.
    fn report(&mut self, rule: Rule, context: &Context, index: usize, detail: String) {
        let severity = self.options.severity(rule);
        if severity == Severity::Off {
            return;
        }
        let message = context.messages.get(index);
        self.findings.push(Finding {
            rule,
            severity,
            context: context.name.clone(),
            message_index: index + 1,
            source: message.map(|m| m.source.clone()).unwrap_or_default(),
            location: message.and_then(Message::primary_location).cloned(),
            detail,
        });
    }

    /// Per-message rules.
    fn check_message(&mut self, context: &Context, index: usize, message: &Message) {
        if message.translation.status != TranslationStatus::Finished {
            return;
        }
        if message.translation.text.is_empty() {
            let detail = "finished message has no translation".to_string();
            self.report(Rule::FinishedEmpty, context, index, detail);
            return;
        }

        let source = message.source.as_str();
        let mut details = Vec::new();
        for form in message.translation.text.forms().filter(|form| !form.is_empty()) {
            let found = [
                (
                    Rule::PlaceholderMismatch,
                    rules::placeholder_mismatch(source, form, message.numerus),
                ),
                (Rule::AcceleratorMismatch, rules::accelerator_mismatch(source, form)),
                (Rule::TrailingPunctuation, rules::punctuation_mismatch(source, form)),
                (Rule::NewlineMismatch, rules::newline_mismatch(source, form)),
                (Rule::LengthRatio, rules::length_ratio(source, form, self.options.length_ratio)),
            ];
            for (rule, detail) in found {
                if let Some(detail) = detail
                    && !details.contains(&(rule, detail.clone()))
                {
                    details.push((rule, detail));
                }
            }
        }

        for (rule, detail) in details {
            self.report(rule, context, index, detail);
        }
    }

    /// Repeated keys within one context.
    fn check_duplicates(&mut self, context: &Context) {
        let mut first_by_key: HashMap<(&str, &str), usize> = HashMap::new();
        let mut pending = Vec::new();

        for (index, message) in context.messages.iter().enumerate() {
            if message.translation.status.is_obsolete() {
                continue;
            }
            let Some(&first) = first_by_key.get(&message.key()) else {
                first_by_key.insert(message.key(), index);
                continue;
            };
            let Some(earlier) = context.messages.get(first) else {
                continue;
            };

            if earlier.locations == message.locations {
                pending.push((
                    Rule::DuplicateMessage,
                    index,
                    format!("same source, comment and locations as message #{}", first + 1),
                ));
            }
            if earlier.translation.is_usable()
                && message.translation.is_usable()
                && earlier.translation.text != message.translation.text
            {
                pending.push((
                    Rule::ConflictingTranslation,
                    index,
                    format!(
                        "translated as {:?} here but {:?} in message #{}",
                        message.translation.text.first(),
                        earlier.translation.text.first(),
                        first + 1
                    ),
                ));
            }
        }

        for (rule, index, detail) in pending {
            self.report(rule, context, index, detail);
        }
    }

    /// Flags a finished translation reused for a different source text,
    /// the usual sign of a copy-paste slip. Reported on the later message.
    fn check_shared_translations(&mut self, catalog: &Catalog) {
        let mut first_use: HashMap<&str, (String, &Context, &Message)> = HashMap::new();
        let mut pending = Vec::new();

        for context in &catalog.contexts {
            for (index, message) in context.messages.iter().enumerate() {
                if !message.translation.is_usable() || message.numerus {
                    continue;
                }
                let text = message.translation.text.first();
                let normalized = rules::normalize_source(&message.source);
                match first_use.get(text) {
                    None => {
                        first_use.insert(text, (normalized, context, message));
                    }
                    Some((first_source, first_context, first_message))
                        if *first_source != normalized =>
                    {
                        pending.push((
                            context,
                            index,
                            format!(
                                "translation {text:?} is also used for {:?} in context '{}'",
                                first_message.source, first_context.name
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        for (context, index, detail) in pending {
            self.report(Rule::SharedTranslation, context, index, detail);
        }
    }
}

/// True when any finding is at `error` severity.
#[must_use]
pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|finding| finding.severity == Severity::Error)
}
