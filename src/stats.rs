//! Translation progress figures.

use std::fmt;

use serde::Serialize;

use crate::catalog::{
    Catalog,
    Context,
    TranslationStatus,
};

/// Message counts for one context or a whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    /// `type` absent.
    pub finished: usize,
    /// `type="unfinished"`.
    pub unfinished: usize,
    /// `type="obsolete"` or `type="vanished"`.
    pub obsolete: usize,
}

impl Counts {
    /// Counts one message with `status`.
    const fn add(&mut self, status: TranslationStatus) {
        match status {
            TranslationStatus::Finished => self.finished += 1,
            TranslationStatus::Unfinished => self.unfinished += 1,
            TranslationStatus::Obsolete | TranslationStatus::Vanished => self.obsolete += 1,
        }
    }

    /// Messages still extracted from the application.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.finished + self.unfinished
    }

    /// Finished share of the active messages, rounded down. An empty set is
    /// complete.
    #[must_use]
    pub const fn completion_percent(&self) -> usize {
        match self.active() {
            0 => 100,
            active => self.finished * 100 / active,
        }
    }
}

impl std::ops::AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.finished += other.finished;
        self.unfinished += other.unfinished;
        self.obsolete += other.obsolete;
    }
}

/// Progress of one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextStats {
    /// Context name.
    pub name: String,
    /// Its messages by status.
    #[serde(flatten)]
    pub counts: Counts,
    /// See [`Counts::completion_percent`].
    pub completion_percent: usize,
}

/// Progress of a whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    /// Target language.
    pub language: Option<String>,
    /// Per-context figures in document order.
    pub contexts: Vec<ContextStats>,
    /// Sum over all contexts.
    pub total: Counts,
    /// See [`Counts::completion_percent`].
    pub completion_percent: usize,
}

impl CatalogStats {
    /// Counts every message of `catalog`.
    #[must_use]
    pub fn collect(catalog: &Catalog) -> Self {
        let contexts: Vec<ContextStats> = catalog.contexts.iter().map(context_stats).collect();
        let mut total = Counts::default();
        for context in &contexts {
            total += context.counts;
        }

        Self {
            language: catalog.language.clone(),
            contexts,
            total,
            completion_percent: total.completion_percent(),
        }
    }
}

/// Figures for one context.
fn context_stats(context: &Context) -> ContextStats {
    let mut counts = Counts::default();
    for message in &context.messages {
        counts.add(message.translation.status);
    }
    ContextStats {
        name: context.name.clone(),
        counts,
        completion_percent: counts.completion_percent(),
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.contexts.iter().map(|c| c.name.chars().count()).max().unwrap_or(0).max(5);
        for context in &self.contexts {
            let counts = context.counts;
            writeln!(
                f,
                "{:<width$}  {:>3}%  {:>4} finished  {:>4} unfinished  {:>4} obsolete",
                context.name,
                context.completion_percent,
                counts.finished,
                counts.unfinished,
                counts.obsolete
            )?;
        }
        writeln!(
            f,
            "{:<width$}  {:>3}%  {:>4} finished  {:>4} unfinished  {:>4} obsolete",
            "total",
            self.completion_percent,
            self.total.finished,
            self.total.unfinished,
            self.total.obsolete
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::catalog::Message;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new(Some("uk"), Some("en"));
        catalog.contexts.push(
            Context::new("arch")
                .with_message(Message::finished("&Draft", "&Ескіз"))
                .with_message(Message::finished("Utilities", "Утиліти"))
                .with_message(Message::unfinished("Snapping"))
                .with_message(Message::obsolete("Old", "Старе")),
        );
        catalog.contexts.push(Context::new("Arch_Wall").with_message(Message::unfinished("Wall")));
        catalog
    }

    #[googletest::test]
    fn test_collect() {
        let stats = CatalogStats::collect(&sample());

        expect_that!(stats.total, eq(Counts { finished: 2, unfinished: 2, obsolete: 1 }));
        expect_that!(stats.completion_percent, eq(50));
        expect_that!(stats.contexts[0].completion_percent, eq(66));
        expect_that!(stats.contexts[1].completion_percent, eq(0));
    }

    #[rstest]
    #[case::empty(0, 0, 100)]
    #[case::all_done(3, 0, 100)]
    #[case::rounded_down(2, 1, 66)]
    #[case::none_done(0, 4, 0)]
    fn test_completion_percent(
        #[case] finished: usize,
        #[case] unfinished: usize,
        #[case] expected: usize,
    ) {
        let counts = Counts { finished, unfinished, obsolete: 7 };
        assert_eq!(counts.completion_percent(), expected);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(CatalogStats::collect(&sample())).unwrap();

        assert_eq!(json["language"], "uk");
        assert_eq!(json["completionPercent"], 50);
        assert_eq!(json["contexts"][0]["name"], "arch");
        assert_eq!(json["contexts"][0]["finished"], 2);
        assert_eq!(json["total"]["obsolete"], 1);
    }

    #[test]
    fn test_display_lists_contexts_and_total() {
        let text = CatalogStats::collect(&sample()).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("arch ") && lines[0].contains(" 66%"));
        assert!(lines[1].starts_with("Arch_Wall ") && lines[1].contains("  0%"));
        assert!(lines[2].starts_with("total ") && lines[2].contains(" 50%"));
    }
}
