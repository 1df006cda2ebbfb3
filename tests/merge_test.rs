//! Merging a fresh extraction into the Arch workbench's Ukrainian catalog.

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use googletest::prelude::*;
use pretty_assertions::assert_eq;
use ts_catalog::catalog::{
    Translation,
    TranslationStatus,
};
use ts_catalog::lookup::{
    LookupMiss,
    LookupOutcome,
};
use ts_catalog::merge::{
    MergeOptions,
    MergeReport,
    ObsoletePolicy,
};
use ts_catalog::types::LineNumber;
use ts_catalog::{
    Catalog,
    Message,
    Translator,
    merge,
    parse_catalog,
    write_catalog,
};

const ARCH_UK: &str = include_str!("fixtures/Arch_uk_excerpt.ts");

const OLD_DIAMETER: &str = "The diameter of this pipe, if not based on a profile";
const NEW_DIAMETER: &str = "The diameter of this pipe if it is not based on a profile";
const WALL_THICKNESS: &str = "The wall thickness of this pipe";

/// What a new string-extraction pass over the workbench sources would
/// produce: no translations, panel code moved down two lines, one pipe
/// string reworded, one removed, one added and the dialogs gone.
fn extraction() -> Catalog {
    let mut catalog = parse_catalog(ARCH_UK).unwrap();
    catalog.language = None;
    catalog.contexts.retain(|context| context.name != "Dialog");

    for context in &mut catalog.contexts {
        for message in &mut context.messages {
            message.translation = Translation::default();
            for location in &mut message.locations {
                if location.filename.as_deref() == Some("../../ArchPanel.py")
                    && let Some(LineNumber::Absolute(line)) = location.line
                {
                    location.line = Some(LineNumber::Absolute(line + 2));
                }
            }
        }
    }

    let properties = &mut catalog.contexts[0].messages;
    properties.retain(|message| message.source != "Offset from the end point");
    for message in properties.iter_mut() {
        if message.source == OLD_DIAMETER {
            message.source = NEW_DIAMETER.to_string();
        }
    }
    properties.push(Message::unfinished(WALL_THICKNESS).with_location("../../ArchPipe.py", 190));
    catalog
}

fn old() -> Catalog {
    parse_catalog(ARCH_UK).unwrap()
}

#[test]
fn test_merge_report() {
    let outcome = merge(&old(), &extraction(), &MergeOptions::default());

    assert_eq!(
        outcome.report,
        MergeReport {
            kept: 13,
            relocated: 3,
            revived: 0,
            stale: 1,
            new: 1,
            obsoleted: 4,
            dropped: 0,
        }
    );
}

#[googletest::test]
fn test_merge_keeps_translations_of_moved_messages() {
    let merged = merge(&old(), &extraction(), &MergeOptions::default()).catalog;
    let translator = Translator::new(&merged);

    let width = &merged.contexts[0].messages[0];
    let fill_ratio = translator.lookup("App::Property", "The fill ratio of this sheet");

    expect_that!(width.locations[0].absolute_line(), some(eq(973)));
    expect_that!(width.translation.status, eq(TranslationStatus::Finished));
    expect_that!(fill_ratio.text, eq("Коефіцієнт заповнення цього листа"));
    expect_that!(fill_ratio.is_translated(), eq(true));
}

#[googletest::test]
fn test_merge_turns_changed_source_into_a_hint() {
    let merged = merge(&old(), &extraction(), &MergeOptions::default()).catalog;
    let translator = Translator::new(&merged);
    let diameter = merged.contexts[0]
        .messages
        .iter()
        .find(|message| message.source == NEW_DIAMETER)
        .unwrap();

    let found = translator.lookup("App::Property", NEW_DIAMETER);

    expect_that!(diameter.old_source.as_deref(), some(eq(OLD_DIAMETER)));
    expect_that!(diameter.translation.status, eq(TranslationStatus::Unfinished));
    expect_that!(
        diameter.translation.text.first(),
        eq("Діаметр цієї труби, якщо вона не базується на профілі")
    );
    expect_that!(found.text, eq(NEW_DIAMETER));
    expect_that!(found.outcome, eq(LookupOutcome::Fallback(LookupMiss::Unfinished)));
}

#[googletest::test]
fn test_merge_adds_new_messages_untranslated() {
    let merged = merge(&old(), &extraction(), &MergeOptions::default()).catalog;
    let translator = Translator::new(&merged);

    let found = translator.lookup("App::Property", WALL_THICKNESS);

    expect_that!(found.text, eq(WALL_THICKNESS));
    expect_that!(found.outcome, eq(LookupOutcome::Fallback(LookupMiss::Unfinished)));
    expect_that!(
        write_catalog(&merged).as_str(),
        contains_substring(
            "      <location filename=\"../../ArchPipe.py\" line=\"190\"/>\n      \
             <source>The wall thickness of this pipe</source>\n      \
             <translation type=\"unfinished\"></translation>\n"
        )
    );
}

#[googletest::test]
fn test_merge_keeps_vanished_strings_as_obsolete() {
    let merged = merge(&old(), &extraction(), &MergeOptions::default()).catalog;
    let translator = Translator::new(&merged);
    let names: Vec<&str> = merged.contexts.iter().map(|c| c.name.as_str()).collect();

    let end_offset = merged.contexts[0].messages.last().unwrap();

    expect_that!(
        names,
        elements_are![eq(&"App::Property"), eq(&"Arch"), eq(&"Workbench"), eq(&"arch"), eq(&"Dialog")]
    );
    expect_that!(end_offset.source.as_str(), eq("Offset from the end point"));
    expect_that!(end_offset.translation.status, eq(TranslationStatus::Obsolete));
    expect_that!(end_offset.locations, is_empty());
    expect_that!(
        translator.lookup("Dialog", "Import").outcome,
        eq(LookupOutcome::Fallback(LookupMiss::Obsolete))
    );
}

#[googletest::test]
fn test_merge_drop_policy_removes_vanished_strings() {
    let options = MergeOptions { obsolete_policy: ObsoletePolicy::Drop, ..MergeOptions::default() };

    let outcome = merge(&old(), &extraction(), &options);

    expect_that!(outcome.report.obsoleted, eq(0));
    expect_that!(outcome.report.dropped, eq(4));
    expect_that!(outcome.catalog.context("Dialog"), none());
    expect_that!(
        outcome
            .catalog
            .messages()
            .filter(|(_, message)| message.translation.status.is_obsolete())
            .count(),
        eq(0)
    );
}

#[test]
fn test_merge_is_idempotent() {
    let extraction = extraction();
    let once = merge(&old(), &extraction, &MergeOptions::default()).catalog;

    let twice = merge(&once, &extraction, &MergeOptions::default()).catalog;

    assert_eq!(write_catalog(&twice), write_catalog(&once));
}

#[test]
fn test_merge_with_unchanged_extraction_reproduces_the_file() {
    let old = old();
    let mut extraction = old.clone();
    for context in &mut extraction.contexts {
        for message in &mut context.messages {
            message.translation = Translation::default();
        }
    }

    let merged = merge(&old, &extraction, &MergeOptions::default()).catalog;

    assert_eq!(write_catalog(&merged), ARCH_UK);
}
