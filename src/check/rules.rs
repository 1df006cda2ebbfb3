//! Per-message text rules comparing a source string with one translation.
//!
//! Each rule returns a human-readable detail when the pair looks wrong.

use super::LengthRatio;

/// Format placeholders found in `text`, sorted.
///
/// Recognized: Qt `%1`..`%99` (also `%L1`), `%n` (also `%Ln`), printf-style
/// conversions such as `%s` or `%d`, `%tag%`-style tokens and Python
/// `{name}` fields. `%%` is a literal percent sign.
pub(super) fn placeholders(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut found = Vec::new();
    let mut index = 0;

    while let Some(&current) = chars.get(index) {
        match current {
            '%' => {
                let (token, consumed) = percent_token(chars.get(index + 1..).unwrap_or_default());
                if let Some(token) = token {
                    found.push(token);
                }
                index += 1 + consumed;
            }
            '{' => {
                let rest = chars.get(index + 1..).unwrap_or_default();
                let name: String =
                    rest.iter().take_while(|c| c.is_alphanumeric() || **c == '_').collect();
                let closing = name.chars().count();
                if rest.get(closing) == Some(&'}') {
                    found.push(format!("{{{name}}}"));
                    index += closing + 2;
                } else {
                    index += 1;
                }
            }
            _ => index += 1,
        }
    }

    found.sort();
    found
}

/// Reads the placeholder following a `%`. Returns the token and how many
/// characters after the `%` it used.
fn percent_token(rest: &[char]) -> (Option<String>, usize) {
    let localized = rest.first() == Some(&'L');
    let offset = usize::from(localized);
    let after = rest.get(offset..).unwrap_or_default();

    match after.first() {
        Some('%') if !localized => (None, 1),
        Some('n') => (Some("%n".to_string()), offset + 1),
        Some(c) if c.is_ascii_digit() => {
            let digits: String = after.iter().take(2).take_while(|c| c.is_ascii_digit()).collect();
            let used = digits.len();
            (Some(format!("%{digits}")), offset + used)
        }
        Some(c) if c.is_ascii_alphabetic() && !localized => {
            let word: String = after.iter().take_while(|c| c.is_ascii_alphabetic()).collect();
            let length = word.len();
            if after.get(length) == Some(&'%') {
                (Some(format!("%{word}%")), length + 1)
            } else if length == 1 && is_printf_conversion(*c) {
                (Some(format!("%{c}")), 1)
            } else {
                (None, 0)
            }
        }
        _ => (None, 0),
    }
}

/// Conversion letters that complete a `%x` printf directive.
const fn is_printf_conversion(c: char) -> bool {
    matches!(c, 'c' | 'd' | 'e' | 'f' | 'g' | 'i' | 'o' | 'p' | 'r' | 's' | 'u' | 'x' | 'X')
}

/// Compares the placeholders of both texts, ignoring order.
pub(super) fn placeholder_mismatch(
    source: &str,
    translation: &str,
    numerus: bool,
) -> Option<String> {
    let mut expected = placeholders(source);
    let mut actual = placeholders(translation);
    // Plural forms may spell the count out instead of using %n.
    if numerus {
        expected.retain(|token| token != "%n");
        actual.retain(|token| token != "%n");
    }
    (expected != actual).then(|| {
        format!(
            "placeholders differ: source has [{}], translation has [{}]",
            expected.join(", "),
            actual.join(", ")
        )
    })
}

/// Whether `text` marks a keyboard accelerator (`&File`). `&&` is a literal
/// ampersand and `& ` is plain text.
pub(super) fn has_accelerator(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
            }
            Some(next) if !next.is_whitespace() => return true,
            _ => {}
        }
    }
    false
}

/// Reports an accelerator present on one side only.
pub(super) fn accelerator_mismatch(source: &str, translation: &str) -> Option<String> {
    match (has_accelerator(source), has_accelerator(translation)) {
        (true, false) => Some("source has an accelerator, translation does not".to_string()),
        (false, true) => Some("translation has an accelerator, source does not".to_string()),
        _ => None,
    }
}

/// Sentence-ending mark of `text`; `...` counts as `…`.
fn trailing_punctuation(text: &str) -> Option<char> {
    let trimmed = text.trim_end();
    if trimmed.ends_with("...") {
        return Some('…');
    }
    trimmed.chars().last().filter(|c| matches!(c, ':' | '.' | '…' | '?' | '!'))
}

/// Reports differing sentence-ending marks.
pub(super) fn punctuation_mismatch(source: &str, translation: &str) -> Option<String> {
    let expected = trailing_punctuation(source);
    let actual = trailing_punctuation(translation);
    (expected != actual).then(|| {
        let show = |c: Option<char>| c.map_or_else(|| "none".to_string(), |c| format!("'{c}'"));
        format!(
            "trailing punctuation differs: source {}, translation {}",
            show(expected),
            show(actual)
        )
    })
}

/// Number of `\n` at the end of `text`.
fn trailing_newlines(text: &str) -> usize {
    text.chars().rev().take_while(|c| *c == '\n').count()
}

/// Reports differing trailing newline counts.
pub(super) fn newline_mismatch(source: &str, translation: &str) -> Option<String> {
    let expected = trailing_newlines(source);
    let actual = trailing_newlines(translation);
    (expected != actual).then(|| {
        format!("source ends with {expected} newline(s), translation with {actual}")
    })
}

/// Reports a translation outside `bounds`. Sources shorter than two
/// characters are never judged.
pub(super) fn length_ratio(source: &str, translation: &str, bounds: LengthRatio) -> Option<String> {
    let source_length = source.chars().count();
    if source_length < 2 {
        return None;
    }
    let percent = translation.chars().count() * 100 / source_length;
    let within = (bounds.min_percent..=bounds.max_percent)
        .contains(&u32::try_from(percent).unwrap_or(u32::MAX));
    (!within).then(|| {
        format!(
            "translation is {percent}% of the source length (allowed {}%..{}%)",
            bounds.min_percent, bounds.max_percent
        )
    })
}

/// Source text reduced for comparing whether two sources say the same thing:
/// lowercase, accelerators removed, trailing punctuation and space trimmed.
pub(super) fn normalize_source(source: &str) -> String {
    let unescaped = source.replace("&&", "\u{0}").replace('&', "").replace('\u{0}', "&");
    unescaped
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '.' | '…' | '?' | '!'))
        .to_lowercase()
}
