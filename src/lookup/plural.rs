//! Plural form selection for numerus messages.
//!
//! Forms are ordered the way Qt Linguist orders `<numerusform>` elements
//! for each language, so the selected index can be used directly.

/// Plural rule families, named after a representative language group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// One form for every count (Japanese, Chinese, Korean, ...).
    NoPlural,
    /// `n == 1` / other (English, German, Spanish, ...).
    OneOther,
    /// `n <= 1` / other (French, Brazilian Portuguese).
    French,
    /// Ukrainian, Russian, Belarusian, Serbian, Croatian, Bosnian.
    EastSlavic,
    /// Polish: one, few (2-4 except 12-14), many.
    Polish,
    /// Czech and Slovak.
    Czech,
    /// Arabic: six forms.
    Arabic,
}

/// Languages without plural distinction.
const NO_PLURAL: &[&str] = &["id", "ja", "ko", "ms", "th", "vi", "zh"];

/// Languages using the Ukrainian-style three-form rule.
const EAST_SLAVIC: &[&str] = &["be", "bs", "hr", "ru", "sr", "uk"];

impl PluralRule {
    /// Picks the rule for a language code such as `uk`, `uk_UA` or `pt-BR`.
    ///
    /// Unknown languages use [`PluralRule::OneOther`].
    #[must_use]
    pub fn for_language(code: &str) -> Self {
        let normalized = code.to_lowercase().replace('-', "_");
        if normalized == "pt_br" {
            return Self::French;
        }
        let primary = normalized.split('_').next().unwrap_or_default();

        match primary {
            "fr" => Self::French,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            "ar" => Self::Arabic,
            _ if EAST_SLAVIC.contains(&primary) => Self::EastSlavic,
            _ if NO_PLURAL.contains(&primary) => Self::NoPlural,
            _ => Self::OneOther,
        }
    }

    /// Number of `<numerusform>` entries a message needs for this rule.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::NoPlural => 1,
            Self::OneOther | Self::French => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
            Self::Arabic => 6,
        }
    }

    /// Index of the form to use for `count`. Negative counts use their
    /// absolute value.
    #[must_use]
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            Self::NoPlural => 0,
            Self::OneOther => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::French => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && n10 <= 4 && !(n100 >= 12 && n100 <= 14) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if n10 >= 2 && n10 <= 4 && !(n100 >= 12 && n100 <= 14) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => {
                if n == 1 {
                    0
                } else if n >= 2 && n <= 4 {
                    1
                } else {
                    2
                }
            }
            Self::Arabic => {
                if n == 0 {
                    0
                } else if n == 1 {
                    1
                } else if n == 2 {
                    2
                } else if n100 >= 3 && n100 <= 10 {
                    3
                } else if n100 >= 11 {
                    4
                } else {
                    5
                }
            }
        }
    }
}

/// Replaces every `%n` with the count.
#[must_use]
pub fn substitute_count(text: &str, count: i64) -> String {
    text.replace("%n", &count.to_string())
}
