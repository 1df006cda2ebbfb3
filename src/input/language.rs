//! Target language detection from catalog file names.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// ISO 639 language codes, plus the few three-letter codes used by Qt
/// translation projects.
static LANGUAGE_CODES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "af", "ar", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "eo",
        "es", "et", "eu", "fa", "fi", "fil", "fr", "ga", "gl", "he", "hi", "hr", "hu", "hy", "id",
        "is", "it", "ja", "ka", "kab", "kk", "ko", "lt", "lv", "mk", "ms", "nb", "nl", "nn", "no",
        "pl", "pt", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "th", "tr", "uk", "ur", "uz", "val",
        "vi", "zh",
    ]
    .into_iter()
    .collect()
});

/// True when the primary subtag of `code` (`pt` in `pt-BR`) is a known
/// language.
fn is_language_code(code: &str) -> bool {
    let primary = code.split(['-', '@']).next().unwrap_or_default();
    LANGUAGE_CODES.contains(primary.to_lowercase().as_str())
}

/// Detect the target language from a catalog path.
///
/// Splits the path without its extension by '/', '_' and '.', then searches
/// backwards for a part that is a known language code.
///
/// # Examples
/// - `translations/Arch_uk.ts` → `uk`
/// - `translations/Arch_pt-BR.ts` → `pt-BR`
/// - `translations/de/Arch.ts` → `de`
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    let without_extension = file_path.with_extension("");
    let path_str = without_extension.to_string_lossy();

    path_str
        .split(['/', '\\', '_', '.'])
        .rev()
        .find(|part| is_language_code(part))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("src/Mod/Arch/Resources/translations/Arch_uk.ts", Some("uk"))]
    #[case("translations/Arch_pt-BR.ts", Some("pt-BR"))]
    #[case("translations/Arch_zh-CN.ts", Some("zh-CN"))]
    #[case("translations/Arch_val-ES.ts", Some("val-ES"))]
    #[case("translations/Arch_sr-CS.ts", Some("sr-CS"))]
    #[case("translations/uk/Arch.ts", Some("uk"))]
    // The last match wins
    #[case("translations/de/Arch_uk.ts", Some("uk"))]
    // The extension is not a language, even though `ts` is a code
    #[case("translations/Arch.ts", None)]
    #[case("translations/Arch_xx.ts", None)]
    fn test_detect_language_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_language_from_path(Path::new(path));
        assert_eq!(result.as_deref(), expected);
    }
}
