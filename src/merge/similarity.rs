//! Text similarity used to carry translations over edited source strings.

use std::collections::HashMap;

/// Character-bigram Dice coefficient of `a` and `b`, as an integer percent.
///
/// Comparison is case-insensitive. Strings too short to have a bigram are
/// 100 when equal and 0 otherwise.
#[must_use]
pub fn similarity_percent(a: &str, b: &str) -> u32 {
    let left = bigrams(a);
    let right = bigrams(b);
    let total: usize = left.values().sum::<usize>() + right.values().sum::<usize>();
    if total == 0 {
        return if a.to_lowercase() == b.to_lowercase() { 100 } else { 0 };
    }

    let shared: usize = left
        .iter()
        .map(|(bigram, count)| right.get(bigram).map_or(0, |other| (*count).min(*other)))
        .sum();

    u32::try_from(shared * 200 / total).unwrap_or(100)
}

/// Case-folded character pairs of `text` with their counts.
fn bigrams(text: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut counts = HashMap::new();
    for pair in chars.windows(2) {
        if let [first, second] = pair {
            *counts.entry((*first, *second)).or_insert(0) += 1;
        }
    }
    counts
}
