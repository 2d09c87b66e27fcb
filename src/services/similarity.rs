//! Bag-of-words text similarity: Unicode-normalized tokenization and the
//! Jaccard coefficient over token sets.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Splits free text into normalized tokens: NFKD compatibility decomposition,
/// lower-casing, and every non-alphanumeric character treated as whitespace.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.nfkd()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard coefficient of two token sequences, duplicates collapsed.
/// Defined as 0 when both sets are empty.
#[must_use]
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}
