//! Lexical comparison of two texts
//!
//! Provides the text normalizer and the spelling error ratio used to score
//! how far a round-tripped sentence drifted from the original wording.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::MetricsError;

/// Characters removed by [`normalize_text`]
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '<', '>',
];

/// Normalize text for comparison
///
/// Strips common punctuation, collapses whitespace runs into single spaces,
/// lowercases and trims.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Method used by [`spelling_error_ratio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellingMethod {
    /// Words that appear in one text but not both
    #[default]
    SymmetricDifference,
    /// Character-level ratio; shares the matching-block algorithm with
    /// `SequenceMatcher` and is not a true edit distance
    Levenshtein,
    /// Character-level matching-block similarity ratio
    SequenceMatcher,
}

impl SpellingMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SymmetricDifference => "symmetric_difference",
            Self::Levenshtein => "levenshtein",
            Self::SequenceMatcher => "sequence_matcher",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SymmetricDifference => "Word-set difference over the larger word set (default)",
            Self::Levenshtein => "Character-level ratio (matching blocks, not true edit distance)",
            Self::SequenceMatcher => "Character-level matching-block similarity ratio",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::SymmetricDifference,
            Self::Levenshtein,
            Self::SequenceMatcher,
        ]
    }
}

impl FromStr for SpellingMethod {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symmetric_difference" => Ok(Self::SymmetricDifference),
            "levenshtein" => Ok(Self::Levenshtein),
            "sequence_matcher" => Ok(Self::SequenceMatcher),
            other => Err(MetricsError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SpellingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ratio of spelling/word errors between two texts
///
/// Returns 0.0 for identical texts (and for two empty texts) and 1.0 when
/// exactly one text is empty. Comparison is case-insensitive and ignores
/// punctuation.
pub fn spelling_error_ratio(text1: &str, text2: &str, method: SpellingMethod) -> f64 {
    if text1.is_empty() && text2.is_empty() {
        return 0.0;
    }
    if text1.is_empty() || text2.is_empty() {
        return 1.0;
    }

    match method {
        SpellingMethod::SymmetricDifference => word_difference_ratio(text1, text2),
        SpellingMethod::Levenshtein => levenshtein_ratio(text1, text2),
        SpellingMethod::SequenceMatcher => sequence_matcher_ratio(text1, text2),
    }
}

/// Word-set comparison between two normalized texts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSetDiff {
    /// Words only in the first text
    pub only_left: usize,
    /// Words only in the second text
    pub only_right: usize,
    /// Words present in both
    pub shared: usize,
}

impl WordSetDiff {
    pub fn between(text1: &str, text2: &str) -> Self {
        let norm1 = normalize_text(text1);
        let norm2 = normalize_text(text2);
        let words1: HashSet<&str> = norm1.split_whitespace().collect();
        let words2: HashSet<&str> = norm2.split_whitespace().collect();

        let shared = words1.intersection(&words2).count();
        Self {
            only_left: words1.len() - shared,
            only_right: words2.len() - shared,
            shared,
        }
    }

    /// Size of the symmetric difference (words present in exactly one text)
    pub fn symmetric_difference(&self) -> usize {
        self.only_left + self.only_right
    }

    /// Size of the larger word set
    pub fn larger_set(&self) -> usize {
        (self.only_left + self.shared).max(self.only_right + self.shared)
    }

    /// Differing words over the larger set size.
    ///
    /// A word swapped for another shows up on both sides of the symmetric
    /// difference; it is counted once, so the numerator is the larger of
    /// the two one-sided differences. Keeps the ratio within [0, 1].
    pub fn ratio(&self) -> f64 {
        let larger = self.larger_set();
        if larger == 0 {
            return 0.0;
        }
        self.only_left.max(self.only_right) as f64 / larger as f64
    }
}

fn word_difference_ratio(text1: &str, text2: &str) -> f64 {
    WordSetDiff::between(text1, text2).ratio()
}

// Same algorithm as sequence_matcher; the name is kept for ledgers that
// already recorded it.
fn levenshtein_ratio(text1: &str, text2: &str) -> f64 {
    1.0 - matching_blocks_ratio(&normalize_text(text1), &normalize_text(text2))
}

fn sequence_matcher_ratio(text1: &str, text2: &str) -> f64 {
    1.0 - matching_blocks_ratio(&normalize_text(text1), &normalize_text(text2))
}

/// Ratcliff/Obershelp similarity: `2 * M / (len_a + len_b)` where `M` is the
/// number of characters in recursively found longest matching blocks.
pub fn matching_blocks_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = matching_characters(&a, &b);
    2.0 * matches as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    // Explicit stack of (a_lo, a_hi, b_lo, b_hi) ranges still to search
    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut matches = 0;

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matches += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matches
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    // run[j + 1] = length of the match ending at a[i - 1], b[j]
    let mut prev = vec![0usize; b_hi - b_lo + 1];

    for i in a_lo..a_hi {
        let mut current = vec![0usize; b_hi - b_lo + 1];
        for j in b_lo..b_hi {
            if a[i] == b[j] {
                let k = prev[j - b_lo] + 1;
                current[j - b_lo + 1] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        prev = current;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello,   World! "), "hello world");
        assert_eq!(normalize_text("(It's) \"quoted\" [x] {y} <z>;:?"), "its quoted x y z");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("tabs\tand\nnewlines"), "tabs and newlines");
    }

    #[test]
    fn test_identical_texts() {
        for method in SpellingMethod::all() {
            assert_eq!(spelling_error_ratio("The cat sits", "The cat sits", method), 0.0);
            assert_eq!(spelling_error_ratio("Bonjour", "Bonjour", method), 0.0);
        }
    }

    #[test]
    fn test_empty_inputs() {
        for method in SpellingMethod::all() {
            assert_eq!(spelling_error_ratio("", "", method), 0.0);
            assert_eq!(spelling_error_ratio("a", "", method), 1.0);
            assert_eq!(spelling_error_ratio("", "a", method), 1.0);
        }
    }

    #[test]
    fn test_punctuation_only_inputs() {
        let method = SpellingMethod::SymmetricDifference;
        assert_eq!(spelling_error_ratio("...", "!!!", method), 0.0);
        assert_eq!(spelling_error_ratio("...", "!!!", SpellingMethod::SequenceMatcher), 0.0);
    }

    #[test]
    fn test_documented_example() {
        let ratio = spelling_error_ratio(
            "The cat sits",
            "The dog runs",
            SpellingMethod::SymmetricDifference,
        );
        assert!((ratio - 2.0 / 3.0).abs() < EPS);
        assert_eq!(format!("{:.4}", ratio), "0.6667");
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let ratio = spelling_error_ratio(
            "The cat sits on the mat.",
            "the CAT sits, on the mat",
            SpellingMethod::SymmetricDifference,
        );
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn test_symmetric_difference_is_symmetric() {
        let pairs = [
            ("The cat sits on the mat.", "A feline rests on the rug."),
            ("I love programming in Python.", "Python programming is something I enjoy."),
            ("one", "one two three four five"),
        ];
        for (a, b) in pairs {
            let forward = spelling_error_ratio(a, b, SpellingMethod::SymmetricDifference);
            let backward = spelling_error_ratio(b, a, SpellingMethod::SymmetricDifference);
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn test_ratio_stays_in_unit_interval() {
        // Disjoint sets of unequal size: raw |A xor B| / max would be 6/5
        let ratio = spelling_error_ratio(
            "alpha",
            "one two three four five",
            SpellingMethod::SymmetricDifference,
        );
        assert_eq!(ratio, 1.0);

        let pairs = [
            ("The weather is nice today.", "I ate pizza for dinner."),
            ("a b c", "a b c d e f g"),
            ("x", "x y"),
        ];
        for (a, b) in pairs {
            for method in SpellingMethod::all() {
                let ratio = spelling_error_ratio(a, b, method);
                assert!((0.0..=1.0).contains(&ratio), "{} out of range for {}", ratio, method);
            }
        }
    }

    #[test]
    fn test_word_set_diff_counts() {
        let diff = WordSetDiff::between("The cat sits", "The dog runs");
        assert_eq!(diff.shared, 1);
        assert_eq!(diff.symmetric_difference(), 4);
        assert_eq!(diff.larger_set(), 3);

        // Duplicated words collapse into the set
        let diff = WordSetDiff::between("the the the cat", "the cat");
        assert_eq!(diff.symmetric_difference(), 0);
        assert_eq!(diff.ratio(), 0.0);
    }

    #[test]
    fn test_matching_blocks_ratio() {
        assert_eq!(matching_blocks_ratio("", ""), 1.0);
        assert_eq!(matching_blocks_ratio("abc", ""), 0.0);
        assert_eq!(matching_blocks_ratio("abcd", "abcd"), 1.0);
        // "abcd" vs "bcde": longest block "bcd" -> 2 * 3 / 8
        assert!((matching_blocks_ratio("abcd", "bcde") - 0.75).abs() < EPS);
        // Blocks on both sides of the longest match are found
        // "xabcy" vs "xqabcqy": x + abc + y = 5 -> 10 / 12
        assert!((matching_blocks_ratio("xabcy", "xqabcqy") - 10.0 / 12.0).abs() < EPS);
    }

    #[test]
    fn test_character_methods_agree() {
        let a = "The cat sits on the mat.";
        let b = "A cat is sitting on a mat";
        let seq = spelling_error_ratio(a, b, SpellingMethod::SequenceMatcher);
        let lev = spelling_error_ratio(a, b, SpellingMethod::Levenshtein);
        assert_eq!(seq, lev);
        assert!(seq > 0.0 && seq < 1.0);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            "symmetric_difference".parse::<SpellingMethod>(),
            Ok(SpellingMethod::SymmetricDifference)
        );
        assert_eq!("levenshtein".parse::<SpellingMethod>(), Ok(SpellingMethod::Levenshtein));
        assert_eq!(
            "sequence_matcher".parse::<SpellingMethod>(),
            Ok(SpellingMethod::SequenceMatcher)
        );
        for method in SpellingMethod::all() {
            assert_eq!(method.name().parse::<SpellingMethod>(), Ok(method));
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        let err = "jaccard".parse::<SpellingMethod>().unwrap_err();
        assert_eq!(
            err,
            MetricsError::UnsupportedMethod {
                method: "jaccard".to_string()
            }
        );
        assert!(err.to_string().contains("jaccard"));
    }
}
