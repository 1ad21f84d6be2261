//! Feature extraction for NAP matching.
//!
//! Provides the pure functions the field matchers are built on:
//! - Text normalization (shared by the name and address paths)
//! - Phone normalization (digits only, national-number suffix)
//! - Sequence similarity (Ratcliff-Obershelp gestalt ratio)

/// Normalize free text for comparison.
///
/// Lowercases, replaces every character that is not a letter, digit, or
/// whitespace with a space, collapses whitespace runs, and trims. Empty
/// input and the literal "nan" (the upstream CSV null artifact) yield
/// an empty string.
///
/// Both the name and address matchers call this same function; their
/// similarity scores are only comparable because the normalization is
/// identical on both paths.
pub fn normalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }

    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a raw phone string to its comparable digit form.
///
/// Strips every non-digit character. If more than 10 digits remain,
/// only the last 10 are kept (a trailing national number; country code
/// and prefixes are discarded). Shorter digit strings pass through
/// unchanged, no length validation.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 10 {
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}

/// Sequence similarity ratio in [0, 1] between two strings.
///
/// Returns 0.0 if either input is empty. Otherwise both sides are
/// lowercased and trimmed (inputs may bypass normalization) and scored
/// with the Ratcliff-Obershelp gestalt ratio: twice the total length of
/// the recursively-found longest common blocks, divided by the summed
/// lengths. Character-based. The match thresholds downstream are
/// calibrated against this exact metric; edit distance or token overlap
/// would shift the match boundaries.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.trim().to_lowercase().chars().collect();
    let b: Vec<char> = b.trim().to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total length of the gestalt matching blocks: the longest common
/// contiguous block, plus (recursively) the matches to its left and to
/// its right.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Longest common contiguous block of `a` and `b` as
/// (start_in_a, start_in_b, length), earliest occurrence on ties.
/// Two-row DP over common-suffix lengths.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        for j in 0..b.len() {
            if a[i] == b[j] {
                curr[j + 1] = prev[j] + 1;
                if curr[j + 1] > best.2 {
                    best = (i + 1 - curr[j + 1], j + 1 - curr[j + 1], curr[j + 1]);
                }
            } else {
                curr[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
