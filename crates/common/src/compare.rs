//! Tolerant comparison of observations taken from different sources.
//!
//! Hybrid scenarios read the same fact twice: once from a REST API and once
//! from the rendered page. The two sides drift in formatting (truncation,
//! punctuation, thousands separators, `k`/`m` suffixes, counter lag), so
//! strict equality would flake on cosmetic changes. The comparators here
//! absorb that drift within explicit, configurable bounds.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

/// Policy for tolerant text comparison.
///
/// The defaults carry the empirically chosen values; none of the specific
/// numbers is load-bearing beyond reducing false failures, and every caller
/// may override them per comparison.
#[derive(Debug, Clone)]
pub struct TextTolerance {
    /// Minimum length of an alphabetic run to count as a token.
    pub min_token_len: usize,
    /// Only the first N distinct tokens of the reference participate.
    pub max_tokens: usize,
    /// Required hits scale as `ceil(tokens / divisor)`.
    pub divisor: usize,
    /// Small token sets never require more hits than this cap.
    pub min_hits_cap: usize,
}

impl Default for TextTolerance {
    fn default() -> Self {
        Self {
            min_token_len: 4,
            max_tokens: 8,
            divisor: 3,
            min_hits_cap: 2,
        }
    }
}

/// Outcome of a tolerant text comparison, with enough detail to diagnose a
/// miss without re-running.
#[derive(Debug, Clone, Serialize)]
pub struct TextVerdict {
    pub equivalent: bool,
    pub reference: String,
    pub observed: String,
    pub tokens: Vec<String>,
    pub hits: usize,
    pub needed: usize,
}

/// Lowercase, collapse whitespace runs to a single space, trim ends.
pub fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct alphabetic runs of at least `min_len` characters, lowercased,
/// deduplicated in first-seen order, capped at `max_tokens`.
pub fn description_tokens(input: &str, policy: &TextTolerance) -> Vec<String> {
    let re = Regex::new(r"[a-zA-Z]+").expect("static token pattern");
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for m in re.find_iter(input) {
        let t = m.as_str().to_lowercase();
        if t.len() >= policy.min_token_len && seen.insert(t.clone()) {
            tokens.push(t);
            if tokens.len() >= policy.max_tokens {
                break;
            }
        }
    }
    tokens
}

/// Decide whether two independently-sourced strings describe the same fact.
///
/// Equivalent when, after normalization, either side of the pair satisfies:
/// the reference is empty (nothing to verify), the strings are identical,
/// the observed string contains the reference, or the count of shared
/// distinct tokens reaches the policy threshold.
pub fn text_equivalent(reference: &str, observed: &str, policy: &TextTolerance) -> TextVerdict {
    let reference = normalize(reference);
    let observed = normalize(observed);

    if reference.is_empty() {
        return TextVerdict {
            equivalent: true,
            reference,
            observed,
            tokens: vec![],
            hits: 0,
            needed: 0,
        };
    }

    let tokens = description_tokens(&reference, policy);
    let hits = tokens.iter().filter(|t| observed.contains(t.as_str())).count();
    let needed = required_hits(tokens.len(), policy);

    let equivalent =
        observed == reference || observed.contains(&reference) || (needed > 0 && hits >= needed);

    TextVerdict {
        equivalent,
        reference,
        observed,
        tokens,
        hits,
        needed,
    }
}

/// Threshold for token overlap: `ceil(n / divisor)`, lifted to the hits cap
/// once enough tokens exist, and never more than the token count itself.
fn required_hits(token_count: usize, policy: &TextTolerance) -> usize {
    if token_count == 0 {
        return 0;
    }
    let scaled = token_count.div_ceil(policy.divisor);
    scaled.max(policy.min_hits_cap.min(token_count))
}

/// Policy for tolerant numeric comparison.
#[derive(Debug, Clone, Copy)]
pub struct CountTolerance {
    /// Absolute floor on the allowed delta.
    pub floor: u64,
    /// Relative band as a fraction of the reference value.
    pub relative: f64,
}

impl Default for CountTolerance {
    fn default() -> Self {
        Self {
            floor: 1_000,
            relative: 0.30,
        }
    }
}

impl CountTolerance {
    /// The larger of the absolute floor and the relative band.
    pub fn allowed_delta(&self, reference: u64) -> u64 {
        let relative = (self.relative * reference as f64).round() as u64;
        self.floor.max(relative)
    }
}

/// Parse a UI-displayed count such as `"12,345"`, `"104k"`, or `"1.2m"`.
///
/// Unparseable input yields `None`, never zero; a missing observation must
/// surface as a skipped check rather than a phantom value.
pub fn parse_count(s: &str) -> Option<u64> {
    let t = s.trim().to_lowercase().replace(',', "");
    if t.is_empty() {
        return None;
    }
    let (digits, multiplier) = match t.strip_suffix('k') {
        Some(rest) => (rest.trim_end(), 1_000.0),
        None => match t.strip_suffix('m') {
            Some(rest) => (rest.trim_end(), 1_000_000.0),
            None => (t.as_str(), 1.0),
        },
    };
    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

/// Two counts agree when their absolute difference stays within the policy
/// band around the reference value.
pub fn counts_equivalent(reference: u64, observed: u64, policy: &CountTolerance) -> bool {
    reference.abs_diff(observed) <= policy.allowed_delta(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn normalize_squeezes_and_lowercases() {
        assert_eq!(normalize("  Fast\t Web \n Testing "), "fast web testing");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn empty_reference_is_vacuously_equivalent() {
        let v = text_equivalent("", "anything at all", &TextTolerance::default());
        assert!(v.equivalent);
        let v = text_equivalent("   ", "anything", &TextTolerance::default());
        assert!(v.equivalent);
    }

    #[test]
    fn identical_after_normalization_is_equivalent() {
        let v = text_equivalent(
            "A Fast  Web testing FRAMEWORK",
            "a fast web testing framework",
            &TextTolerance::default(),
        );
        assert!(v.equivalent);
    }

    #[test]
    fn containment_is_equivalent() {
        let v = text_equivalent(
            "reliable end-to-end testing",
            "Playwright enables reliable end-to-end testing for modern apps.",
            &TextTolerance::default(),
        );
        assert!(v.equivalent);
    }

    #[test]
    fn token_overlap_meets_threshold() {
        // Tokens of length >= 4: fast, testing, framework. Needed: 2 of 3.
        let v = text_equivalent(
            "a fast web testing framework",
            "framework for testing web apps quickly",
            &TextTolerance::default(),
        );
        assert_eq!(v.tokens, vec!["fast", "testing", "framework"]);
        assert_eq!(v.needed, 2);
        assert!(v.hits >= v.needed);
        assert!(v.equivalent);
    }

    #[test]
    fn insufficient_overlap_is_not_equivalent() {
        let v = text_equivalent(
            "distributed consensus replication protocol implementation",
            "a recipe blog about sourdough bread",
            &TextTolerance::default(),
        );
        assert!(!v.equivalent);
        assert_eq!(v.hits, 0);
    }

    #[test_case(1, 1; "single token needs itself")]
    #[test_case(2, 2; "two tokens need both")]
    #[test_case(3, 2; "three tokens need two")]
    #[test_case(6, 2; "six tokens need two")]
    #[test_case(8, 3; "eight tokens scale past the cap")]
    fn required_hits_scaling(tokens: usize, needed: usize) {
        assert_eq!(required_hits(tokens, &TextTolerance::default()), needed);
    }

    #[test]
    fn tokens_are_distinct_ordered_and_capped() {
        let policy = TextTolerance::default();
        let tokens = description_tokens(
            "alpha beta alpha gamma delta epsilon zeta theta iota kappa",
            &policy,
        );
        assert_eq!(tokens.len(), policy.max_tokens);
        assert_eq!(tokens[0], "alpha");
        assert_eq!(tokens.iter().filter(|t| *t == "alpha").count(), 1);
    }

    #[test_case("123", Some(123))]
    #[test_case("12,345", Some(12_345))]
    #[test_case("104k", Some(104_000))]
    #[test_case("1.2m", Some(1_200_000))]
    #[test_case("3.5K", Some(3_500))]
    #[test_case("  42 ", Some(42))]
    #[test_case("", None)]
    #[test_case("n/a", None)]
    #[test_case("-5", None)]
    fn parse_count_cases(input: &str, expected: Option<u64>) {
        assert_eq!(parse_count(input), expected);
    }

    #[test]
    fn count_band_uses_larger_of_floor_and_relative() {
        let policy = CountTolerance {
            floor: 1_000,
            relative: 0.3,
        };
        // delta 290 <= max(1000, 300)
        assert!(counts_equivalent(1_000, 1_290, &policy));
        // delta 1500 > max(1000, 300)
        assert!(!counts_equivalent(1_000, 2_500, &policy));
        // Large reference: relative band dominates the floor.
        assert!(counts_equivalent(100_000, 125_000, &policy));
        assert!(!counts_equivalent(100_000, 140_000, &policy));
    }
}
