// ABOUTME: Weighted token fuzzy matching for picking the best external food record
// ABOUTME: Tolerates word reordering and partial overlap, unlike a plain edit distance
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Fuzzy Match Selection
//!
//! Ranks candidate record names against a free-text query with a weighted
//! ratio: the best of the full-string ratio, a token-sort ratio, and a
//! token-set ratio, with a partial-window ratio mixed in when the strings
//! differ a lot in length. The edit-distance primitive comes from `strsim`;
//! token handling lives here. Scores range 0-100.

use std::collections::BTreeSet;

/// Matches scoring below this are not considered viable
const SCORE_CUTOFF: f64 = 30.0;
/// Token-based ratios are slightly discounted against the full-string ratio
const TOKEN_SCALE: f64 = 0.95;

/// One ranked match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    /// The candidate name that matched
    pub name: String,
    /// Index of the candidate in the original list
    pub index: usize,
    /// Weighted similarity score, 0-100
    pub score: f64,
}

/// Rank `candidates` against `query`, best first, keeping at most `limit`
///
/// Candidates scoring at or below the viability cutoff are dropped; an empty
/// candidate list or no viable match returns an empty vec. Callers should
/// then degrade to the first candidate in original order rather than failing
/// the lookup.
#[must_use]
pub fn best_match(query: &str, candidates: &[String], limit: usize) -> Vec<MatchScore> {
    let mut scored: Vec<MatchScore> = candidates
        .iter()
        .enumerate()
        .map(|(index, name)| MatchScore {
            name: name.clone(),
            index,
            score: weighted_ratio(query, name),
        })
        .filter(|m| m.score > SCORE_CUTOFF)
        .collect();

    // Descending by score, original order breaking ties
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    scored.truncate(limit);
    scored
}

/// Weighted similarity of two strings, 0-100
#[must_use]
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let a_proc = process(a);
    let b_proc = process(b);
    if a_proc.is_empty() || b_proc.is_empty() {
        return 0.0;
    }

    let full = ratio(&a_proc, &b_proc);
    let token_sort = token_sort_ratio(&a_proc, &b_proc);
    let token_set = token_set_ratio(&a_proc, &b_proc);

    let (shorter, longer) = if a_proc.len() <= b_proc.len() {
        (&a_proc, &b_proc)
    } else {
        (&b_proc, &a_proc)
    };
    #[allow(clippy::cast_precision_loss)] // String lengths are far below 2^52
    let len_ratio = longer.len() as f64 / shorter.len() as f64;

    if len_ratio < 1.5 {
        full.max(token_sort * TOKEN_SCALE)
            .max(token_set * TOKEN_SCALE)
    } else {
        // Length-skewed pair: the query is likely a fragment of the candidate
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        full.max(partial_ratio(shorter, longer) * partial_scale)
            .max(token_sort * TOKEN_SCALE * partial_scale)
            .max(token_set * TOKEN_SCALE * partial_scale)
    }
}

/// Lowercase and collapse to alphanumeric tokens joined by single spaces
fn process(s: &str) -> String {
    tokens(s).join(" ")
}

fn tokens(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Plain normalized edit-distance ratio, 0-100
fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Ratio over the two strings with their tokens sorted
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut ta = tokens(a);
    let mut tb = tokens(b);
    ta.sort();
    tb.sort();
    ratio(&ta.join(" "), &tb.join(" "))
}

/// Ratio built around the token intersection, so extra words on either side
/// cost little
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let sa: BTreeSet<String> = tokens(a).into_iter().collect();
    let sb: BTreeSet<String> = tokens(b).into_iter().collect();

    let intersection: Vec<&String> = sa.intersection(&sb).collect();
    let only_a: Vec<&String> = sa.difference(&sb).collect();
    let only_b: Vec<&String> = sb.difference(&sa).collect();

    let base = join(&intersection);
    let combined_a = join_with_base(&base, &only_a);
    let combined_b = join_with_base(&base, &only_b);

    ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// Best window of `longer` compared against all of `shorter`
fn partial_ratio(shorter: &str, longer: &str) -> f64 {
    let short_chars: Vec<char> = shorter.chars().collect();
    let long_chars: Vec<char> = longer.chars().collect();
    if short_chars.len() >= long_chars.len() {
        return ratio(shorter, longer);
    }

    let window = short_chars.len();
    let mut best: f64 = 0.0;
    for start in 0..=(long_chars.len() - window) {
        let slice: String = long_chars[start..start + window].iter().collect();
        best = best.max(ratio(shorter, &slice));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn join(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_with_base(base: &str, rest: &[&String]) -> String {
    let tail = join(rest);
    match (base.is_empty(), tail.is_empty()) {
        (_, true) => base.to_owned(),
        (true, false) => tail,
        (false, false) => format!("{base} {tail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_exact_match_scores_highest() {
        let candidates = names(&["chicken curry", "beef stew", "chicken soup"]);
        let matches = best_match("chicken curry", &candidates, 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 0);
        assert!(matches[0].score > 99.0);
    }

    #[test]
    fn test_word_reordering_still_ranks_first() {
        let candidates = names(&["curry chicken with rice", "beef stew", "fish tacos"]);
        let matches = best_match("chicken curry", &candidates, 1);
        assert_eq!(matches[0].index, 0);
        assert!(matches[0].score > 70.0);
    }

    #[test]
    fn test_partial_overlap_against_long_candidate() {
        let candidates = names(&[
            "Chicken, breast, meat only, cooked, roasted",
            "Beef, ground, 80% lean",
        ]);
        let matches = best_match("chicken breast", &candidates, 1);
        assert_eq!(matches[0].index, 0);
    }

    #[test]
    fn test_empty_candidates_returns_empty() {
        assert!(best_match("anything", &[], 3).is_empty());
    }

    #[test]
    fn test_garbage_query_returns_empty() {
        let candidates = names(&["chicken curry", "beef stew"]);
        assert!(best_match("zzzzqqqq", &candidates, 1).is_empty());
    }

    #[test]
    fn test_limit_caps_results() {
        let candidates = names(&["pasta bolognese", "pasta carbonara", "pasta pesto"]);
        let matches = best_match("pasta", &candidates, 2);
        assert_eq!(matches.len(), 2);
    }
}
