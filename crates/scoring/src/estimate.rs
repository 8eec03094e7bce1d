//! Per-pattern guess estimators.
//!
//! Each pattern kind encodes a distinct model of how an informed attacker
//! enumerates that kind of token: dictionary matches cost their rank times
//! capitalization and substitution variations, keyboard walks cost the
//! number of same-length walks with up to the observed number of turns,
//! dates cost a year window times the days of a year, and so on.
//!
//! [`estimate_guesses`] dispatches on the pattern tag, applies the submatch
//! floor, and memoizes the result on the match's output slots.

use std::collections::BTreeMap;

use patterns::{KeyboardGraphs, Match, MatchPattern, PatternError, RegexClass};

use crate::combinatorics::{average_degree, n_choose_k};
use crate::config::{
    ScoringConfig, BRUTEFORCE_CARDINALITY, MIN_SUBMATCH_GUESSES_MULTI_CHAR,
    MIN_SUBMATCH_GUESSES_SINGLE_CHAR, MIN_YEAR_SPACE,
};
use crate::error::ScoringError;

/// Estimate the guesses for one match, writing the result back onto it.
///
/// Memoized: a match whose `guesses` slot is already filled is returned
/// unchanged. The raw per-pattern estimate is floored at the submatch
/// minimum when the token does not cover the whole password.
pub(crate) fn estimate_guesses(
    m: &mut Match,
    password_len: usize,
    graphs: &KeyboardGraphs,
    config: &ScoringConfig,
) -> Result<f64, ScoringError> {
    if let Some(guesses) = m.guesses {
        return Ok(guesses);
    }

    let token_len = m.token_len();
    let raw = match &m.pattern {
        MatchPattern::Bruteforce => bruteforce_guesses(token_len),
        MatchPattern::Dictionary {
            rank,
            reversed,
            l33t,
            sub,
        } => {
            let upper = uppercase_variations(&m.token);
            let leet = l33t_variations(&m.token, *l33t, sub);
            let reversed_factor = if *reversed { 2.0 } else { 1.0 };
            let rank = *rank as f64;
            m.base_guesses = Some(rank);
            m.uppercase_variations = Some(upper);
            m.l33t_variations = Some(leet);
            rank * upper * leet * reversed_factor
        }
        MatchPattern::Spatial {
            graph,
            turns,
            shifted_count,
        } => spatial_guesses(graphs, graph, token_len, *turns, *shifted_count)?,
        MatchPattern::Repeat {
            base_guesses,
            repeat_count,
            ..
        } => *base_guesses * (*repeat_count as f64),
        MatchPattern::Sequence { ascending } => sequence_guesses(&m.token, *ascending, token_len),
        MatchPattern::Regex { class } => regex_guesses(*class, &m.token, token_len, config)?,
        MatchPattern::Date { year, separator } => {
            date_guesses(*year, separator.is_some(), config)
        }
    };

    let guesses = raw.max(min_guesses(token_len, password_len));
    m.guesses = Some(guesses);
    m.guesses_log10 = Some(guesses.log10());
    Ok(guesses)
}

/// Submatch floor: even a recognized token inside a larger password costs
/// some enumeration. A token covering the whole password has no floor.
fn min_guesses(token_len: usize, password_len: usize) -> f64 {
    if token_len < password_len {
        if token_len == 1 {
            MIN_SUBMATCH_GUESSES_SINGLE_CHAR
        } else {
            MIN_SUBMATCH_GUESSES_MULTI_CHAR
        }
    } else {
        1.0
    }
}

fn bruteforce_guesses(token_len: usize) -> f64 {
    let guesses = (BRUTEFORCE_CARDINALITY as f64).powi(token_len as i32);
    let guesses = if guesses.is_finite() {
        guesses
    } else {
        f64::MAX
    };
    // one above the submatch floor, so a same-length produced match always
    // beats raw brute force in the sequence search
    let floor_plus_one = if token_len == 1 {
        MIN_SUBMATCH_GUESSES_SINGLE_CHAR + 1.0
    } else {
        MIN_SUBMATCH_GUESSES_MULTI_CHAR + 1.0
    };
    guesses.max(floor_plus_one)
}

fn sequence_guesses(token: &str, ascending: bool, token_len: usize) -> f64 {
    let base = match token.chars().next() {
        // obvious start and end points of the common alphabets
        Some('a' | 'A' | 'z' | 'Z' | '0' | '1' | '9') => 4.0,
        Some(c) if c.is_ascii_digit() => 10.0,
        _ => 26.0,
    };
    let base = if ascending { base } else { base * 2.0 };
    base * token_len as f64
}

fn regex_guesses(
    class: RegexClass,
    token: &str,
    token_len: usize,
    config: &ScoringConfig,
) -> Result<f64, ScoringError> {
    let cardinality: f64 = match class {
        RegexClass::AlphaLower => 26.0,
        RegexClass::AlphaUpper => 26.0,
        RegexClass::Alpha => 52.0,
        RegexClass::Alphanumeric => 62.0,
        RegexClass::Digits => 10.0,
        RegexClass::Symbols => 33.0,
        RegexClass::RecentYear => {
            let year: i32 = token.parse().map_err(|_| {
                ScoringError::InvalidMatch(PatternError::UnparsableYear {
                    token: token.to_string(),
                })
            })?;
            return Ok(year_space(year, config.reference_year) as f64);
        }
    };
    let guesses = cardinality.powi(token_len as i32);
    Ok(if guesses.is_finite() {
        guesses
    } else {
        f64::MAX
    })
}

fn date_guesses(year: i32, has_separator: bool, config: &ScoringConfig) -> f64 {
    let mut guesses = year_space(year, config.reference_year) as f64 * 365.0;
    if has_separator {
        guesses *= 4.0;
    }
    guesses
}

fn year_space(year: i32, reference_year: i32) -> i32 {
    (year - reference_year).abs().max(MIN_YEAR_SPACE)
}

fn spatial_guesses(
    graphs: &KeyboardGraphs,
    graph_name: &str,
    token_len: usize,
    turns: usize,
    shifted_count: usize,
) -> Result<f64, ScoringError> {
    if !graphs.contains(graph_name) {
        return Err(ScoringError::UnknownGraph {
            name: graph_name.to_string(),
        });
    }
    // keyboards share the qwerty metrics, keypads the keypad metrics
    let family = if graph_name == "qwerty" || graph_name == "dvorak" {
        "qwerty"
    } else {
        "keypad"
    };
    let graph = graphs.get(family).ok_or_else(|| ScoringError::UnknownGraph {
        name: family.to_string(),
    })?;
    let starting_positions = graph.len() as f64;
    let degree = average_degree(graph);

    // sum over all walk lengths up to the token and all turn counts up to
    // the observed number of turns
    let mut guesses = 0.0;
    for i in 2..=token_len {
        let possible_turns = turns.min(i - 1);
        for j in 1..=possible_turns {
            guesses += n_choose_k((i - 1) as u64, (j - 1) as u64) as f64
                * starting_positions
                * degree.powi(j as i32);
        }
    }

    let unshifted = token_len.saturating_sub(shifted_count);
    if shifted_count == 0 || unshifted == 0 {
        // uniformly shifted or unshifted: the only ambiguity is which
        guesses *= 2.0;
    } else {
        let mut shifted_variations = 0.0;
        for i in 1..=shifted_count.min(unshifted) {
            shifted_variations += n_choose_k((shifted_count + unshifted) as u64, i as u64) as f64;
        }
        guesses *= shifted_variations;
    }
    Ok(guesses)
}

/// Ways to capitalize the token that an attacker must try.
pub(crate) fn uppercase_variations(token: &str) -> f64 {
    if token == token.to_lowercase() {
        return 1.0;
    }
    // a common scheme and its inverse: first-letter, last-letter, all-caps
    if starts_upper_only(token) || ends_upper_only(token) || all_upper(token) {
        return 2.0;
    }
    let upper = token.chars().filter(|c| c.is_ascii_uppercase()).count();
    let lower = token.chars().filter(|c| c.is_ascii_lowercase()).count();
    (1..=upper.min(lower))
        .map(|i| n_choose_k((upper + lower) as u64, i as u64) as f64)
        .sum()
}

// ^[A-Z][^A-Z]+$
fn starts_upper_only(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut has_rest = false;
            for c in chars {
                has_rest = true;
                if c.is_ascii_uppercase() {
                    return false;
                }
            }
            has_rest
        }
        _ => false,
    }
}

// ^[^A-Z]+[A-Z]$
fn ends_upper_only(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    match chars.split_last() {
        Some((last, rest)) if last.is_ascii_uppercase() && !rest.is_empty() => {
            rest.iter().all(|c| !c.is_ascii_uppercase())
        }
        _ => false,
    }
}

// ^[^a-z]+$
fn all_upper(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| !c.is_ascii_lowercase())
}

/// Ways to assign the observed l33t substitutions that an attacker must try.
pub(crate) fn l33t_variations(token: &str, l33t: bool, sub: &BTreeMap<char, char>) -> f64 {
    if !l33t {
        return 1.0;
    }
    let lower = token.to_lowercase();
    let mut variations = 1.0;
    for (&subbed, &original) in sub {
        let s = lower.chars().filter(|&c| c == subbed).count();
        let u = lower.chars().filter(|&c| c == original).count();
        if s == 0 || u == 0 {
            // the substitution is total or absent: one bit to decide which
            variations *= 2.0;
        } else {
            let possibilities: f64 = (1..=u.min(s))
                .map(|i| n_choose_k((u + s) as u64, i as u64) as f64)
                .sum();
            variations *= possibilities;
        }
    }
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ScoringConfig {
        ScoringConfig {
            reference_year: 2024,
            exclude_additive: false,
        }
    }

    fn graphs() -> std::sync::Arc<KeyboardGraphs> {
        KeyboardGraphs::standard()
    }

    fn estimate(m: &mut Match, password_len: usize) -> f64 {
        estimate_guesses(m, password_len, &graphs(), &test_config()).expect("estimate")
    }

    fn dictionary(i: usize, j: usize, token: &str, rank: u64) -> Match {
        Match::new(
            i,
            j,
            token,
            MatchPattern::Dictionary {
                rank,
                reversed: false,
                l33t: false,
                sub: BTreeMap::new(),
            },
        )
    }

    // ==================== Memoization & Floor ====================

    #[test]
    fn estimate_is_memoized() {
        let mut m = dictionary(0, 5, "zxcvbn", 7);
        let first = estimate(&mut m, 6);
        let recorded = m.guesses;
        let second = estimate(&mut m, 6);
        assert_eq!(first, second);
        assert_eq!(m.guesses, recorded);
    }

    #[test]
    fn memoized_value_wins_over_recomputation() {
        let mut m = dictionary(0, 5, "zxcvbn", 7);
        m.guesses = Some(123.0);
        assert_eq!(estimate(&mut m, 6), 123.0);
    }

    #[test]
    fn submatch_floor_applies_to_partial_tokens() {
        // rank 1 inside a longer password floors at 50
        let mut m = dictionary(0, 5, "zxcvbn", 1);
        assert_eq!(estimate(&mut m, 20), 50.0);
    }

    #[test]
    fn single_char_submatch_floors_at_ten() {
        let mut m = dictionary(0, 0, "a", 1);
        assert_eq!(estimate(&mut m, 8), 10.0);
    }

    #[test]
    fn full_cover_token_has_no_floor() {
        let mut m = dictionary(0, 5, "zxcvbn", 1);
        assert_eq!(estimate(&mut m, 6), 1.0);
    }

    #[test]
    fn guesses_log10_written_alongside_guesses() {
        let mut m = dictionary(0, 5, "zxcvbn", 100);
        let guesses = estimate(&mut m, 20);
        let log10 = m.guesses_log10.expect("log10 slot");
        assert!((log10 - guesses.log10()).abs() < 1e-9);
    }

    // ==================== Bruteforce ====================

    #[test]
    fn bruteforce_is_cardinality_to_the_length() {
        let mut m = Match::new(0, 3, "xq!7", MatchPattern::Bruteforce);
        assert_eq!(estimate(&mut m, 4), 10_000.0);
    }

    #[test]
    fn bruteforce_single_char_floors_above_submatch_floor() {
        let mut m = Match::new(0, 0, "a", MatchPattern::Bruteforce);
        assert_eq!(estimate(&mut m, 1), 11.0);
    }

    #[test]
    fn bruteforce_single_char_submatch_still_beats_floor() {
        // an embedded 1-char brute-force region sits above the 10 floor
        let mut m = Match::new(2, 2, "x", MatchPattern::Bruteforce);
        assert_eq!(estimate(&mut m, 9), 11.0);
    }

    #[test]
    fn bruteforce_overflow_saturates() {
        let token = "x".repeat(400);
        let mut m = Match::new(0, 399, token, MatchPattern::Bruteforce);
        let guesses = estimate(&mut m, 400);
        assert!(guesses.is_finite());
        assert_eq!(guesses, f64::MAX);
    }

    // ==================== Repeat ====================

    #[test]
    fn repeat_multiplies_base_by_count() {
        let mut m = Match::new(
            0,
            3,
            "aaaa",
            MatchPattern::Repeat {
                base_guesses: 11.0,
                repeat_count: 4,
                base_matches: Vec::new(),
            },
        );
        assert_eq!(estimate(&mut m, 4), 44.0);
    }

    // ==================== Sequence ====================

    #[test]
    fn sequence_obvious_start_uses_base_four() {
        let mut m = Match::new(0, 5, "abcdef", MatchPattern::Sequence { ascending: true });
        assert_eq!(estimate(&mut m, 6), 4.0 * 6.0);
    }

    #[test]
    fn sequence_digit_start_uses_base_ten() {
        let mut m = Match::new(0, 3, "4567", MatchPattern::Sequence { ascending: true });
        assert_eq!(estimate(&mut m, 4), 10.0 * 4.0);
    }

    #[test]
    fn sequence_letter_start_uses_base_twentysix() {
        let mut m = Match::new(0, 3, "jklm", MatchPattern::Sequence { ascending: true });
        assert_eq!(estimate(&mut m, 4), 26.0 * 4.0);
    }

    #[test]
    fn descending_sequence_doubles_base() {
        let mut m = Match::new(0, 3, "mlkj", MatchPattern::Sequence { ascending: false });
        assert_eq!(estimate(&mut m, 4), 52.0 * 4.0);
    }

    // ==================== Regex ====================

    #[test]
    fn regex_class_guesses_are_cardinality_powers() {
        let cases = [
            (RegexClass::AlphaLower, "aizocw", 26f64),
            (RegexClass::AlphaUpper, "AIZOCW", 26f64),
            (RegexClass::Alpha, "aiZoCw", 52f64),
            (RegexClass::Alphanumeric, "a1Z0c9", 62f64),
            (RegexClass::Digits, "736201", 10f64),
            (RegexClass::Symbols, "!@^*)[", 33f64),
        ];
        for (class, token, cardinality) in cases {
            let mut m = Match::new(0, 5, token, MatchPattern::Regex { class });
            assert_eq!(
                estimate(&mut m, 6),
                cardinality.powi(6),
                "class {class:?}"
            );
        }
    }

    #[test]
    fn recent_year_uses_distance_from_reference() {
        let mut m = Match::new(
            0,
            3,
            "1972",
            MatchPattern::Regex {
                class: RegexClass::RecentYear,
            },
        );
        assert_eq!(estimate(&mut m, 4), 52.0); // |1972 - 2024|
    }

    #[test]
    fn recent_year_close_to_reference_floors_at_min_year_space() {
        let mut m = Match::new(
            0,
            3,
            "2020",
            MatchPattern::Regex {
                class: RegexClass::RecentYear,
            },
        );
        assert_eq!(estimate(&mut m, 4), MIN_YEAR_SPACE as f64);
    }

    #[test]
    fn recent_year_with_garbage_token_is_rejected() {
        let mut m = Match::new(
            0,
            3,
            "19xx",
            MatchPattern::Regex {
                class: RegexClass::RecentYear,
            },
        );
        let err = estimate_guesses(&mut m, 4, &graphs(), &test_config())
            .expect_err("garbage year should be rejected");
        assert!(matches!(
            err,
            ScoringError::InvalidMatch(PatternError::UnparsableYear { .. })
        ));
    }

    // ==================== Date ====================

    #[test]
    fn date_guesses_scale_with_year_space() {
        let mut m = Match::new(
            0,
            9,
            "13.08.1972",
            MatchPattern::Date {
                year: 1972,
                separator: Some('.'),
            },
        );
        assert_eq!(estimate(&mut m, 10), 52.0 * 365.0 * 4.0);
    }

    #[test]
    fn date_without_separator_skips_separator_factor() {
        let mut m = Match::new(
            0,
            7,
            "13081972",
            MatchPattern::Date {
                year: 1972,
                separator: None,
            },
        );
        assert_eq!(estimate(&mut m, 8), 52.0 * 365.0);
    }

    #[test]
    fn date_scenario_from_reference_year_2024() {
        let mut m = Match::new(
            0,
            9,
            "2000-01-01",
            MatchPattern::Date {
                year: 2000,
                separator: Some('-'),
            },
        );
        // year_space = max(24, 20) = 24
        assert_eq!(estimate(&mut m, 10), 24.0 * 365.0 * 4.0);
        assert_eq!(estimate(&mut m, 10), 35_040.0);
    }

    // ==================== Spatial ====================

    fn spatial(token: &str, graph: &str, turns: usize, shifted_count: usize) -> Match {
        Match::new(
            0,
            token.chars().count() - 1,
            token,
            MatchPattern::Spatial {
                graph: graph.into(),
                turns,
                shifted_count,
            },
        )
    }

    #[test]
    fn spatial_straight_walk_matches_formula() {
        let graphs = graphs();
        let qwerty = graphs.get("qwerty").expect("qwerty");
        let s = qwerty.len() as f64;
        let d = average_degree(qwerty);

        // turns = 1: every prefix length contributes C(i-1, 0) * S * D
        let expected = 2.0 * (3.0 * s * d);

        let mut m = spatial("qwer", "qwerty", 1, 0);
        let guesses = estimate(&mut m, 4);
        assert!((guesses - expected).abs() < 1e-6, "{guesses} vs {expected}");
    }

    #[test]
    fn spatial_turns_expand_the_walk_space() {
        let mut straight = spatial("qwerdf", "qwerty", 1, 0);
        let mut turned = spatial("qwerdf", "qwerty", 3, 0);
        let straight_guesses = estimate(&mut straight, 6);
        let turned_guesses = estimate(&mut turned, 6);
        assert!(turned_guesses > straight_guesses);
    }

    #[test]
    fn spatial_all_shifted_doubles_like_unshifted() {
        let mut plain = spatial("qwer", "qwerty", 1, 0);
        let mut all_caps = spatial("QWER", "qwerty", 1, 4);
        assert_eq!(estimate(&mut plain, 4), estimate(&mut all_caps, 4));
    }

    #[test]
    fn spatial_partial_shift_uses_binomial_variations() {
        let graphs = graphs();
        let qwerty = graphs.get("qwerty").expect("qwerty");
        let s = qwerty.len() as f64;
        let d = average_degree(qwerty);
        let base = 3.0 * s * d;

        // 1 shifted of 4: C(4,1) = 4 variations
        let mut m = spatial("Qwer", "qwerty", 1, 1);
        let guesses = estimate(&mut m, 4);
        assert!((guesses - base * 4.0).abs() < 1e-6);
    }

    #[test]
    fn dvorak_shares_qwerty_metrics() {
        let mut on_qwerty = spatial("qwer", "qwerty", 1, 0);
        let mut on_dvorak = spatial("qwer", "dvorak", 1, 0);
        assert_eq!(estimate(&mut on_qwerty, 4), estimate(&mut on_dvorak, 4));
    }

    #[test]
    fn keypad_uses_keypad_metrics() {
        let graphs = graphs();
        let keypad = graphs.get("keypad").expect("keypad");
        let s = keypad.len() as f64;
        let d = average_degree(keypad);
        let expected = 2.0 * (2.0 * s * d);

        let mut m = spatial("147", "keypad", 1, 0);
        let guesses = estimate(&mut m, 3);
        assert!((guesses - expected).abs() < 1e-6);
    }

    #[test]
    fn unknown_graph_is_rejected() {
        let mut m = spatial("qwer", "colemak", 1, 0);
        let err = estimate_guesses(&mut m, 4, &graphs(), &test_config())
            .expect_err("unknown graph should be rejected");
        assert!(matches!(err, ScoringError::UnknownGraph { name } if name == "colemak"));
    }

    // ==================== Dictionary ====================

    #[test]
    fn dictionary_base_rank_is_recorded() {
        let mut m = dictionary(0, 5, "zxcvbn", 3210);
        estimate(&mut m, 6);
        assert_eq!(m.base_guesses, Some(3210.0));
        assert_eq!(m.uppercase_variations, Some(1.0));
        assert_eq!(m.l33t_variations, Some(1.0));
    }

    #[test]
    fn reversed_dictionary_doubles() {
        let mut plain = dictionary(0, 5, "nbvcxz", 40);
        if let MatchPattern::Dictionary { reversed, .. } = &mut plain.pattern {
            *reversed = true;
        }
        assert_eq!(estimate(&mut plain, 6), 80.0);
    }

    #[test]
    fn uppercase_variations_all_lower_is_one() {
        assert_eq!(uppercase_variations("password"), 1.0);
        assert_eq!(uppercase_variations("1234"), 1.0);
    }

    #[test]
    fn uppercase_variations_common_schemes_are_two() {
        assert_eq!(uppercase_variations("Password"), 2.0);
        assert_eq!(uppercase_variations("passworD"), 2.0);
        assert_eq!(uppercase_variations("PASSWORD"), 2.0);
        assert_eq!(uppercase_variations("PASSW0RD"), 2.0);
    }

    #[test]
    fn uppercase_variations_mixed_case_counts_combinations() {
        // 2 upper, 4 lower: C(6,1) + C(6,2) = 6 + 15 = 21
        assert_eq!(uppercase_variations("paSSwo"), 21.0);
    }

    #[test]
    fn l33t_variations_off_is_one() {
        assert_eq!(l33t_variations("p4ssword", false, &BTreeMap::new()), 1.0);
    }

    #[test]
    fn l33t_variations_total_substitution_is_two_per_pair() {
        // every 'a' became '4': nothing reveals how many were substituted
        let sub: BTreeMap<char, char> = [('4', 'a')].into_iter().collect();
        assert_eq!(l33t_variations("p4ssw4rd", true, &sub), 2.0);
    }

    #[test]
    fn l33t_variations_partial_substitution_counts_combinations() {
        // one '4' and one 'a': C(2,1) = 2
        let sub: BTreeMap<char, char> = [('4', 'a')].into_iter().collect();
        assert_eq!(l33t_variations("p4ssward", true, &sub), 2.0);
        // one '@' and three 'a': C(4,1) = 4
        let sub: BTreeMap<char, char> = [('@', 'a')].into_iter().collect();
        assert_eq!(l33t_variations("@banana", true, &sub), 4.0);
    }

    #[test]
    fn l33t_variations_multiply_across_pairs() {
        let sub: BTreeMap<char, char> = [('4', 'a'), ('0', 'o')].into_iter().collect();
        // both substitutions total: 2 * 2
        assert_eq!(l33t_variations("p4ssw0rd", true, &sub), 4.0);
    }

    #[test]
    fn l33t_dictionary_combines_factors() {
        let mut m = Match::new(
            0,
            7,
            "P4ssword",
            MatchPattern::Dictionary {
                rank: 10,
                reversed: false,
                l33t: true,
                sub: [('4', 'a')].into_iter().collect(),
            },
        );
        // rank 10 * uppercase 2 * l33t 2
        assert_eq!(estimate(&mut m, 8), 40.0);
        assert_eq!(m.uppercase_variations, Some(2.0));
        assert_eq!(m.l33t_variations, Some(2.0));
    }
}
