//! Optimal match sequence search.
//!
//! Walks the password prefix by prefix, maintaining for every end index the
//! best known cover of each achievable length. The attacker-work objective
//! for a length-`l` cover with per-match guesses `p_1..p_l` is
//!
//! ```text
//! g(l) = l! * (p_1 * ... * p_l) + MIN_GUESSES_BEFORE_GROWING_SEQUENCE^(l-1)
//! ```
//!
//! The factorial prices not knowing the pattern order; the additive term
//! prices trying all shorter covers first and is dropped when
//! `exclude_additive` is set. Gaps between producer matches are filled with
//! synthesized brute-force matches, never two adjacent ones.

use std::collections::BTreeMap;

use patterns::{KeyboardGraphs, Match, MatchPattern};
use serde::{Deserialize, Serialize};

use crate::combinatorics::factorial;
use crate::config::{ScoringConfig, MIN_GUESSES_BEFORE_GROWING_SEQUENCE};
use crate::error::ScoringError;
use crate::estimate::estimate_guesses;

/// The minimum-work non-overlapping cover selected for a password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredSequence {
    /// The scored password.
    pub password: String,
    /// Total attacker work for the selected cover.
    pub guesses: f64,
    /// `log10(guesses)`.
    pub guesses_log10: f64,
    /// The selected matches, in order, covering the whole password.
    pub sequence: Vec<Match>,
}

/// Best known cover of one length ending at a fixed prefix index.
#[derive(Debug, Clone)]
struct OptimalEntry {
    /// Terminal match of the cover.
    terminal: Match,
    /// Product of per-match guesses across the cover.
    product: f64,
    /// Total attacker work, factorial term plus optional additive penalty.
    work: f64,
}

/// Per-prefix sparse tables: index `k` maps cover length to its best entry.
type OptimalTable = Vec<BTreeMap<usize, OptimalEntry>>;

pub(crate) fn optimal_sequence(
    password: &str,
    matches: Vec<Match>,
    graphs: &KeyboardGraphs,
    config: &ScoringConfig,
) -> Result<ScoredSequence, ScoringError> {
    let chars: Vec<char> = password.chars().collect();
    let n = chars.len();
    if n == 0 {
        return Ok(ScoredSequence {
            password: String::new(),
            guesses: 1.0,
            guesses_log10: 0.0,
            sequence: Vec::new(),
        });
    }

    for m in &matches {
        m.validate(password)?;
    }

    // bucket matches by end index, earlier starts first
    let mut by_end: Vec<Vec<Match>> = vec![Vec::new(); n];
    for m in matches {
        by_end[m.j].push(m);
    }
    for bucket in &mut by_end {
        bucket.sort_by_key(|m| m.i);
    }

    let mut optimal: OptimalTable = vec![BTreeMap::new(); n];

    for k in 0..n {
        let bucket = std::mem::take(&mut by_end[k]);
        for mut m in bucket {
            let guesses = estimate_guesses(&mut m, n, graphs, config)?;
            if m.i > 0 {
                // extend every surviving cover that ends just before this match
                let predecessors: Vec<(usize, f64)> = optimal[m.i - 1]
                    .iter()
                    .map(|(&l, entry)| (l, entry.product))
                    .collect();
                for (l, prev_product) in predecessors {
                    update(&m, guesses, l + 1, Some(prev_product), &mut optimal, config);
                }
            } else {
                update(&m, guesses, 1, None, &mut optimal, config);
            }
        }
        bruteforce_update(k, &chars, n, graphs, config, &mut optimal)?;
    }

    let sequence = unwind(&optimal, n);
    let guesses = optimal[n - 1]
        .values()
        .map(|entry| entry.work)
        .fold(f64::INFINITY, f64::min);
    Ok(ScoredSequence {
        password: password.to_string(),
        guesses,
        guesses_log10: guesses.log10(),
        sequence,
    })
}

/// Consider a length-`l` cover ending with `m`. The candidate is recorded
/// only if no shorter-or-equal cover at the same end index is already at
/// least as cheap; `terminal`, `product` and `work` are written together
/// after that decision.
fn update(
    m: &Match,
    guesses: f64,
    l: usize,
    prev_product: Option<f64>,
    optimal: &mut OptimalTable,
    config: &ScoringConfig,
) {
    let k = m.j;
    let product = guesses * prev_product.unwrap_or(1.0);
    let mut work = factorial(l) * product;
    if !config.exclude_additive {
        work += MIN_GUESSES_BEFORE_GROWING_SEQUENCE.powi((l - 1) as i32);
    }
    for entry in optimal[k].range(..=l).map(|(_, entry)| entry) {
        if entry.work <= work {
            return;
        }
    }
    optimal[k].insert(
        l,
        OptimalEntry {
            terminal: m.clone(),
            product,
            work,
        },
    );
}

/// Fill the gap ending at `k` with synthesized brute-force matches: one
/// covering the whole prefix, and one per start position extending every
/// surviving cover whose terminal match is not itself brute force. The
/// restriction keeps two adjacent brute-force matches out, since a single
/// longer one always covers them.
fn bruteforce_update(
    k: usize,
    chars: &[char],
    password_len: usize,
    graphs: &KeyboardGraphs,
    config: &ScoringConfig,
    optimal: &mut OptimalTable,
) -> Result<(), ScoringError> {
    let mut whole = make_bruteforce_match(chars, 0, k);
    let guesses = estimate_guesses(&mut whole, password_len, graphs, config)?;
    update(&whole, guesses, 1, None, optimal, config);

    for i in 1..=k {
        let mut m = make_bruteforce_match(chars, i, k);
        let guesses = estimate_guesses(&mut m, password_len, graphs, config)?;
        let predecessors: Vec<(usize, f64)> = optimal[i - 1]
            .iter()
            .filter(|(_, entry)| !matches!(entry.terminal.pattern, MatchPattern::Bruteforce))
            .map(|(&l, entry)| (l, entry.product))
            .collect();
        for (l, prev_product) in predecessors {
            update(&m, guesses, l + 1, Some(prev_product), optimal, config);
        }
    }
    Ok(())
}

fn make_bruteforce_match(chars: &[char], i: usize, j: usize) -> Match {
    let token: String = chars[i..=j].iter().collect();
    Match::new(i, j, token, MatchPattern::Bruteforce)
}

/// Walk back from the cheapest cover at the final index, collecting the
/// terminal match of each shorter prefix on the way.
fn unwind(optimal: &OptimalTable, n: usize) -> Vec<Match> {
    let mut sequence = Vec::new();
    let (mut l, _) = optimal[n - 1]
        .iter()
        .fold(None::<(usize, f64)>, |best, (&l, entry)| match best {
            Some((_, work)) if work <= entry.work => best,
            _ => Some((l, entry.work)),
        })
        .expect("brute-force fill leaves an entry at every index");

    let mut k = n as isize - 1;
    while k >= 0 {
        let entry = &optimal[k as usize][&l];
        k = entry.terminal.i as isize - 1;
        l -= 1;
        sequence.push(entry.terminal.clone());
    }
    sequence.reverse();
    sequence
}
