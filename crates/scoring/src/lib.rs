//! Guess estimation for password matches.
//!
//! Given a password and a set of overlapping candidate [`Match`]es, this
//! crate computes how much work an informed attacker needs to cover the
//! password:
//!
//! 1. **Per-pattern estimators** map each match to a guess count using the
//!    combinatorial model of its pattern kind (dictionary rank and
//!    variations, keyboard-walk counting, date windows, ...).
//! 2. **Optimal sequence search** finds the non-overlapping cover of the
//!    password minimizing total attacker work, filling unexplained gaps
//!    with brute force.
//!
//! The crate is pure and single-threaded per call: no I/O, no global
//! mutable state, deterministic for a fixed [`ScoringConfig`]. The only
//! wall-clock input is the default reference year; pin it in the config
//! for reproducible results.
//!
//! ## Quick example
//!
//! ```
//! use patterns::{Match, MatchPattern};
//! use scoring::{Scorer, ScoringConfig};
//!
//! let m = Match::new(
//!     0,
//!     5,
//!     "zxcvbn",
//!     MatchPattern::Dictionary {
//!         rank: 1,
//!         reversed: false,
//!         l33t: false,
//!         sub: Default::default(),
//!     },
//! );
//!
//! let scorer = Scorer::new(ScoringConfig::default());
//! let result = scorer
//!     .most_guessable_match_sequence("zxcvbn", vec![m])
//!     .unwrap();
//!
//! assert_eq!(result.sequence.len(), 1);
//! assert!(result.guesses < 10.0);
//! ```

mod combinatorics;
mod config;
mod error;
mod estimate;
mod metrics;
mod search;

use std::sync::Arc;
use std::time::Instant;

use patterns::{KeyboardGraphs, Match};

pub use crate::combinatorics::{average_degree, factorial, n_choose_k};
pub use crate::config::{
    ScoringConfig, BRUTEFORCE_CARDINALITY, MIN_GUESSES_BEFORE_GROWING_SEQUENCE,
    MIN_SUBMATCH_GUESSES_MULTI_CHAR, MIN_SUBMATCH_GUESSES_SINGLE_CHAR, MIN_YEAR_SPACE,
};
pub use crate::error::ScoringError;
pub use crate::metrics::{set_scoring_metrics, ScoringMetrics};
pub use crate::search::ScoredSequence;

/// Guess estimator over a fixed adjacency-graph table and configuration.
///
/// The graph table is read-only and may be shared between scorers and
/// threads; each call owns its match list, so concurrent calls never
/// contend.
#[derive(Debug, Clone)]
pub struct Scorer {
    graphs: Arc<KeyboardGraphs>,
    config: ScoringConfig,
}

impl Scorer {
    /// Scorer over the standard keyboard graphs.
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_graphs(KeyboardGraphs::standard(), config)
    }

    /// Scorer over a caller-supplied graph table.
    pub fn with_graphs(graphs: Arc<KeyboardGraphs>, config: ScoringConfig) -> Self {
        Self { graphs, config }
    }

    /// The configuration this scorer runs with.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Estimate guesses for a single match, writing the result onto its
    /// output slots. Memoized per match.
    ///
    /// `password_len` is the length in characters of the password the
    /// match was produced from; it decides whether the submatch floor
    /// applies.
    pub fn estimate_guesses(
        &self,
        m: &mut Match,
        password_len: usize,
    ) -> Result<f64, ScoringError> {
        m.validate_attributes()?;
        estimate::estimate_guesses(m, password_len, &self.graphs, &self.config)
    }

    /// Select the minimum-work non-overlapping cover of `password`.
    ///
    /// Candidate matches are validated against the password first;
    /// malformed matches are rejected rather than silently defaulted.
    pub fn most_guessable_match_sequence(
        &self,
        password: &str,
        matches: Vec<Match>,
    ) -> Result<ScoredSequence, ScoringError> {
        let start = Instant::now();
        let candidate_count = matches.len();
        let result = search::optimal_sequence(password, matches, &self.graphs, &self.config)?;
        if let Some(recorder) = metrics::metrics_recorder() {
            recorder.record_score(
                password.chars().count(),
                candidate_count,
                start.elapsed(),
                result.sequence.len(),
            );
        }
        Ok(result)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Select the minimum-work cover using a default scorer.
pub fn most_guessable_match_sequence(
    password: &str,
    matches: Vec<Match>,
) -> Result<ScoredSequence, ScoringError> {
    Scorer::default().most_guessable_match_sequence(password, matches)
}
