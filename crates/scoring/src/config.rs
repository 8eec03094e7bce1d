//! Configuration and tunable constants for the scoring layer.
//!
//! The constants mirror the attacker model: how large the brute-force
//! alphabet is assumed to be, how much work an attacker spends on shorter
//! covers before trying longer ones, and the minimum enumeration cost
//! assigned to any recognized submatch.
//!
//! The only wall-clock input of the whole scorer is the reference year used
//! by date and recent-year estimates. [`ScoringConfig::default`] reads it
//! from the system clock; tests pin it explicitly so results stay stable.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Candidate characters assumed per position in a brute-force attack.
pub const BRUTEFORCE_CARDINALITY: u32 = 10;

/// Work an attacker spends on all shorter covers before growing a sequence
/// by one more match.
pub const MIN_GUESSES_BEFORE_GROWING_SEQUENCE: f64 = 10_000.0;

/// Minimum guesses for a single-character match inside a larger password.
pub const MIN_SUBMATCH_GUESSES_SINGLE_CHAR: f64 = 10.0;

/// Minimum guesses for a multi-character match inside a larger password.
pub const MIN_SUBMATCH_GUESSES_MULTI_CHAR: f64 = 50.0;

/// Smallest year distance assumed for date and recent-year guesses.
pub const MIN_YEAR_SPACE: i32 = 20;

/// Configuration for one scorer instance.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Year that date and recent-year distances are measured against.
    /// Defaults to the current calendar year.
    #[serde(default = "ScoringConfig::current_year")]
    pub reference_year: i32,
    /// Skip the additive shorter-covers-first term in the attacker-work
    /// objective, leaving `l! * product` exactly.
    #[serde(default)]
    pub exclude_additive: bool,
}

impl ScoringConfig {
    /// The current calendar year, read from the system clock.
    pub fn current_year() -> i32 {
        Utc::now().year()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_year: Self::current_year(),
            exclude_additive: false,
        }
    }
}
