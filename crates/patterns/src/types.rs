//! The match record consumed by the estimator and the sequence search.
//!
//! A [`Match`] describes one recognized substring of a password. Producers
//! (dictionary lookup, keyboard-walk detection, date parsing, ...) live
//! outside this workspace; they hand the scorer a list of possibly
//! overlapping matches honoring the invariants checked by
//! [`Match::validate`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Pattern-specific attributes of a match.
///
/// Each variant carries only the fields that are meaningful for its
/// pattern; the shared header (span, token, output slots) lives on
/// [`Match`]. The estimator dispatches on this tag exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum MatchPattern {
    /// Fallback pattern assumed when no producer match explains a substring.
    /// Synthesized by the sequence search, never by producers.
    Bruteforce,
    /// A ranked word from a frequency list, possibly reversed or l33t-substituted.
    Dictionary {
        /// 1-based popularity rank in the source list.
        rank: u64,
        /// The token matched the word spelled backwards.
        #[serde(default)]
        reversed: bool,
        /// The token matched through l33t character substitutions.
        #[serde(default)]
        l33t: bool,
        /// Substituted character -> original character, for l33t matches.
        #[serde(default)]
        sub: BTreeMap<char, char>,
    },
    /// A walk over adjacent keys of a keyboard layout.
    Spatial {
        /// Name of the adjacency graph the walk was found on.
        graph: String,
        /// Number of direction changes in the walk, at least 1.
        turns: usize,
        /// Number of characters requiring the shift key.
        shifted_count: usize,
    },
    /// A repeated base token, e.g. `abcabcabc`.
    Repeat {
        /// Guesses already estimated for one repetition of the base token.
        base_guesses: f64,
        /// How many times the base token repeats, at least 1.
        repeat_count: usize,
        /// The matches covering one repetition, kept for reporting.
        #[serde(default)]
        base_matches: Vec<Match>,
    },
    /// A run through an alphabet, e.g. `abcdef` or `97531`.
    Sequence {
        /// Whether the run moves forward through its alphabet.
        #[serde(default = "default_true")]
        ascending: bool,
    },
    /// A token matched by a named character-class or year regex.
    Regex {
        /// Which class matched. For [`RegexClass::RecentYear`] the token
        /// itself holds the matched year digits.
        class: RegexClass,
    },
    /// A calendar date, with or without separators.
    Date {
        year: i32,
        #[serde(default)]
        separator: Option<char>,
    },
}

fn default_true() -> bool {
    true
}

impl MatchPattern {
    /// Short pattern name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            MatchPattern::Bruteforce => "bruteforce",
            MatchPattern::Dictionary { .. } => "dictionary",
            MatchPattern::Spatial { .. } => "spatial",
            MatchPattern::Repeat { .. } => "repeat",
            MatchPattern::Sequence { .. } => "sequence",
            MatchPattern::Regex { .. } => "regex",
            MatchPattern::Date { .. } => "date",
        }
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named character classes recognized by the regex producer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegexClass {
    AlphaLower,
    AlphaUpper,
    Alpha,
    Alphanumeric,
    Digits,
    Symbols,
    RecentYear,
}

/// One recognized substring of a password.
///
/// `i` and `j` are inclusive 0-based character indices; `token` is the
/// corresponding slice of the password. The trailing `Option` fields are
/// output slots: they start empty and are written once by the estimator,
/// then read back for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    /// Inclusive start index (characters, not bytes).
    pub i: usize,
    /// Inclusive end index (characters, not bytes).
    pub j: usize,
    /// The matched substring, equal to `password[i..=j]` by characters.
    pub token: String,
    #[serde(flatten)]
    pub pattern: MatchPattern,
    /// Estimated guesses, filled by the estimator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guesses: Option<f64>,
    /// `log10(guesses)`, filled together with `guesses`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guesses_log10: Option<f64>,
    /// For dictionary matches, the rank before variation factors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_guesses: Option<f64>,
    /// Capitalization variation factor, for dictionary matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uppercase_variations: Option<f64>,
    /// L33t substitution variation factor, for dictionary matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l33t_variations: Option<f64>,
}

impl Match {
    /// Create a match with empty output slots.
    pub fn new(i: usize, j: usize, token: impl Into<String>, pattern: MatchPattern) -> Self {
        Self {
            i,
            j,
            token: token.into(),
            pattern,
            guesses: None,
            guesses_log10: None,
            base_guesses: None,
            uppercase_variations: None,
            l33t_variations: None,
        }
    }

    /// Token length in characters.
    pub fn token_len(&self) -> usize {
        self.token.chars().count()
    }

    /// Check pattern attributes that can be verified without the password.
    pub fn validate_attributes(&self) -> Result<(), PatternError> {
        match &self.pattern {
            MatchPattern::Spatial {
                turns,
                shifted_count,
                ..
            } => {
                if *turns == 0 {
                    return Err(PatternError::ZeroTurns);
                }
                let len = self.token_len();
                if *shifted_count > len {
                    return Err(PatternError::ShiftedCountOutOfRange {
                        shifted_count: *shifted_count,
                        len,
                    });
                }
            }
            MatchPattern::Repeat { repeat_count, .. } => {
                if *repeat_count == 0 {
                    return Err(PatternError::ZeroRepeatCount);
                }
            }
            MatchPattern::Regex {
                class: RegexClass::RecentYear,
            } => {
                if self.token.parse::<i32>().is_err() {
                    return Err(PatternError::UnparsableYear {
                        token: self.token.clone(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Check that the span fits the password and the token equals the slice.
    pub fn validate_span(&self, password: &str) -> Result<(), PatternError> {
        if self.i > self.j {
            return Err(PatternError::InvertedSpan {
                i: self.i,
                j: self.j,
            });
        }
        let len = password.chars().count();
        if self.j >= len {
            return Err(PatternError::SpanOutOfBounds {
                i: self.i,
                j: self.j,
                len,
            });
        }
        let slice: String = password
            .chars()
            .skip(self.i)
            .take(self.j - self.i + 1)
            .collect();
        if slice != self.token {
            return Err(PatternError::TokenMismatch {
                token: self.token.clone(),
                slice,
            });
        }
        Ok(())
    }

    /// Full validation against the password this match was produced from.
    pub fn validate(&self, password: &str) -> Result<(), PatternError> {
        self.validate_span(password)?;
        self.validate_attributes()
    }
}
