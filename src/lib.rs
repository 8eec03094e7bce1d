//! Workspace umbrella crate for the guesswork password estimator.
//!
//! The `guesswork` crate re-exports the match model and the scoring layer
//! so applications can drive the whole estimator through a single
//! dependency. [`score_password`] is the common "just score it" entry
//! point: it runs the optimal sequence search over the caller's candidate
//! matches and wraps the result in a [`StrengthReport`] with a 0-4 score
//! bucket and crack-time figures.
//!
//! ## Quick start
//!
//! ```
//! use guesswork::{score_password, Match, MatchPattern, Score};
//!
//! let matches = vec![Match::new(
//!     0,
//!     5,
//!     "zxcvbn",
//!     MatchPattern::Dictionary {
//!         rank: 1,
//!         reversed: false,
//!         l33t: false,
//!         sub: Default::default(),
//!     },
//! )];
//!
//! let report = score_password("zxcvbn", matches).unwrap();
//! assert_eq!(report.score, Score::Zero);
//! assert!(report.guesses < 10.0);
//! ```
//!
//! Match *producers* are external collaborators: this workspace scores
//! candidate matches, it does not discover them. An empty candidate list
//! is fine — the search falls back to brute force.
//!
//! ## Observability
//!
//! Structured per-call events can be captured by installing a
//! [`ScoreEventLogger`] with [`set_score_logger`]; [`KeyValueLogger`]
//! writes escaped `key="value"` lines to any writer. Latency/histogram
//! style telemetry hooks in at the scoring layer through
//! [`ScoringMetrics`] and [`set_scoring_metrics`]. Both hooks are
//! typically registered once during service startup.
//!
//! ## Configuration
//!
//! Scoring knobs can be loaded from YAML through
//! [`config::GuessworkConfig`]; see the `config` module. The only
//! wall-clock input is the reference year used by date estimates — pin it
//! for reproducible results.

pub mod config;
pub mod report;

pub use patterns::{
    build_adjacency_graph, AdjacencyGraph, KeyboardGraphs, LayoutError, Match, MatchPattern,
    PatternError, RegexClass,
};
pub use report::{display_duration, CrackTimes, Score, StrengthReport};
pub use scoring::{
    average_degree, factorial, most_guessable_match_sequence, n_choose_k, set_scoring_metrics,
    ScoredSequence, Scorer, ScoringConfig, ScoringError, ScoringMetrics,
    BRUTEFORCE_CARDINALITY, MIN_GUESSES_BEFORE_GROWING_SEQUENCE,
    MIN_SUBMATCH_GUESSES_MULTI_CHAR, MIN_SUBMATCH_GUESSES_SINGLE_CHAR, MIN_YEAR_SPACE,
};

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};

/// Outcome of a scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStatus {
    Success,
    Failure,
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ScoreStatus::Success => "success",
            ScoreStatus::Failure => "failure",
        };
        f.write_str(label)
    }
}

/// Structured observation describing one scoring call.
///
/// The password itself never appears in an event; only its length in
/// characters is carried.
#[derive(Debug, Clone)]
pub struct ScoreEvent {
    pub status: ScoreStatus,
    pub latency: Duration,
    pub password_chars: usize,
    pub candidate_matches: usize,
    pub guesses_log10: Option<f64>,
    pub error: Option<String>,
}

impl ScoreEvent {
    fn format_key_values(&self, include_timestamp: bool) -> String {
        let mut parts = Vec::new();
        if include_timestamp {
            let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            parts.push(format!("timestamp=\"{ts}\""));
        }
        let status = self.status;
        parts.push(format!("status={status}"));
        let latency_us = self.latency.as_micros();
        parts.push(format!("latency_us={latency_us}"));
        let password_chars = self.password_chars;
        parts.push(format!("password_chars={password_chars}"));
        let candidate_matches = self.candidate_matches;
        parts.push(format!("candidate_matches={candidate_matches}"));
        if let Some(guesses_log10) = self.guesses_log10 {
            parts.push(format!("guesses_log10={guesses_log10:.4}"));
        }
        if let Some(error) = &self.error {
            let error = escape_kv(error);
            parts.push(format!("error=\"{error}\""));
        }
        parts.join(" ")
    }
}

fn escape_kv(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Hook for emitting structured events per scoring call.
pub trait ScoreEventLogger: Send + Sync {
    fn log(&self, event: &ScoreEvent);
}

/// Simple key-value logger that writes structured events to any writer.
pub struct KeyValueLogger {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    include_timestamp: bool,
}

impl KeyValueLogger {
    /// Create a logger that writes to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Create a logger backed by the provided writer.
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            include_timestamp: true,
        }
    }

    /// Toggle timestamp emission for the structured log line.
    pub fn with_timestamps(mut self, include_timestamp: bool) -> Self {
        self.include_timestamp = include_timestamp;
        self
    }
}

impl ScoreEventLogger for KeyValueLogger {
    fn log(&self, event: &ScoreEvent) {
        if let Ok(mut writer) = self.writer.lock() {
            let line = event.format_key_values(self.include_timestamp);
            let _ = writeln!(writer, "{line}");
        }
    }
}

/// Install or clear the structured score event logger.
pub fn set_score_logger(logger: Option<Arc<dyn ScoreEventLogger>>) {
    let lock = logger_lock();
    let mut guard = lock.write().expect("score logger lock poisoned");
    *guard = logger;
}

fn logger_lock() -> &'static RwLock<Option<Arc<dyn ScoreEventLogger>>> {
    static LOGGER: OnceLock<RwLock<Option<Arc<dyn ScoreEventLogger>>>> = OnceLock::new();
    LOGGER.get_or_init(|| RwLock::new(None))
}

fn score_logger() -> Option<Arc<dyn ScoreEventLogger>> {
    let guard = logger_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Score a password against its candidate matches with a default scorer.
pub fn score_password(
    password: &str,
    matches: Vec<Match>,
) -> Result<StrengthReport, ScoringError> {
    score_password_with(&Scorer::default(), password, matches)
}

/// Score a password with an explicit scorer.
///
/// Emits a [`ScoreEvent`] to the installed logger for every call, success
/// or failure.
pub fn score_password_with(
    scorer: &Scorer,
    password: &str,
    matches: Vec<Match>,
) -> Result<StrengthReport, ScoringError> {
    let start = Instant::now();
    let candidate_matches = matches.len();
    let result = scorer.most_guessable_match_sequence(password, matches);

    if let Some(logger) = score_logger() {
        let event = match &result {
            Ok(sequence) => ScoreEvent {
                status: ScoreStatus::Success,
                latency: start.elapsed(),
                password_chars: password.chars().count(),
                candidate_matches,
                guesses_log10: Some(sequence.guesses_log10),
                error: None,
            },
            Err(err) => ScoreEvent {
                status: ScoreStatus::Failure,
                latency: start.elapsed(),
                password_chars: password.chars().count(),
                candidate_matches,
                guesses_log10: None,
                error: Some(err.to_string()),
            },
        };
        logger.log(&event);
    }

    result.map(StrengthReport::from)
}
