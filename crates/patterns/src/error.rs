use thiserror::Error;

/// Errors produced when a match record violates its structural invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("match span is inverted: i={i} > j={j}")]
    InvertedSpan { i: usize, j: usize },
    #[error("match span [{i}, {j}] does not fit a {len}-char password")]
    SpanOutOfBounds { i: usize, j: usize, len: usize },
    #[error("match token {token:?} does not equal the password slice {slice:?}")]
    TokenMismatch { token: String, slice: String },
    #[error("spatial match requires turns >= 1")]
    ZeroTurns,
    #[error("spatial match has shifted_count {shifted_count} but only {len} chars")]
    ShiftedCountOutOfRange { shifted_count: usize, len: usize },
    #[error("repeat match requires repeat_count >= 1")]
    ZeroRepeatCount,
    #[error("recent-year match token {token:?} does not parse as a year")]
    UnparsableYear { token: String },
}
