use patterns::PatternError;
use thiserror::Error;

/// Errors produced by the scoring layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// A candidate match violated its structural invariants.
    #[error("invalid match: {0}")]
    InvalidMatch(#[from] PatternError),
    /// A spatial match referenced a layout missing from the graph table.
    #[error("spatial match references unknown adjacency graph {name:?}")]
    UnknownGraph { name: String },
}
