//! Match data model for the guesswork password estimator.
//!
//! This crate defines the inputs of the scoring layer:
//!
//! - [`Match`] / [`MatchPattern`] — one recognized substring of a password,
//!   tagged with the pattern kind that explains it and validated against
//!   the structural invariants the scorer relies on.
//! - [`KeyboardGraphs`] — the read-only adjacency tables that back spatial
//!   scoring, with the standard qwerty/dvorak/keypad layouts built in.
//!
//! Match *producers* (dictionary lookup, keyboard-walk detection, date
//! parsing, ...) are external collaborators; this crate only models and
//! checks what they emit.

mod error;
mod keyboard;
mod types;

pub use crate::error::PatternError;
pub use crate::keyboard::{
    build_adjacency_graph, AdjacencyGraph, KeyboardGraphs, LayoutError,
};
pub use crate::types::{Match, MatchPattern, RegexClass};
