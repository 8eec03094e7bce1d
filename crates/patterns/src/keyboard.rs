//! Keyboard adjacency graphs for spatial-pattern scoring.
//!
//! The estimator only needs two numbers per layout family: how many keys a
//! walk can start from and how many neighbors an average key has. Both are
//! derived from an adjacency table `key -> neighbors`, where each neighbor
//! slot holds the full token of the adjacent key (e.g. `"qQ"`) or `None`
//! when the slot is off the board. Slanted keyboards have six neighbor
//! slots per key, aligned keypads have eight.
//!
//! The standard tables are built once from embedded layout grids and shared
//! behind an `Arc`; callers with exotic layouts can assemble their own
//! [`KeyboardGraphs`] from the same builder.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

/// Adjacency table of a single layout: key character to neighbor tokens.
pub type AdjacencyGraph = BTreeMap<char, Vec<Option<String>>>;

/// Errors produced while parsing a layout grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout row {row} has token {token:?} off the column grid")]
    MisalignedToken { row: usize, token: String },
    #[error("layout contains no tokens")]
    EmptyLayout,
}

// Rows are laid out so that (column - slant) is a multiple of the token
// width plus one; the slant grows by one column per row on slanted boards.
const QWERTY: &str = r#"
`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) -_ =+
    qQ wW eE rR tT yY uU iI oO pP [{ ]} \|
     aA sS dD fF gG hH jJ kK lL ;: '"
      zZ xX cC vV bB nN mM ,< .> /?
"#;

const DVORAK: &str = r#"
`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) [{ ]}
    '" ,< .> pP yY fF gG cC rR lL /? =+ \|
     aA oO eE uU iI dD hH tT nN sS -_
      ;: qQ jJ kK xX bB mM wW vV zZ
"#;

const KEYPAD: &str = r#"
  / * -
7 8 9 +
4 5 6
1 2 3
0 .
"#;

const MAC_KEYPAD: &str = r#"
  = / *
7 8 9 -
4 5 6 +
1 2 3
0 .
"#;

const SLANTED_DELTAS: &[(i32, i32)] = &[(-1, 0), (1, 0), (0, -1), (1, -1), (-1, 1), (0, 1)];
const ALIGNED_DELTAS: &[(i32, i32)] = &[
    (-1, 0),
    (1, 0),
    (0, -1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Build the adjacency table for one layout grid.
///
/// Each whitespace-separated token in the grid is a physical key; every
/// character of the token becomes a graph key mapping to the tokens of the
/// geometrically adjacent keys.
pub fn build_adjacency_graph(layout: &str, slanted: bool) -> Result<AdjacencyGraph, LayoutError> {
    let mut positions: BTreeMap<(i32, i32), &str> = BTreeMap::new();
    let mut token_width: Option<usize> = None;

    for (row, line) in layout.lines().enumerate() {
        let slant = if slanted { row as i32 - 1 } else { 0 };
        for (column, token) in tokens_with_columns(line) {
            let width = *token_width.get_or_insert_with(|| token.len());
            let x_unit = (width + 1) as i32;
            let offset = column as i32 - slant;
            if offset % x_unit != 0 {
                return Err(LayoutError::MisalignedToken {
                    row,
                    token: token.to_string(),
                });
            }
            positions.insert((offset / x_unit, row as i32), token);
        }
    }

    if positions.is_empty() {
        return Err(LayoutError::EmptyLayout);
    }

    let deltas = if slanted {
        SLANTED_DELTAS
    } else {
        ALIGNED_DELTAS
    };
    let mut graph = AdjacencyGraph::new();
    for (&(x, y), &token) in &positions {
        let neighbors: Vec<Option<String>> = deltas
            .iter()
            .map(|&(dx, dy)| positions.get(&(x + dx, y + dy)).map(|t| t.to_string()))
            .collect();
        for ch in token.chars() {
            graph.insert(ch, neighbors.clone());
        }
    }
    Ok(graph)
}

/// Byte columns of the whitespace-separated tokens of one row.
fn tokens_with_columns(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in line.char_indices() {
        if ch == ' ' {
            if let Some(s) = start.take() {
                out.push((s, &line[s..idx]));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        out.push((s, &line[s..]));
    }
    out
}

/// Read-only collection of adjacency graphs keyed by layout name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyboardGraphs {
    graphs: BTreeMap<String, AdjacencyGraph>,
}

impl KeyboardGraphs {
    /// The shared standard table: qwerty, dvorak, keypad and mac_keypad.
    ///
    /// Built on first use and reused across calls; the table is read-only
    /// so the same `Arc` may be shared freely between threads.
    pub fn standard() -> Arc<KeyboardGraphs> {
        static STANDARD: OnceLock<Arc<KeyboardGraphs>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                let mut graphs = KeyboardGraphs::default();
                for (name, layout, slanted) in [
                    ("qwerty", QWERTY, true),
                    ("dvorak", DVORAK, true),
                    ("keypad", KEYPAD, false),
                    ("mac_keypad", MAC_KEYPAD, false),
                ] {
                    let graph = build_adjacency_graph(layout, slanted)
                        .expect("embedded layout grids are well-formed");
                    graphs.insert(name, graph);
                }
                Arc::new(graphs)
            })
            .clone()
    }

    /// Add or replace a layout.
    pub fn insert(&mut self, name: impl Into<String>, graph: AdjacencyGraph) {
        self.graphs.insert(name.into(), graph);
    }

    /// Look up a layout by name.
    pub fn get(&self, name: &str) -> Option<&AdjacencyGraph> {
        self.graphs.get(name)
    }

    /// Whether a layout with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.graphs.contains_key(name)
    }

    /// Names of the available layouts.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }
}
