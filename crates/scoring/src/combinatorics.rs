//! Small numeric helpers shared by the estimators.

use patterns::AdjacencyGraph;

/// Exact binomial coefficient `C(n, k)`.
///
/// Uses the multiplicative formula with an integer division after each
/// multiplication; the running product is always divisible by the divisor
/// at that step, so no precision is lost.
pub fn n_choose_k(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    if k == 0 {
        return 1;
    }
    let mut r: u64 = 1;
    let mut n = n;
    for d in 1..=k {
        r = r * n / d;
        n -= 1;
    }
    r
}

/// `n!` as a double. Only ever called for short sequence lengths.
pub fn factorial(n: usize) -> f64 {
    if n < 2 {
        return 1.0;
    }
    (2..=n).map(|i| i as f64).product()
}

/// Mean count of present neighbors per key of an adjacency graph.
pub fn average_degree(graph: &AdjacencyGraph) -> f64 {
    if graph.is_empty() {
        return 0.0;
    }
    let edges: usize = graph
        .values()
        .map(|neighbors| neighbors.iter().flatten().count())
        .sum();
    edges as f64 / graph.len() as f64
}
