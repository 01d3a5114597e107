//! Maximal clique enumeration (Bron–Kerbosch with Tomita pivoting).

use super::conflict::ConflictGraph;
use std::collections::BTreeSet;

/// Enumerates every maximal clique of `graph`.
///
/// Each clique is returned with its nodes in ascending order, and the
/// list itself is sorted, so the output is deterministic. Isolated nodes
/// come back as singleton cliques. An empty graph has no cliques.
///
/// Worst-case running time is exponential in the node count (a graph can
/// have `3^(n/3)` maximal cliques); conflict graphs with tens of nodes
/// are fine.
///
/// # Examples
///
/// ```
/// use u_assign::graph::{maximal_cliques, ConflictGraph};
///
/// // Triangle 0-1-2 plus a pendant edge 2-3.
/// let g = ConflictGraph::from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
/// assert_eq!(maximal_cliques(&g), vec![vec![0, 1, 2], vec![2, 3]]);
/// ```
///
/// # References
///
/// - Bron & Kerbosch (1973), "Algorithm 457: Finding All Cliques of an
///   Undirected Graph"
/// - Tomita, Tanaka & Takahashi (2006), "The worst-case time complexity
///   for generating all maximal cliques"
pub fn maximal_cliques(graph: &ConflictGraph) -> Vec<Vec<usize>> {
    let mut cliques = Vec::new();
    let candidates: BTreeSet<usize> = (0..graph.node_count()).collect();
    let mut current = Vec::new();
    expand(graph, &mut current, candidates, BTreeSet::new(), &mut cliques);

    for clique in &mut cliques {
        clique.sort_unstable();
    }
    cliques.sort();
    cliques
}

/// One Bron–Kerbosch step.
///
/// `current` is the clique under construction (R), `candidates` the nodes
/// that may still extend it (P), `excluded` the nodes already covered by
/// an earlier branch (X).
fn expand(
    graph: &ConflictGraph,
    current: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() && !current.is_empty() {
            out.push(current.clone());
        }
        return;
    }

    let pivot = choose_pivot(graph, &candidates, &excluded);
    let branch: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|v| !graph.has_edge(pivot, *v))
        .collect();

    for v in branch {
        let neighbors = graph.neighbors(v);
        let next_candidates = candidates.intersection(neighbors).copied().collect();
        let next_excluded = excluded.intersection(neighbors).copied().collect();

        current.push(v);
        expand(graph, current, next_candidates, next_excluded, out);
        current.pop();

        candidates.remove(&v);
        excluded.insert(v);
    }
}

/// Picks the node of `P ∪ X` with the most neighbors in `P`.
///
/// Ties go to the smallest index. `candidates` must be non-empty.
fn choose_pivot(
    graph: &ConflictGraph,
    candidates: &BTreeSet<usize>,
    excluded: &BTreeSet<usize>,
) -> usize {
    let mut best = usize::MAX;
    let mut best_count = 0usize;
    for &u in candidates.iter().chain(excluded.iter()) {
        let count = graph
            .neighbors(u)
            .iter()
            .filter(|n| candidates.contains(n))
            .count();
        if best == usize::MAX || count > best_count || (count == best_count && u < best) {
            best = u;
            best_count = count;
        }
    }
    best
}
