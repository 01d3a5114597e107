//! Undirected conflict graph over dense node indices.

use std::collections::BTreeSet;

/// An undirected simple graph whose nodes are `0..node_count`.
///
/// Edges mark pairs of nodes that must never share a group (machine,
/// color, ...). Adding the same edge twice is a no-op, and self-loops are
/// rejected, so the degree of a node is always the number of distinct
/// nodes it conflicts with.
///
/// # Examples
///
/// ```
/// use u_assign::graph::ConflictGraph;
///
/// let mut g = ConflictGraph::new(3);
/// g.add_edge(0, 1);
/// g.add_edge(1, 0); // idempotent
/// assert_eq!(g.edge_count(), 1);
/// assert_eq!(g.max_degree(), 1);
/// assert_eq!(g.brooks_bound(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    adjacency: Vec<BTreeSet<usize>>,
    edge_count: usize,
}

impl ConflictGraph {
    /// Creates a graph with `node_count` isolated nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); node_count],
            edge_count: 0,
        }
    }

    /// Builds a graph from an edge list.
    ///
    /// Edges touching an out-of-range node or looping on a single node
    /// are skipped.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::new(node_count);
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Adds the edge `{a, b}`.
    ///
    /// Returns `true` if the edge is new. Self-loops and out-of-range
    /// endpoints are ignored and return `false`.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        let n = self.adjacency.len();
        if a == b || a >= n || b >= n {
            return false;
        }
        let inserted = self.adjacency[a].insert(b);
        if inserted {
            self.adjacency[b].insert(a);
            self.edge_count += 1;
        }
        inserted
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `a` and `b` conflict.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }

    /// Neighbors of `node` in ascending order.
    pub fn neighbors(&self, node: usize) -> &BTreeSet<usize> {
        &self.adjacency[node]
    }

    /// Degree of `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Degree of every node, indexed by node.
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(BTreeSet::len).collect()
    }

    /// Maximum degree over all nodes (0 for an empty graph).
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Upper bound on the number of groups needed to separate all
    /// conflicting nodes: `max_degree + 1`.
    ///
    /// Greedy coloring in any order never needs more colors than this,
    /// so the bound is always achievable when groups are unbounded.
    pub fn brooks_bound(&self) -> usize {
        self.max_degree() + 1
    }

    /// Whether `groups[i]` separates every conflicting pair.
    ///
    /// `groups` is indexed by node.
    pub fn is_proper(&self, groups: &[usize]) -> bool {
        self.adjacency.iter().enumerate().all(|(a, neighbors)| {
            neighbors
                .iter()
                .all(|&b| groups.get(a) != groups.get(b))
        })
    }
}
