//! Conflict graphs.
//!
//! A conflict graph has one node per item and an edge between every pair
//! of items that must not share a group. This module provides the graph
//! itself, its degree-based group bound, and maximal clique enumeration.
//!
//! # Key Components
//!
//! - [`ConflictGraph`]: undirected simple graph over dense indices
//! - [`maximal_cliques`]: Bron–Kerbosch enumeration with pivoting
//!
//! # References
//!
//! - Brooks (1941), "On colouring the nodes of a network"
//! - Bron & Kerbosch (1973), "Algorithm 457"

mod clique;
mod conflict;

pub use clique::maximal_cliques;
pub use conflict::ConflictGraph;
