//! Minimal machine assignment under task conflicts and capacities.
//!
//! Given tasks, pairwise conflicts ("these two may never share a
//! machine"), optional per-machine capacities and an optional cap on the
//! number of machines, finds an assignment that uses as few machines as
//! possible.
//!
//! - [`graph`]: conflict graph, degree bounds and maximal cliques
//! - [`mip`]: binary linear models and the [`MipSolver`](mip::MipSolver)
//!   seam, with a built-in branch-and-bound backend and an optional
//!   `good_lp` backend (feature `milp`)
//! - [`assign`]: request types, model construction, extraction,
//!   verification and the [`AssignRunner`](assign::AssignRunner) entry point
//!
//! # Features
//!
//! - `serde`: serialization for requests, configurations and results
//! - `parallel`: [`AssignRunner::solve_batch`](assign::AssignRunner::solve_batch)
//!   runs on the rayon pool
//! - `milp`: [`GoodLpSolver`](mip::GoodLpSolver) via `good_lp`

pub mod assign;
pub mod error;
pub mod graph;
pub mod mip;

pub use error::AssignError;
