//! 0-1 integer programming layer.
//!
//! Provides a backend-agnostic model for pure binary linear programs and
//! the narrow interface a solver backend must satisfy.
//!
//! # Key Components
//!
//! - **Model**: [`MipModel`] with binary variables, linear constraints,
//!   objective and start hint
//! - **Solver**: [`MipSolver`] trait: configure, solve, read values
//! - **Backends**: [`BranchAndBoundSolver`] (in-process, exact) and,
//!   with the `milp` feature, `GoodLpSolver` (`good_lp` + `microlp`)
//!
//! # Design
//!
//! Domain layers build a [`MipModel`] and never talk to a backend
//! directly. Performance and gap behavior vary by backend; callers should
//! only rely on the [`SolverStatus`] contract and the variable values.
//!
//! # References
//!
//! Wolsey (1998), "Integer Programming"

mod branch_bound;
#[cfg(feature = "milp")]
mod goodlp;
mod model;
mod solver;

pub use branch_bound::BranchAndBoundSolver;
#[cfg(feature = "milp")]
pub use goodlp::GoodLpSolver;
pub use model::{BinaryVar, Constraint, LinearExpr, MipModel, Objective, Sense, VarId};
pub use solver::{MipSolution, MipSolver, SolverConfig, SolverStatus};
