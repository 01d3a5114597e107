//! Solver interface for 0-1 models.

use super::model::{MipModel, VarId};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found (within the configured gap).
    Optimal,
    /// Feasible solution found, search stopped before proving optimality.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Time limit reached before any feasible solution was found.
    Timeout,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// The backend itself failed.
    Error,
}

/// Solution from a MIP solver.
#[derive(Debug, Clone)]
pub struct MipSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if a solution was found).
    pub objective_value: Option<f64>,
    /// Variable values indexed by [`VarId`]; empty without a solution.
    pub values: Vec<f64>,
    /// Search nodes explored (0 if the backend does not report it).
    pub nodes: u64,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
    /// Backend message for `Error`/`ModelInvalid`, verbatim.
    pub message: Option<String>,
}

impl MipSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            nodes: 0,
            solve_time_ms: 0,
            message: None,
        }
    }

    /// Creates an empty solution carrying a backend message.
    pub fn failed(status: SolverStatus, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(status)
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of `var`, or `None` without a solution.
    pub fn value(&self, var: VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: i64,
    /// Relative optimality gap at which the search may stop.
    pub mip_gap: f64,
    /// Whether to use the model's start hint.
    pub use_hint: bool,
    /// Stop after finding the first feasible solution.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            mip_gap: 0.0,
            use_hint: true,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: i64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = gap;
        self
    }

    pub fn with_hint(mut self, use_hint: bool) -> Self {
        self.use_hint = use_hint;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms <= 0 {
            return Err(format!(
                "time_limit_ms must be positive, got {}",
                self.time_limit_ms
            ));
        }
        if !(0.0..1.0).contains(&self.mip_gap) {
            return Err(format!("mip_gap must be in [0, 1), got {}", self.mip_gap));
        }
        Ok(())
    }
}

/// Trait for MIP solver implementations.
///
/// Implementors provide the actual search. This can wrap an external
/// solver or run an in-process algorithm. Backends must not mutate
/// shared state between calls, so one solver value can serve concurrent
/// invocations.
pub trait MipSolver: Send + Sync {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &MipModel, config: &SolverConfig) -> MipSolution;
}
