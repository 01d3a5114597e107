//! Outcome of an assignment invocation.

use super::summary::MachineLoad;
use super::types::{Assignment, MachineId, TaskId};
use std::collections::BTreeMap;

/// Final status of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignStatus {
    /// Proven minimum number of machines (within the configured gap).
    Optimal,
    /// Best assignment found before the time limit, not proven optimal.
    TimeLimit,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The solver failed or returned nothing usable.
    Error,
}

impl AssignStatus {
    /// Whether the status carries an assignment.
    pub fn has_assignment(self) -> bool {
        matches!(self, AssignStatus::Optimal | AssignStatus::TimeLimit)
    }
}

/// Bounds and model facts gathered while building and solving.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Bin-packing lower bound on machines.
    pub lower_bound: usize,
    /// `max_degree + 1` of the conflict graph.
    pub brooks_bound: usize,
    pub max_degree: usize,
    /// Machines the model considered.
    pub candidate_machines: usize,
    /// Maximal cliques turned into exclusion rows.
    pub clique_count: usize,
    pub variables: usize,
    pub constraints: usize,
    /// Search nodes reported by the backend.
    pub nodes: u64,
    pub solve_time_ms: i64,
    /// The lower bound already exceeds the hard cap.
    pub lower_bound_exceeds_cap: bool,
}

/// Result of one assignment invocation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignResult {
    pub status: AssignStatus,
    /// Task → machine mapping; `None` unless the status has an assignment.
    pub assignment: Option<Assignment>,
    /// Machines used (rounded objective); 0 without an assignment.
    pub machines_used: usize,
    pub diagnostics: Diagnostics,
    /// Per-machine loads of the assignment, by machine index.
    pub loads: Vec<MachineLoad>,
    /// Human-readable explanation for `Infeasible` and `Error`.
    pub reason: Option<String>,
}

impl AssignResult {
    /// A result without assignment.
    pub fn failure(status: AssignStatus, diagnostics: Diagnostics, reason: String) -> Self {
        Self {
            status,
            assignment: None,
            machines_used: 0,
            diagnostics,
            loads: Vec::new(),
            reason: Some(reason),
        }
    }

    /// Whether an assignment was found.
    pub fn is_success(&self) -> bool {
        self.status.has_assignment() && self.assignment.is_some()
    }

    /// Whether the assignment is proven optimal.
    pub fn is_optimal(&self) -> bool {
        self.status == AssignStatus::Optimal
    }

    /// Tasks grouped by machine (empty without an assignment).
    pub fn by_machine(&self) -> BTreeMap<MachineId, Vec<TaskId>> {
        self.assignment
            .as_ref()
            .map(Assignment::by_machine)
            .unwrap_or_default()
    }
}
