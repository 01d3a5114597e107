//! Error type for assignment requests.

use crate::assign::{MachineId, TaskId};
use thiserror::Error;

/// Why an assignment request could not be turned into a model.
///
/// Solver outcomes (infeasible, time limit, backend failure) are not
/// errors: they come back as an [`AssignResult`](crate::assign::AssignResult)
/// with a status and a reason.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    #[error("duplicate task id: {0}")]
    DuplicateTask(TaskId),

    #[error("unknown task referenced: {0}")]
    UnknownTask(TaskId),

    #[error("task {0} conflicts with itself")]
    SelfConflict(TaskId),

    #[error("duration of task {task} must be positive and finite, got {duration}")]
    InvalidDuration { task: TaskId, duration: f64 },

    #[error("time capacity of machine {machine} must be positive and finite, got {capacity}")]
    InvalidTimeCapacity { machine: MachineId, capacity: f64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("model rejected: {0}")]
    Model(String),

    #[error("cannot start solver worker: {0}")]
    Spawn(String),

    #[error("solver worker stopped before reporting a result")]
    WorkerLost,
}
