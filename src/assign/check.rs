//! Post-solve verification of assignments.

use super::capacity::CapacityTable;
use super::problem::AssignProblem;
use super::types::{Assignment, MachineId, TaskId};
use thiserror::Error;

/// Slack on cumulative durations.
const LOAD_TOL: f64 = 1e-6;

/// An invariant broken by an assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("task {0} is not assigned")]
    Unassigned(TaskId),

    #[error("task {0} is not part of the problem")]
    UnknownTask(TaskId),

    #[error("conflicting tasks {a} and {b} share machine {machine}")]
    SharedMachine {
        a: TaskId,
        b: TaskId,
        machine: MachineId,
    },

    #[error("machine {machine} is not a candidate machine")]
    UnknownMachine { machine: MachineId },

    #[error("machine {machine} hosts {count} tasks, capacity {capacity}")]
    TaskCapacity {
        machine: MachineId,
        count: usize,
        capacity: usize,
    },

    #[error("machine {machine} carries load {load}, capacity {capacity}")]
    TimeCapacity {
        machine: MachineId,
        load: f64,
        capacity: f64,
    },

    #[error("machine {machine} is used but only {machines_used} machines are counted")]
    OutsidePrefix {
        machine: MachineId,
        machines_used: usize,
    },
}

/// Verifies an assignment against the problem and its capacities.
///
/// Checks that every task is assigned once, conflicting tasks are
/// separated, per-machine task counts and loads fit, and every hosting
/// machine lies in the prefix `0..machines_used`.
pub fn check_assignment(
    problem: &AssignProblem,
    capacities: &CapacityTable,
    assignment: &Assignment,
    machines_used: usize,
) -> Result<(), Violation> {
    let mut machine_of = Vec::with_capacity(problem.task_count());
    for task in &problem.tasks {
        let machine = assignment
            .machine_of(&task.id)
            .ok_or_else(|| Violation::Unassigned(task.id.clone()))?;
        machine_of.push(machine);
    }
    if assignment.len() != problem.task_count() {
        if let Some((extra, _)) = assignment.iter().find(|(t, _)| problem.position(t).is_none()) {
            return Err(Violation::UnknownTask(extra.clone()));
        }
    }

    for a in 0..problem.task_count() {
        for &b in problem.graph.neighbors(a).range(a + 1..) {
            if machine_of[a] == machine_of[b] {
                return Err(Violation::SharedMachine {
                    a: problem.tasks[a].id.clone(),
                    b: problem.tasks[b].id.clone(),
                    machine: machine_of[a],
                });
            }
        }
    }

    let machines = capacities.machine_count();
    let mut counts = vec![0usize; machines];
    let mut loads = vec![0.0f64; machines];
    for (task, &machine) in problem.tasks.iter().zip(&machine_of) {
        if machine.index() >= machines {
            return Err(Violation::UnknownMachine { machine });
        }
        if machine.index() >= machines_used {
            return Err(Violation::OutsidePrefix {
                machine,
                machines_used,
            });
        }
        counts[machine.index()] += 1;
        loads[machine.index()] += task.duration;
    }

    for m in 0..machines {
        let machine = MachineId(m);
        let capacity = capacities.task_capacity(machine);
        if counts[m] > capacity {
            return Err(Violation::TaskCapacity {
                machine,
                count: counts[m],
                capacity,
            });
        }
        let capacity = capacities.time_capacity(machine);
        if loads[m] > capacity + LOAD_TOL {
            return Err(Violation::TimeCapacity {
                machine,
                load: loads[m],
                capacity,
            });
        }
    }
    Ok(())
}
