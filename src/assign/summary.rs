//! Per-machine view of an assignment, for tables, charts and legends.

use super::capacity::CapacityTable;
use super::problem::AssignProblem;
use super::types::{Assignment, MachineId, TaskId};

/// What one used machine carries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineLoad {
    pub machine: MachineId,
    /// Hosted tasks, in input order.
    pub tasks: Vec<TaskId>,
    /// Sum of hosted task durations.
    pub total_duration: f64,
    pub task_capacity: usize,
    pub time_capacity: f64,
}

impl MachineLoad {
    /// Number of hosted tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Share of the time capacity in use, in `[0, 1]` for valid loads.
    pub fn utilization(&self) -> f64 {
        if self.time_capacity > 0.0 {
            self.total_duration / self.time_capacity
        } else {
            0.0
        }
    }
}

/// One entry per machine hosting at least one task, by machine index.
///
/// Machines outside the capacity table are reported with zero capacity.
pub fn machine_loads(
    problem: &AssignProblem,
    capacities: &CapacityTable,
    assignment: &Assignment,
) -> Vec<MachineLoad> {
    let mut loads: Vec<MachineLoad> = assignment
        .used_machines()
        .into_iter()
        .map(|machine| {
            let known = machine.index() < capacities.machine_count();
            MachineLoad {
                machine,
                tasks: Vec::new(),
                total_duration: 0.0,
                task_capacity: if known { capacities.task_capacity(machine) } else { 0 },
                time_capacity: if known { capacities.time_capacity(machine) } else { 0.0 },
            }
        })
        .collect();

    for task in &problem.tasks {
        let Some(machine) = assignment.machine_of(&task.id) else {
            continue;
        };
        if let Ok(slot) = loads.binary_search_by_key(&machine, |l| l.machine) {
            loads[slot].tasks.push(task.id.clone());
            loads[slot].total_duration += task.duration;
        }
    }
    loads
}
