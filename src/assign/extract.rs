//! Reading assignments back from solver values.

use super::builder::AssignmentModel;
use super::problem::AssignProblem;
use super::types::{Assignment, MachineId};
use crate::mip::MipSolution;

/// Values above this count as "1".
const ONE_THRESHOLD: f64 = 0.5;

/// Converts solver values into a task → machine mapping.
///
/// Each task goes to the first machine (in index order) whose `x[t,m]`
/// is closer to 1 than to 0. The machine count is the rounded objective.
///
/// Returns an error message if the solution carries no values or some
/// task has no selected machine.
pub fn extract(
    problem: &AssignProblem,
    built: &AssignmentModel,
    solution: &MipSolution,
) -> Result<(Assignment, usize), String> {
    let mut assignment = Assignment::new();
    for (t, task) in problem.tasks.iter().enumerate() {
        let machine = built.x[t]
            .iter()
            .position(|&var| solution.value(var).is_some_and(|v| v > ONE_THRESHOLD))
            .ok_or_else(|| format!("solver selected no machine for task {}", task.id))?;
        assignment.insert(task.id.clone(), MachineId(machine));
    }

    let objective = solution
        .objective_value
        .unwrap_or_else(|| built.y.iter().filter_map(|&y| solution.value(y)).sum());
    let machines_used = objective.round().max(0.0) as usize;
    Ok((assignment, machines_used))
}
