//! Validated problem instance: tasks plus their conflict graph.

use super::types::{AssignRequest, MachineId, Task, TaskId};
use crate::error::AssignError;
use crate::graph::ConflictGraph;
use std::collections::{BTreeMap, HashMap};

/// A request after validation, with the conflict graph built.
///
/// Node `i` of [`graph`](Self::graph) is `tasks[i]`.
#[derive(Debug, Clone)]
pub struct AssignProblem {
    /// Tasks in input order.
    pub tasks: Vec<Task>,
    /// Conflict graph over task positions.
    pub graph: ConflictGraph,
    /// Caller-supplied task-count capacities.
    pub task_capacities: BTreeMap<MachineId, usize>,
    /// Caller-supplied time capacities.
    pub time_capacities: BTreeMap<MachineId, f64>,
    /// Hard cap on available machines.
    pub hard_machine_cap: Option<usize>,
}

impl AssignProblem {
    /// Validates `request` and builds its conflict graph.
    ///
    /// Repeated conflict pairs (in either order) collapse into one edge.
    pub fn from_request(request: &AssignRequest) -> Result<Self, AssignError> {
        request.validate()?;

        let tasks = request.tasks();
        let position: HashMap<&TaskId, usize> =
            tasks.iter().enumerate().map(|(i, t)| (&t.id, i)).collect();

        let mut graph = ConflictGraph::new(tasks.len());
        for (a, b) in &request.conflicts {
            match (position.get(a), position.get(b)) {
                (Some(&i), Some(&j)) => {
                    graph.add_edge(i, j);
                }
                (None, _) => return Err(AssignError::UnknownTask(a.clone())),
                (_, None) => return Err(AssignError::UnknownTask(b.clone())),
            }
        }

        Ok(Self {
            graph,
            task_capacities: request.task_capacities.clone(),
            time_capacities: request.time_capacities.clone(),
            hard_machine_cap: request.hard_machine_cap,
            tasks,
        })
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Sum of all task durations.
    pub fn total_duration(&self) -> f64 {
        self.tasks.iter().map(|t| t.duration).sum()
    }

    /// Position of `id` in [`tasks`](Self::tasks).
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Whether any capacity map was supplied.
    pub fn has_capacities(&self) -> bool {
        !self.task_capacities.is_empty() || !self.time_capacities.is_empty()
    }

    /// `max_degree + 1` of the conflict graph.
    pub fn brooks_bound(&self) -> usize {
        self.graph.brooks_bound()
    }

    /// Number of machines the model will consider.
    ///
    /// Without capacity limits the Brooks bound is always enough. Supplied
    /// capacities can force more machines than that (tasks that do not fit
    /// together even without conflicts), so the bound is widened to one
    /// machine per task. Either way the hard cap, if any, wins.
    pub fn candidate_machines(&self) -> usize {
        let mut bound = self.brooks_bound();
        if self.has_capacities() {
            bound = bound.max(self.task_count());
        }
        match self.hard_machine_cap {
            Some(cap) => bound.min(cap),
            None => bound,
        }
    }
}
