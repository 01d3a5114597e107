//! Domain types: tasks, machines, requests and assignments.

use crate::error::AssignError;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Duration given to tasks without an explicit one.
pub const DEFAULT_DURATION: f64 = 1.0;

/// Identifier of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<usize> for TaskId {
    fn from(id: usize) -> Self {
        Self(id.to_string())
    }
}

/// Index of a candidate machine, starting at 0.
///
/// Machines are interchangeable before solving; after solving the used
/// machines always form a prefix `0..machines_used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct MachineId(pub usize);

impl MachineId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task with its (defaulted) duration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub duration: f64,
}

/// Input of one assignment invocation.
///
/// # Examples
///
/// ```
/// use u_assign::assign::AssignRequest;
///
/// let request = AssignRequest::new(["T1", "T2", "T3"])
///     .with_conflict("T1", "T2")
///     .with_duration("T3", 2.5)
///     .with_time_capacity(0, 4.0)
///     .with_hard_cap(3);
/// assert!(request.validate().is_ok());
/// assert_eq!(request.tasks().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignRequest {
    /// Tasks, in input order.
    pub tasks: Vec<TaskId>,
    /// Pairs of tasks that must not share a machine.
    pub conflicts: Vec<(TaskId, TaskId)>,
    /// Task durations; missing tasks default to [`DEFAULT_DURATION`].
    pub durations: HashMap<TaskId, f64>,
    /// Maximum number of tasks per machine.
    pub task_capacities: BTreeMap<MachineId, usize>,
    /// Maximum cumulative duration per machine.
    pub time_capacities: BTreeMap<MachineId, f64>,
    /// Hard cap on the number of machines available.
    pub hard_machine_cap: Option<usize>,
}

impl AssignRequest {
    pub fn new<I, T>(tasks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        Self {
            tasks: tasks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_conflict(mut self, a: impl Into<TaskId>, b: impl Into<TaskId>) -> Self {
        self.conflicts.push((a.into(), b.into()));
        self
    }

    pub fn with_conflicts<I, T>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, T)>,
        T: Into<TaskId>,
    {
        self.conflicts
            .extend(pairs.into_iter().map(|(a, b)| (a.into(), b.into())));
        self
    }

    pub fn with_duration(mut self, task: impl Into<TaskId>, duration: f64) -> Self {
        self.durations.insert(task.into(), duration);
        self
    }

    pub fn with_task_capacity(mut self, machine: usize, capacity: usize) -> Self {
        self.task_capacities.insert(MachineId(machine), capacity);
        self
    }

    pub fn with_time_capacity(mut self, machine: usize, capacity: f64) -> Self {
        self.time_capacities.insert(MachineId(machine), capacity);
        self
    }

    pub fn with_hard_cap(mut self, cap: usize) -> Self {
        self.hard_machine_cap = Some(cap);
        self
    }

    /// Checks references and numeric ranges.
    pub fn validate(&self) -> Result<(), AssignError> {
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if !seen.insert(task) {
                return Err(AssignError::DuplicateTask(task.clone()));
            }
        }

        for (a, b) in &self.conflicts {
            for id in [a, b] {
                if !seen.contains(id) {
                    return Err(AssignError::UnknownTask(id.clone()));
                }
            }
            if a == b {
                return Err(AssignError::SelfConflict(a.clone()));
            }
        }

        for (task, &duration) in &self.durations {
            if !seen.contains(task) {
                return Err(AssignError::UnknownTask(task.clone()));
            }
            if !(duration.is_finite() && duration > 0.0) {
                return Err(AssignError::InvalidDuration {
                    task: task.clone(),
                    duration,
                });
            }
        }

        for (&machine, &capacity) in &self.time_capacities {
            if !(capacity.is_finite() && capacity > 0.0) {
                return Err(AssignError::InvalidTimeCapacity { machine, capacity });
            }
        }
        Ok(())
    }

    /// Tasks in input order, with durations defaulted.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|id| Task {
                id: id.clone(),
                duration: self
                    .durations
                    .get(id)
                    .copied()
                    .unwrap_or(DEFAULT_DURATION),
            })
            .collect()
    }

    /// Whether the caller supplied any capacity limit.
    pub fn has_capacities(&self) -> bool {
        !self.task_capacities.is_empty() || !self.time_capacities.is_empty()
    }
}

/// A task → machine mapping.
///
/// Every task appears once. Iteration and grouping are ordered by task id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    machines: BTreeMap<TaskId, MachineId>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `task` to `machine`, replacing any earlier choice.
    pub fn insert(&mut self, task: TaskId, machine: MachineId) {
        self.machines.insert(task, machine);
    }

    pub fn machine_of(&self, task: &TaskId) -> Option<MachineId> {
        self.machines.get(task).copied()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, MachineId)> {
        self.machines.iter().map(|(t, &m)| (t, m))
    }

    /// Machines hosting at least one task.
    pub fn used_machines(&self) -> BTreeSet<MachineId> {
        self.machines.values().copied().collect()
    }

    /// Tasks grouped by machine.
    pub fn by_machine(&self) -> BTreeMap<MachineId, Vec<TaskId>> {
        let mut groups: BTreeMap<MachineId, Vec<TaskId>> = BTreeMap::new();
        for (task, &machine) in &self.machines {
            groups.entry(machine).or_default().push(task.clone());
        }
        groups
    }
}

impl FromIterator<(TaskId, MachineId)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (TaskId, MachineId)>>(iter: I) -> Self {
        Self {
            machines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_conversions() {
        assert_eq!(TaskId::from("T1").as_str(), "T1");
        assert_eq!(TaskId::from(7usize), TaskId::new("7"));
        assert_eq!(TaskId::from(String::from("x")).to_string(), "x");
    }

    #[test]
    fn test_durations_default() {
        let request = AssignRequest::new(["a", "b"]).with_duration("b", 3.0);
        let tasks = request.tasks();
        assert_eq!(tasks[0].duration, DEFAULT_DURATION);
        assert_eq!(tasks[1].duration, 3.0);
    }

    #[test]
    fn test_duplicate_task() {
        let request = AssignRequest::new(["a", "a"]);
        assert_eq!(
            request.validate(),
            Err(AssignError::DuplicateTask(TaskId::from("a")))
        );
    }

    #[test]
    fn test_unknown_conflict_task() {
        let request = AssignRequest::new(["a"]).with_conflict("a", "z");
        assert_eq!(
            request.validate(),
            Err(AssignError::UnknownTask(TaskId::from("z")))
        );
    }

    #[test]
    fn test_self_conflict() {
        let request = AssignRequest::new(["a"]).with_conflict("a", "a");
        assert!(matches!(
            request.validate(),
            Err(AssignError::SelfConflict(_))
        ));
    }

    #[test]
    fn test_invalid_duration() {
        let request = AssignRequest::new(["a"]).with_duration("a", 0.0);
        assert!(matches!(
            request.validate(),
            Err(AssignError::InvalidDuration { .. })
        ));
        let request = AssignRequest::new(["a"]).with_duration("b", 1.0);
        assert!(matches!(request.validate(), Err(AssignError::UnknownTask(_))));
    }

    #[test]
    fn test_invalid_time_capacity() {
        let request = AssignRequest::new(["a"]).with_time_capacity(1, f64::INFINITY);
        assert!(matches!(
            request.validate(),
            Err(AssignError::InvalidTimeCapacity { machine: MachineId(1), .. })
        ));
    }

    #[test]
    fn test_empty_request_is_valid() {
        let request = AssignRequest::new(Vec::<TaskId>::new());
        assert!(request.validate().is_ok());
        assert!(!request.has_capacities());
    }

    #[test]
    fn test_assignment_grouping() {
        let assignment: Assignment = [
            (TaskId::from("b"), MachineId(1)),
            (TaskId::from("a"), MachineId(0)),
            (TaskId::from("c"), MachineId(1)),
        ]
        .into_iter()
        .collect();

        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.machine_of(&TaskId::from("c")), Some(MachineId(1)));
        assert_eq!(
            assignment.used_machines().into_iter().collect::<Vec<_>>(),
            vec![MachineId(0), MachineId(1)]
        );
        let groups = assignment.by_machine();
        assert_eq!(groups[&MachineId(1)], vec![TaskId::from("b"), TaskId::from("c")]);
    }
}
