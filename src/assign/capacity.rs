//! Capacity defaults and the bin-packing lower bound.

use super::types::MachineId;
use std::collections::BTreeMap;

/// Numerical slack when rounding the lower bound up.
const ROUNDING_TOL: f64 = 1e-9;

/// Per-machine capacities for every candidate machine.
///
/// Built by [`CapacityTable::normalize`], which fills the gaps left by the
/// caller:
///
/// - an empty map gives every machine an unlimited default (all tasks,
///   total duration);
/// - a partial map gives missing machines the largest value present in the
///   map, not the unlimited default.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_assign::assign::{CapacityTable, MachineId};
///
/// let task_caps = BTreeMap::from([(MachineId(0), 2), (MachineId(1), 5)]);
/// let table = CapacityTable::normalize(3, &task_caps, &BTreeMap::new(), 6, 9.0);
///
/// assert_eq!(table.task_capacity(MachineId(2)), 5); // max of the map
/// assert_eq!(table.time_capacity(MachineId(2)), 9.0); // unlimited
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityTable {
    task: Vec<usize>,
    time: Vec<f64>,
}

impl CapacityTable {
    /// Fills capacities for machines `0..machine_count`.
    ///
    /// Map entries at or beyond `machine_count` are not candidates and are
    /// ignored, except that they still count when taking the maximum for
    /// defaults.
    pub fn normalize(
        machine_count: usize,
        task_capacities: &BTreeMap<MachineId, usize>,
        time_capacities: &BTreeMap<MachineId, f64>,
        task_count: usize,
        total_duration: f64,
    ) -> Self {
        let task_default = task_capacities
            .values()
            .copied()
            .max()
            .unwrap_or(task_count);
        let time_default = time_capacities
            .values()
            .copied()
            .reduce(f64::max)
            .unwrap_or(total_duration);

        let task = (0..machine_count)
            .map(|m| {
                task_capacities
                    .get(&MachineId(m))
                    .copied()
                    .unwrap_or(task_default)
            })
            .collect();
        let time = (0..machine_count)
            .map(|m| {
                time_capacities
                    .get(&MachineId(m))
                    .copied()
                    .unwrap_or(time_default)
            })
            .collect();

        Self { task, time }
    }

    /// Number of candidate machines.
    pub fn machine_count(&self) -> usize {
        self.task.len()
    }

    /// Task-count capacity of `machine`.
    ///
    /// # Panics
    /// Panics if `machine` is not a candidate.
    pub fn task_capacity(&self, machine: MachineId) -> usize {
        self.task[machine.0]
    }

    /// Time capacity of `machine`.
    ///
    /// # Panics
    /// Panics if `machine` is not a candidate.
    pub fn time_capacity(&self, machine: MachineId) -> f64 {
        self.time[machine.0]
    }

    /// Largest time capacity over the candidates, if there are any.
    pub fn max_time_capacity(&self) -> Option<f64> {
        self.time.iter().copied().reduce(f64::max)
    }
}

/// Bin-packing relaxation bound on the number of machines.
///
/// `ceil(total_duration / max_time_capacity)`, ignoring conflicts and
/// task-count limits. Zero when there is nothing to schedule. Without a
/// usable capacity the machines are treated as unlimited, which gives 1.
///
/// # Examples
///
/// ```
/// use u_assign::assign::lower_bound;
///
/// assert_eq!(lower_bound(10.0, 3.0), 4);
/// assert_eq!(lower_bound(3.0, 3.0), 1);
/// assert_eq!(lower_bound(0.0, 3.0), 0);
/// ```
pub fn lower_bound(total_duration: f64, max_time_capacity: f64) -> usize {
    if total_duration <= 0.0 {
        return 0;
    }
    if !(max_time_capacity.is_finite() && max_time_capacity > 0.0) {
        return 1;
    }
    (total_duration / max_time_capacity - ROUNDING_TOL).ceil().max(1.0) as usize
}
