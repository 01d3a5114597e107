//! Machine-assignment model construction.

use super::capacity::CapacityTable;
use super::problem::AssignProblem;
use super::types::MachineId;
use crate::graph::maximal_cliques;
use crate::mip::{LinearExpr, MipModel, Objective, VarId};

/// A built assignment model together with its variable layout.
///
/// `x[t][m]` is 1 when task `t` (input position) runs on machine `m`;
/// `y[m]` is 1 when machine `m` is used.
#[derive(Debug, Clone)]
pub struct AssignmentModel {
    /// The solver-ready model.
    pub model: MipModel,
    /// Assignment variables, `[task][machine]`.
    pub x: Vec<Vec<VarId>>,
    /// Machine usage indicators.
    pub y: Vec<VarId>,
    /// Number of maximal cliques turned into exclusion rows.
    pub clique_count: usize,
}

impl AssignmentModel {
    /// Number of candidate machines.
    pub fn machine_count(&self) -> usize {
        self.y.len()
    }
}

/// Assembles the 0-1 model for one problem instance.
///
/// Minimizes `Σ y[m]` subject to:
///
/// 1. every task on exactly one machine;
/// 2. for every maximal clique `C` and machine `m`: `Σ_{t∈C} x[t,m] <= y[m]`,
///    which both activates `y[m]` and allows at most one clique member
///    per machine;
/// 3. `x[t,m] <= y[m]`;
/// 4. `y[m] >= y[m+1]`, so used machines form a prefix;
/// 5. `Σ_t x[t,m] <= task_capacity[m] · y[m]`;
/// 6. `Σ_t duration[t] · x[t,m] <= time_capacity[m] · y[m]`;
/// 7. `Σ y[m] <= hard_cap` when a cap is given;
/// 8. `Σ y[m] >= lower_bound`.
///
/// With the warm start enabled, task `i` is hinted onto machine
/// `i mod machine_count`. The hint ignores conflicts and capacities.
///
/// # Examples
///
/// ```
/// use u_assign::assign::{lower_bound, AssignProblem, AssignRequest, CapacityTable, ModelBuilder};
///
/// let request = AssignRequest::new(["T1", "T2", "T3"]).with_conflict("T1", "T2");
/// let problem = AssignProblem::from_request(&request).unwrap();
/// let machines = problem.candidate_machines();
/// let capacities = CapacityTable::normalize(
///     machines,
///     &problem.task_capacities,
///     &problem.time_capacities,
///     problem.task_count(),
///     problem.total_duration(),
/// );
/// let built = ModelBuilder::new(&problem, &capacities, 1).build();
///
/// assert_eq!(built.machine_count(), 2);
/// assert_eq!(built.model.var_count(), 3 * 2 + 2);
/// ```
pub struct ModelBuilder<'a> {
    problem: &'a AssignProblem,
    capacities: &'a CapacityTable,
    lower_bound: usize,
    warm_start: bool,
}

impl<'a> ModelBuilder<'a> {
    /// The candidate machine count is taken from `capacities`.
    pub fn new(problem: &'a AssignProblem, capacities: &'a CapacityTable, lower_bound: usize) -> Self {
        Self {
            problem,
            capacities,
            lower_bound,
            warm_start: true,
        }
    }

    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    /// Builds a fresh model.
    pub fn build(&self) -> AssignmentModel {
        let tasks = &self.problem.tasks;
        let machines = self.capacities.machine_count();
        let mut model = MipModel::new("machine_assignment");

        let x: Vec<Vec<VarId>> = tasks
            .iter()
            .map(|task| {
                (0..machines)
                    .map(|m| model.add_binary(format!("x_{}_{m}", task.id)))
                    .collect()
            })
            .collect();
        let y: Vec<VarId> = (0..machines)
            .map(|m| model.add_binary(format!("y_{m}")))
            .collect();

        model.set_objective(Objective::Minimize(LinearExpr::sum(y.iter().copied())));

        for (t, task) in tasks.iter().enumerate() {
            model.add_eq(
                format!("assign_{}", task.id),
                LinearExpr::sum(x[t].iter().copied()),
                1.0,
            );
        }

        let clique_count = self.add_clique_rows(&mut model, &x, &y);

        for (t, task) in tasks.iter().enumerate() {
            for m in 0..machines {
                let link = LinearExpr::new().with_term(x[t][m], 1.0).with_term(y[m], -1.0);
                model.add_le(format!("link_{}_{m}", task.id), link, 0.0);
            }
        }

        for m in 1..machines {
            let order = LinearExpr::new().with_term(y[m - 1], 1.0).with_term(y[m], -1.0);
            model.add_ge(format!("symmetry_{}", m - 1), order, 0.0);
        }

        for m in 0..machines {
            let machine = MachineId(m);

            let mut count = LinearExpr::sum(x.iter().map(|row| row[m]));
            count.add_term(y[m], -(self.capacities.task_capacity(machine) as f64));
            model.add_le(format!("cap_tasks_{m}"), count, 0.0);

            let mut load = LinearExpr::new();
            for (t, task) in tasks.iter().enumerate() {
                load.add_term(x[t][m], task.duration);
            }
            load.add_term(y[m], -self.capacities.time_capacity(machine));
            model.add_le(format!("cap_time_{m}"), load, 0.0);
        }

        if let Some(cap) = self.problem.hard_machine_cap {
            model.add_le("hard_cap", LinearExpr::sum(y.iter().copied()), cap as f64);
        }
        model.add_ge(
            "lower_bound",
            LinearExpr::sum(y.iter().copied()),
            self.lower_bound as f64,
        );

        if self.warm_start && machines > 0 {
            for t in 0..tasks.len() {
                let m = t % machines;
                model.set_hint(x[t][m], true);
                model.set_hint(y[m], true);
            }
        }

        AssignmentModel {
            model,
            x,
            y,
            clique_count,
        }
    }

    /// Adds `Σ_{t∈C} x[t,m] <= y[m]` for every maximal clique and machine.
    fn add_clique_rows(&self, model: &mut MipModel, x: &[Vec<VarId>], y: &[VarId]) -> usize {
        let cliques = maximal_cliques(&self.problem.graph);
        for (c, clique) in cliques.iter().enumerate() {
            for (m, &used) in y.iter().enumerate() {
                let mut members = LinearExpr::sum(clique.iter().map(|&t| x[t][m]));
                members.add_term(used, -1.0);
                model.add_le(format!("clique_{c}_{m}"), members, 0.0);
            }
        }
        cliques.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::AssignRequest;
    use crate::mip::Sense;

    fn build(request: &AssignRequest, lower_bound: usize, warm_start: bool) -> AssignmentModel {
        let problem = AssignProblem::from_request(request).expect("valid request");
        let capacities = CapacityTable::normalize(
            problem.candidate_machines(),
            &problem.task_capacities,
            &problem.time_capacities,
            problem.task_count(),
            problem.total_duration(),
        );
        ModelBuilder::new(&problem, &capacities, lower_bound)
            .with_warm_start(warm_start)
            .build()
    }

    fn count_prefix(model: &MipModel, prefix: &str) -> usize {
        model
            .constraints
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .count()
    }

    #[test]
    fn test_layout_and_counts() {
        let request = AssignRequest::new(["T1", "T2", "T3"]).with_conflict("T1", "T2");
        let built = build(&request, 1, false);

        // 2 candidate machines: Brooks bound of a single edge.
        assert_eq!(built.machine_count(), 2);
        assert_eq!(built.x.len(), 3);
        assert_eq!(built.model.var_count(), 8);
        // Cliques {T1,T2} and {T3}.
        assert_eq!(built.clique_count, 2);

        let model = &built.model;
        assert_eq!(count_prefix(model, "assign_"), 3);
        assert_eq!(count_prefix(model, "clique_"), 2 * 2);
        assert_eq!(count_prefix(model, "link_"), 3 * 2);
        assert_eq!(count_prefix(model, "symmetry_"), 1);
        assert_eq!(count_prefix(model, "cap_tasks_"), 2);
        assert_eq!(count_prefix(model, "cap_time_"), 2);
        assert_eq!(count_prefix(model, "hard_cap"), 0);
        assert_eq!(count_prefix(model, "lower_bound"), 1);
        assert!(model.hint.is_empty());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_hard_cap_row() {
        let request = AssignRequest::new(["a", "b"]).with_conflict("a", "b").with_hard_cap(5);
        let built = build(&request, 1, false);
        let cap = built
            .model
            .constraints
            .iter()
            .find(|c| c.name == "hard_cap")
            .expect("hard cap row");
        assert_eq!(cap.sense, Sense::LessEq);
        assert_eq!(cap.rhs, 5.0);
    }

    #[test]
    fn test_time_capacity_row_uses_durations() {
        let request = AssignRequest::new(["a", "b"])
            .with_duration("a", 2.0)
            .with_duration("b", 3.0)
            .with_time_capacity(0, 4.0);
        let built = build(&request, 2, false);
        let row = built
            .model
            .constraints
            .iter()
            .find(|c| c.name == "cap_time_0")
            .expect("time row");

        // Both tasks on machine 0 overload it.
        let mut values = vec![0.0; built.model.var_count()];
        values[built.x[0][0].index()] = 1.0;
        values[built.x[1][0].index()] = 1.0;
        values[built.y[0].index()] = 1.0;
        assert!(!row.is_satisfied(&values, 1e-9));

        values[built.x[1][0].index()] = 0.0;
        assert!(row.is_satisfied(&values, 1e-9));
    }

    #[test]
    fn test_warm_start_round_robin() {
        let request = AssignRequest::new(["a", "b", "c"])
            .with_conflict("a", "b")
            .with_conflict("b", "c");
        let built = build(&request, 1, true);
        let hint = &built.model.hint;

        assert_eq!(built.machine_count(), 3);
        assert_eq!(hint.get(&built.x[0][0]), Some(&true));
        assert_eq!(hint.get(&built.x[1][1]), Some(&true));
        assert_eq!(hint.get(&built.x[2][2]), Some(&true));
        assert!(built.y.iter().all(|y| hint.get(y) == Some(&true)));
    }

    #[test]
    fn test_empty_problem() {
        let request = AssignRequest::new(Vec::<String>::new());
        let built = build(&request, 0, true);
        assert_eq!(built.machine_count(), 1);
        assert_eq!(built.clique_count, 0);
        assert!(built.x.is_empty());
        assert!(built.model.hint.is_empty());
    }
}
