//! Exact depth-first branch and bound for 0-1 models.

use super::model::{MipModel, Objective, Sense};
use super::solver::{MipSolution, MipSolver, SolverConfig, SolverStatus};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Numerical slack for row checks.
const EPS: f64 = 1e-9;

/// Tolerance when checking a complete solution or hint against the model.
const FEASIBILITY_TOL: f64 = 1e-6;

const FREE: i8 = -1;

/// An in-process exact solver for pure 0-1 models.
///
/// Depth-first search over the variables in model order. At every node,
/// each linear row is propagated with min-activity reasoning: a row
/// `Σ a·x <= b` whose smallest reachable activity already exceeds `b`
/// fails the node, and a free variable whose unfavorable value would push
/// the minimum over `b` is fixed to the other value. Every incumbent
/// tightens an objective cutoff row, so the same propagation prunes by
/// bound.
///
/// Honors the time limit (checked at every node), the relative MIP gap,
/// `stop_after_first`, and the start hint: a hint that satisfies every
/// constraint becomes the first incumbent, any other hint is discarded.
///
/// # Limitations
///
/// - Exponential worst case; intended for models with a few hundred
///   binaries, like conflict graphs with tens of tasks
/// - No LP relaxation: bounds come from propagation only
///
/// # Examples
///
/// ```
/// use u_assign::mip::{
///     BranchAndBoundSolver, LinearExpr, MipModel, MipSolver, Objective, SolverConfig,
///     SolverStatus,
/// };
///
/// let mut model = MipModel::new("knapsack");
/// let a = model.add_binary("a");
/// let b = model.add_binary("b");
/// let c = model.add_binary("c");
/// model.add_le(
///     "weight",
///     LinearExpr::new().with_term(a, 3.0).with_term(b, 2.0).with_term(c, 2.0),
///     4.0,
/// );
/// model.set_objective(Objective::Maximize(
///     LinearExpr::new().with_term(a, 5.0).with_term(b, 3.0).with_term(c, 3.0),
/// ));
///
/// let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.status, SolverStatus::Optimal);
/// assert_eq!(solution.objective_value, Some(6.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    node_limit: Option<u64>,
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search after `limit` nodes, like a time limit.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}

impl MipSolver for BranchAndBoundSolver {
    fn solve(&self, model: &MipModel, config: &SolverConfig) -> MipSolution {
        if let Err(e) = model.validate() {
            return MipSolution::failed(SolverStatus::ModelInvalid, e);
        }
        if let Err(e) = config.validate() {
            return MipSolution::failed(SolverStatus::Error, format!("invalid solver config: {e}"));
        }

        let start_time = Instant::now();
        let deadline =
            start_time.checked_add(Duration::from_millis(config.time_limit_ms.max(0) as u64));

        let mut search = Search::new(model, config, deadline, self.node_limit);
        if config.use_hint && !model.hint.is_empty() {
            search.offer_hint();
        }
        let exhausted = search.run();

        let status = match (&search.incumbent, exhausted) {
            (Some(_), true) => SolverStatus::Optimal,
            (Some(_), false) => SolverStatus::Feasible,
            (None, true) => SolverStatus::Infeasible,
            (None, false) => SolverStatus::Timeout,
        };
        debug!(
            model = %model.name,
            nodes = search.nodes,
            ?status,
            "branch and bound finished"
        );

        let mut solution = MipSolution::empty(status);
        solution.nodes = search.nodes;
        if let Some(values) = search.incumbent.take() {
            solution.objective_value = Some(model.objective_value(&values));
            solution.values = values;
        }
        solution.solve_time_ms = start_time.elapsed().as_millis() as i64;
        solution
    }
}

/// A row `Σ a·x <= rhs` over variable indices.
struct Row {
    terms: Vec<(usize, f64)>,
    rhs: f64,
}

impl Row {
    /// Merges repeated variables so each appears once.
    fn new(terms: &[(usize, f64)], rhs: f64, sign: f64) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for &(v, a) in terms {
            *merged.entry(v).or_insert(0.0) += sign * a;
        }
        Self {
            terms: merged.into_iter().filter(|&(_, a)| a != 0.0).collect(),
            rhs: sign * rhs,
        }
    }
}

struct Search<'a> {
    model: &'a MipModel,
    rows: Vec<Row>,
    /// Index of the objective cutoff row (always the last row).
    cutoff: usize,
    var_rows: Vec<Vec<usize>>,
    /// Objective coefficients in minimization sense.
    cost: Vec<f64>,
    integral_cost: bool,
    values: Vec<i8>,
    trail: Vec<usize>,
    incumbent: Option<Vec<f64>>,
    mip_gap: f64,
    stop_after_first: bool,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    nodes: u64,
    stopped: bool,
}

impl<'a> Search<'a> {
    fn new(
        model: &'a MipModel,
        config: &SolverConfig,
        deadline: Option<Instant>,
        node_limit: Option<u64>,
    ) -> Self {
        let n = model.var_count();
        let mut rows = Vec::new();
        for c in &model.constraints {
            let terms: Vec<(usize, f64)> =
                c.expr.terms.iter().map(|&(v, a)| (v.index(), a)).collect();
            match c.sense {
                Sense::LessEq => rows.push(Row::new(&terms, c.rhs, 1.0)),
                Sense::GreaterEq => rows.push(Row::new(&terms, c.rhs, -1.0)),
                Sense::Equal => {
                    rows.push(Row::new(&terms, c.rhs, 1.0));
                    rows.push(Row::new(&terms, c.rhs, -1.0));
                }
            }
        }

        let mut cost = vec![0.0; n];
        let sign = match &model.objective {
            Some(Objective::Maximize(_)) => -1.0,
            _ => 1.0,
        };
        if let Some(objective) = &model.objective {
            for &(v, a) in &objective.expr().terms {
                cost[v.index()] += sign * a;
            }
        }
        let integral_cost = cost.iter().all(|c| (c - c.round()).abs() < EPS);
        let cost_terms: Vec<(usize, f64)> = cost
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0.0)
            .map(|(v, &c)| (v, c))
            .collect();
        rows.push(Row {
            terms: cost_terms,
            rhs: f64::INFINITY,
        });
        let cutoff = rows.len() - 1;

        let mut var_rows = vec![Vec::new(); n];
        for (r, row) in rows.iter().enumerate() {
            for &(v, _) in &row.terms {
                var_rows[v].push(r);
            }
        }

        Self {
            model,
            rows,
            cutoff,
            var_rows,
            cost,
            integral_cost,
            values: vec![FREE; n],
            trail: Vec::new(),
            incumbent: None,
            mip_gap: config.mip_gap,
            stop_after_first: config.stop_after_first,
            deadline,
            node_limit,
            nodes: 0,
            stopped: false,
        }
    }

    /// Accepts the model's hint as the first incumbent if it is feasible.
    fn offer_hint(&mut self) {
        let values = self.model.hint_values();
        if self.model.is_feasible(&values, FEASIBILITY_TOL) {
            debug!(model = %self.model.name, "start hint accepted as incumbent");
            self.accept(values);
        } else {
            debug!(model = %self.model.name, "start hint violates the model, discarded");
        }
    }

    /// Runs the search. Returns `true` if the tree was fully explored.
    fn run(&mut self) -> bool {
        if self.stop_after_first && self.incumbent.is_some() {
            return false;
        }
        let all_rows: Vec<usize> = (0..self.rows.len()).collect();
        if self.propagate(all_rows) {
            self.dfs();
        }
        !self.stopped
    }

    fn dfs(&mut self) {
        if self.should_stop() {
            return;
        }
        self.nodes += 1;

        let Some(var) = self.values.iter().position(|&v| v == FREE) else {
            self.record_leaf();
            return;
        };

        let first: i8 = if self.cost[var] > 0.0 { 0 } else { 1 };
        for value in [first, 1 - first] {
            let mark = self.trail.len();
            if self.assign(var, value) {
                self.dfs();
            }
            self.undo(mark);
            if self.stopped {
                return;
            }
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let out_of_time = self.deadline.is_some_and(|d| Instant::now() >= d);
        let out_of_nodes = self.node_limit.is_some_and(|limit| self.nodes >= limit);
        if out_of_time || out_of_nodes {
            self.stopped = true;
        }
        self.stopped
    }

    fn assign(&mut self, var: usize, value: i8) -> bool {
        self.fix(var, value);
        let mut pending = self.var_rows[var].clone();
        pending.push(self.cutoff);
        self.propagate(pending)
    }

    fn fix(&mut self, var: usize, value: i8) {
        self.values[var] = value;
        self.trail.push(var);
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.values[var] = FREE;
            }
        }
    }

    /// Propagates rows to a fixpoint. Returns `false` on a conflict.
    fn propagate(&mut self, mut pending: Vec<usize>) -> bool {
        let mut queued = vec![false; self.rows.len()];
        for &r in &pending {
            queued[r] = true;
        }

        while let Some(r) = pending.pop() {
            queued[r] = false;
            let row = &self.rows[r];

            let mut min_activity = 0.0;
            for &(v, a) in &row.terms {
                match self.values[v] {
                    1 => min_activity += a,
                    0 => {}
                    _ => min_activity += a.min(0.0),
                }
            }
            if min_activity > row.rhs + EPS {
                return false;
            }

            let forced: Vec<(usize, i8)> = row
                .terms
                .iter()
                .filter(|&&(v, _)| self.values[v] == FREE)
                .filter_map(|&(v, a)| {
                    if a > 0.0 && min_activity + a > row.rhs + EPS {
                        Some((v, 0))
                    } else if a < 0.0 && min_activity - a > row.rhs + EPS {
                        Some((v, 1))
                    } else {
                        None
                    }
                })
                .collect();

            for (v, value) in forced {
                self.fix(v, value);
                for &other in &self.var_rows[v] {
                    if !queued[other] {
                        queued[other] = true;
                        pending.push(other);
                    }
                }
            }
        }
        true
    }

    fn record_leaf(&mut self) {
        let values: Vec<f64> = self.values.iter().map(|&v| f64::from(v)).collect();
        if !self.model.is_feasible(&values, FEASIBILITY_TOL) {
            return;
        }
        self.accept(values);
        if self.stop_after_first {
            self.stopped = true;
        }
    }

    /// Stores a new incumbent and tightens the cutoff row below it.
    fn accept(&mut self, values: Vec<f64>) {
        let objective: f64 = self
            .cost
            .iter()
            .zip(&values)
            .map(|(c, x)| c * x)
            .sum();
        let step = if self.integral_cost { 1.0 } else { FEASIBILITY_TOL };
        let gap = self.mip_gap * objective.abs();
        self.rows[self.cutoff].rhs = objective - step.max(gap);
        self.incumbent = Some(values);
    }
}
