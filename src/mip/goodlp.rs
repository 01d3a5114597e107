//! `good_lp` backend (pure-Rust `microlp` solver).

use super::model::{MipModel, Objective, Sense, VarId};
use super::solver::{MipSolution, MipSolver, SolverConfig, SolverStatus};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Solves 0-1 models with `good_lp` and its `microlp` backend.
///
/// `microlp` has neither a time limit nor start hints. The solve runs on a
/// worker thread and the caller waits up to the configured time limit;
/// past it the solution is reported as [`SolverStatus::Timeout`] and the
/// worker's eventual answer is dropped. Hints are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }
}

/// What the worker thread sends back.
enum Outcome {
    Solved(Vec<f64>),
    Infeasible,
    Failed(String),
}

impl MipSolver for GoodLpSolver {
    fn solve(&self, model: &MipModel, config: &SolverConfig) -> MipSolution {
        if let Err(e) = model.validate() {
            return MipSolution::failed(SolverStatus::ModelInvalid, e);
        }
        if let Err(e) = config.validate() {
            return MipSolution::failed(SolverStatus::Error, format!("invalid solver config: {e}"));
        }

        let start_time = Instant::now();
        let owned = model.clone();
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(format!("good_lp-{}", model.name))
            .spawn(move || {
                // The receiver may be gone after a timeout; nothing to do then.
                let _ = tx.send(run_microlp(&owned));
            });
        if let Err(e) = spawned {
            return MipSolution::failed(SolverStatus::Error, format!("cannot spawn solver thread: {e}"));
        }

        let limit = Duration::from_millis(config.time_limit_ms as u64);
        let mut solution = match rx.recv_timeout(limit) {
            Ok(Outcome::Solved(values)) => {
                let mut s = MipSolution::empty(SolverStatus::Optimal);
                s.objective_value = Some(model.objective_value(&values));
                s.values = values;
                s
            }
            Ok(Outcome::Infeasible) => MipSolution::empty(SolverStatus::Infeasible),
            Ok(Outcome::Failed(message)) => MipSolution::failed(SolverStatus::Error, message),
            Err(mpsc::RecvTimeoutError::Timeout) => MipSolution::empty(SolverStatus::Timeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                MipSolution::failed(SolverStatus::Error, "solver thread panicked")
            }
        };
        solution.solve_time_ms = start_time.elapsed().as_millis() as i64;
        debug!(model = %model.name, status = ?solution.status, "good_lp finished");
        solution
    }
}

fn run_microlp(model: &MipModel) -> Outcome {
    let mut problem_vars = ProblemVariables::new();
    let vars: Vec<Variable> = model
        .vars
        .iter()
        .map(|v| problem_vars.add(variable().binary().name(v.name.clone())))
        .collect();

    let to_expression = |terms: &[(VarId, f64)]| -> Expression {
        let mut expr = Expression::from(0.0);
        for &(v, a) in terms {
            expr += a * vars[v.index()];
        }
        expr
    };

    let mut problem = match &model.objective {
        Some(Objective::Maximize(e)) => problem_vars.maximise(to_expression(&e.terms)),
        Some(Objective::Minimize(e)) => problem_vars.minimise(to_expression(&e.terms)),
        None => problem_vars.minimise(Expression::from(0.0)),
    }
    .using(microlp);

    for c in &model.constraints {
        let lhs = to_expression(&c.expr.terms);
        let row = match c.sense {
            Sense::LessEq => constraint::leq(lhs, c.rhs),
            Sense::GreaterEq => constraint::geq(lhs, c.rhs),
            Sense::Equal => constraint::eq(lhs, c.rhs),
        };
        problem = problem.with(row);
    }

    match problem.solve() {
        Ok(solved) => Outcome::Solved(vars.iter().map(|&v| solved.value(v)).collect()),
        Err(ResolutionError::Infeasible) => Outcome::Infeasible,
        Err(e) => Outcome::Failed(e.to_string()),
    }
}
