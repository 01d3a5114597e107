//! Assignment invocation: build, solve, extract.
//!
//! [`AssignRunner`] orchestrates one invocation end to end:
//! validation → conflict graph → capacities and bounds → model → solver →
//! extraction → verification. Every invocation owns its model; nothing
//! is shared between calls.

use super::builder::ModelBuilder;
use super::capacity::{lower_bound, CapacityTable};
use super::check::check_assignment;
use super::config::AssignConfig;
use super::extract::extract;
use super::problem::AssignProblem;
use super::result::{AssignResult, AssignStatus, Diagnostics};
use super::summary::machine_loads;
use super::types::AssignRequest;
use crate::error::AssignError;
use crate::mip::{BranchAndBoundSolver, MipSolver, SolverStatus};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Stage reached by a running invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SolvePhase {
    /// Conflict graph and bounds are known.
    GraphBuilt {
        max_degree: usize,
        candidate_machines: usize,
        lower_bound: usize,
    },
    /// The model is assembled.
    ModelBuilt { variables: usize, constraints: usize },
    /// The solver is running.
    Solving,
    /// Reading the assignment back.
    Extracting,
}

/// Message sent by a spawned invocation.
#[derive(Debug, Clone)]
pub enum SolveEvent {
    Progress(SolvePhase),
    Finished(AssignResult),
    Failed(AssignError),
}

/// Handle to an invocation running on a worker thread.
///
/// There is no cancellation: dropping the handle abandons the result,
/// and the worker stops on its own at the time limit.
#[derive(Debug)]
pub struct AssignHandle {
    events: Receiver<SolveEvent>,
    worker: JoinHandle<()>,
}

impl AssignHandle {
    /// Progress and completion events, in order. The last event is
    /// always `Finished` or `Failed`.
    pub fn events(&self) -> &Receiver<SolveEvent> {
        &self.events
    }

    /// Blocks until the invocation completes.
    pub fn wait(self) -> Result<AssignResult, AssignError> {
        let AssignHandle { events, worker } = self;
        let outcome = events
            .iter()
            .find_map(|event| match event {
                SolveEvent::Progress(_) => None,
                SolveEvent::Finished(result) => Some(Ok(result)),
                SolveEvent::Failed(error) => Some(Err(error)),
            })
            .unwrap_or(Err(AssignError::WorkerLost));
        if worker.join().is_err() {
            return Err(AssignError::WorkerLost);
        }
        outcome
    }
}

/// Runs machine-assignment invocations.
///
/// # Usage
///
/// ```
/// use u_assign::assign::{AssignConfig, AssignRequest, AssignRunner, AssignStatus};
///
/// let request = AssignRequest::new(["T1", "T2", "T3"]).with_conflict("T1", "T2");
/// let result = AssignRunner::solve(&request, &AssignConfig::default()).unwrap();
///
/// assert_eq!(result.status, AssignStatus::Optimal);
/// assert_eq!(result.machines_used, 2);
/// ```
pub struct AssignRunner;

impl AssignRunner {
    /// Solves with the built-in [`BranchAndBoundSolver`].
    pub fn solve(request: &AssignRequest, config: &AssignConfig) -> Result<AssignResult, AssignError> {
        Self::solve_with(request, config, &BranchAndBoundSolver::new())
    }

    /// Solves with the given backend.
    ///
    /// Returns `Err` only for malformed input or configuration. Solver
    /// outcomes, including failures, are reported through
    /// [`AssignResult::status`].
    pub fn solve_with<S: MipSolver + ?Sized>(
        request: &AssignRequest,
        config: &AssignConfig,
        solver: &S,
    ) -> Result<AssignResult, AssignError> {
        Self::run_observed(request, config, solver, &mut |_| {})
    }

    /// Starts an invocation on a worker thread.
    ///
    /// Progress, the result, or the error arrive on the handle's channel.
    pub fn spawn<S: MipSolver + 'static>(
        request: AssignRequest,
        config: AssignConfig,
        solver: S,
    ) -> Result<AssignHandle, AssignError> {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("u-assign-worker".into())
            .spawn(move || {
                let mut notify = |phase| {
                    let _ = tx.send(SolveEvent::Progress(phase));
                };
                let event = match Self::run_observed(&request, &config, &solver, &mut notify) {
                    Ok(result) => SolveEvent::Finished(result),
                    Err(error) => SolveEvent::Failed(error),
                };
                // A dropped handle means nobody is listening.
                let _ = tx.send(event);
            })
            .map_err(|e| AssignError::Spawn(e.to_string()))?;

        Ok(AssignHandle { events: rx, worker })
    }

    /// Solves independent requests, each with its own model.
    ///
    /// Runs in parallel with the `parallel` feature. Results are in
    /// request order.
    pub fn solve_batch<S: MipSolver + ?Sized>(
        requests: &[AssignRequest],
        config: &AssignConfig,
        solver: &S,
    ) -> Vec<Result<AssignResult, AssignError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            requests
                .par_iter()
                .map(|request| Self::solve_with(request, config, solver))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            requests
                .iter()
                .map(|request| Self::solve_with(request, config, solver))
                .collect()
        }
    }

    fn run_observed<S: MipSolver + ?Sized>(
        request: &AssignRequest,
        config: &AssignConfig,
        solver: &S,
        on_phase: &mut dyn FnMut(SolvePhase),
    ) -> Result<AssignResult, AssignError> {
        config.validate().map_err(AssignError::Config)?;
        let started = Instant::now();
        let problem = AssignProblem::from_request(request)?;
        info!(
            tasks = problem.task_count(),
            conflicts = problem.graph.edge_count(),
            hard_cap = ?problem.hard_machine_cap,
            "solving machine assignment"
        );

        // 1. Bounds
        let candidates = problem.candidate_machines();
        let total_duration = problem.total_duration();
        let capacities = CapacityTable::normalize(
            candidates,
            &problem.task_capacities,
            &problem.time_capacities,
            problem.task_count(),
            total_duration,
        );
        let max_time = capacities.max_time_capacity().unwrap_or(total_duration);
        let lower = lower_bound(total_duration, max_time);
        let exceeds_cap = problem.hard_machine_cap.is_some_and(|cap| lower > cap);
        if exceeds_cap {
            warn!(
                lower_bound = lower,
                hard_cap = ?problem.hard_machine_cap,
                "lower bound exceeds the machine cap, the model cannot be feasible"
            );
        }
        let max_degree = problem.graph.max_degree();
        debug!(
            max_degree,
            brooks_bound = problem.brooks_bound(),
            candidates,
            lower_bound = lower,
            "conflict graph built"
        );
        on_phase(SolvePhase::GraphBuilt {
            max_degree,
            candidate_machines: candidates,
            lower_bound: lower,
        });

        // 2. Model
        let built = ModelBuilder::new(&problem, &capacities, lower)
            .with_warm_start(config.warm_start)
            .build();
        built.model.validate().map_err(AssignError::Model)?;
        let mut diagnostics = Diagnostics {
            lower_bound: lower,
            brooks_bound: problem.brooks_bound(),
            max_degree,
            candidate_machines: candidates,
            clique_count: built.clique_count,
            variables: built.model.var_count(),
            constraints: built.model.constraint_count(),
            lower_bound_exceeds_cap: exceeds_cap,
            ..Diagnostics::default()
        };
        debug!(
            variables = diagnostics.variables,
            constraints = diagnostics.constraints,
            cliques = diagnostics.clique_count,
            "assignment model built"
        );
        on_phase(SolvePhase::ModelBuilt {
            variables: diagnostics.variables,
            constraints: diagnostics.constraints,
        });

        // 3. Solve
        on_phase(SolvePhase::Solving);
        let solution = solver.solve(&built.model, &config.solver_config());
        diagnostics.nodes = solution.nodes;
        diagnostics.solve_time_ms = solution.solve_time_ms;

        let context = format!(
            "{} tasks, {} candidate machines, lower bound {}, hard cap {}",
            problem.task_count(),
            candidates,
            lower,
            problem
                .hard_machine_cap
                .map_or_else(|| "none".to_string(), |cap| cap.to_string()),
        );

        // 4. Extract
        let result = match solution.status {
            SolverStatus::Optimal | SolverStatus::Feasible => {
                on_phase(SolvePhase::Extracting);
                let status = if solution.status == SolverStatus::Optimal {
                    AssignStatus::Optimal
                } else {
                    AssignStatus::TimeLimit
                };
                match extract(&problem, &built, &solution) {
                    Err(message) => AssignResult::failure(
                        AssignStatus::Error,
                        diagnostics,
                        format!("unusable solver output ({context}): {message}"),
                    ),
                    Ok((assignment, machines_used)) => {
                        let verdict = if config.check_solution {
                            check_assignment(&problem, &capacities, &assignment, machines_used)
                        } else {
                            Ok(())
                        };
                        match verdict {
                            Err(violation) => {
                                warn!(%violation, "solver returned an invalid assignment");
                                AssignResult::failure(
                                    AssignStatus::Error,
                                    diagnostics,
                                    format!("solver returned an invalid assignment ({context}): {violation}"),
                                )
                            }
                            Ok(()) => AssignResult {
                                status,
                                loads: machine_loads(&problem, &capacities, &assignment),
                                assignment: Some(assignment),
                                machines_used,
                                diagnostics,
                                reason: None,
                            },
                        }
                    }
                }
            }
            SolverStatus::Infeasible => AssignResult::failure(
                AssignStatus::Infeasible,
                diagnostics,
                format!("no assignment satisfies all constraints ({context})"),
            ),
            SolverStatus::Timeout => AssignResult::failure(
                AssignStatus::Error,
                diagnostics,
                format!(
                    "time limit of {:?} reached before any feasible assignment ({context})",
                    config.time_limit
                ),
            ),
            SolverStatus::ModelInvalid | SolverStatus::Error => AssignResult::failure(
                AssignStatus::Error,
                diagnostics,
                format!(
                    "solver failed ({context}): {}",
                    solution.message.as_deref().unwrap_or("no details")
                ),
            ),
        };

        info!(
            status = ?result.status,
            machines_used = result.machines_used,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "machine assignment finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::{MachineId, TaskId};
    use crate::mip::{MipModel, MipSolution, SolverConfig};
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn solve(request: &AssignRequest, warm_start: bool) -> AssignResult {
        let config = AssignConfig::default().with_warm_start(warm_start);
        AssignRunner::solve(request, &config).expect("valid request")
    }

    fn machine(result: &AssignResult, task: &str) -> MachineId {
        result
            .assignment
            .as_ref()
            .and_then(|a| a.machine_of(&TaskId::from(task)))
            .expect("task assigned")
    }

    fn used_prefix(result: &AssignResult) -> bool {
        let used = result
            .assignment
            .as_ref()
            .map(|a| a.used_machines())
            .unwrap_or_default();
        used == (0..result.machines_used).map(MachineId).collect::<BTreeSet<_>>()
    }

    #[test]
    fn test_single_conflict_needs_two_machines() {
        let request = AssignRequest::new(["T1", "T2", "T3"]).with_conflict("T1", "T2");
        for warm_start in [true, false] {
            let result = solve(&request, warm_start);
            assert_eq!(result.status, AssignStatus::Optimal);
            assert_eq!(result.machines_used, 2);
            assert_ne!(machine(&result, "T1"), machine(&result, "T2"));
            assert_eq!(result.diagnostics.brooks_bound, 2);
            assert_eq!(result.diagnostics.lower_bound, 1);
            assert!(used_prefix(&result));
        }
    }

    #[test]
    fn test_four_clique_needs_four_machines() {
        let tasks = ["a", "b", "c", "d"];
        let mut request = AssignRequest::new(tasks);
        for (i, a) in tasks.iter().enumerate() {
            for b in &tasks[i + 1..] {
                request = request.with_conflict(*a, *b);
            }
        }
        for warm_start in [true, false] {
            let result = solve(&request, warm_start);
            assert_eq!(result.status, AssignStatus::Optimal);
            assert_eq!(result.machines_used, 4);
            assert_eq!(result.diagnostics.clique_count, 1);
            assert!(used_prefix(&result));
        }

        let generous = request.with_task_capacity(0, 10).with_time_capacity(0, 100.0);
        let result = solve(&generous, true);
        assert_eq!(result.machines_used, 4);
    }

    #[test]
    fn test_duration_lower_bound_without_conflicts() {
        let tasks = ["t1", "t2", "t3", "t4", "t5"];
        let mut request = AssignRequest::new(tasks).with_time_capacity(0, 3.0);
        for t in tasks {
            request = request.with_duration(t, 2.0);
        }
        for warm_start in [true, false] {
            let result = solve(&request, warm_start);
            assert_eq!(result.status, AssignStatus::Optimal);
            assert_eq!(result.diagnostics.lower_bound, 4);
            assert_eq!(result.diagnostics.brooks_bound, 1);
            assert_eq!(result.diagnostics.candidate_machines, 5);
            // Two tasks of duration 2 never fit in 3.
            assert_eq!(result.machines_used, 5);
            assert!(result.loads.iter().all(|l| l.task_count() == 1));
        }
    }

    #[test]
    fn test_cap_below_lower_bound_is_infeasible() {
        let tasks = ["t1", "t2", "t3", "t4"];
        let mut request = AssignRequest::new(tasks)
            .with_time_capacity(0, 3.0)
            .with_hard_cap(2);
        for t in tasks {
            request = request.with_duration(t, 3.0);
        }
        let result = solve(&request, true);
        assert_eq!(result.status, AssignStatus::Infeasible);
        assert!(result.assignment.is_none());
        assert_eq!(result.diagnostics.lower_bound, 4);
        assert!(result.diagnostics.lower_bound_exceeds_cap);
        assert!(result.reason.as_deref().is_some_and(|r| r.contains("hard cap 2")));
    }

    #[test]
    fn test_conflicts_beyond_cap_are_infeasible() {
        let request = AssignRequest::new(["a", "b", "c"])
            .with_conflicts([("a", "b"), ("b", "c"), ("a", "c")])
            .with_hard_cap(2);
        let result = solve(&request, false);
        assert_eq!(result.status, AssignStatus::Infeasible);
        assert!(!result.diagnostics.lower_bound_exceeds_cap);
    }

    #[test]
    fn test_task_capacity_splits_machines() {
        let request = AssignRequest::new(["a", "b", "c", "d", "e"]).with_task_capacity(0, 2);
        let result = solve(&request, true);
        assert_eq!(result.status, AssignStatus::Optimal);
        assert_eq!(result.machines_used, 3);
        assert!(result.loads.iter().all(|l| l.task_count() <= 2));
    }

    #[test]
    fn test_empty_task_list() {
        let request = AssignRequest::new(Vec::<String>::new());
        let result = solve(&request, true);
        assert_eq!(result.status, AssignStatus::Optimal);
        assert_eq!(result.machines_used, 0);
        assert!(result.assignment.as_ref().is_some_and(|a| a.is_empty()));
        assert_eq!(result.diagnostics.lower_bound, 0);
    }

    #[test]
    fn test_malformed_request_is_error() {
        let request = AssignRequest::new(["a"]).with_conflict("a", "ghost");
        let err = AssignRunner::solve(&request, &AssignConfig::default()).unwrap_err();
        assert_eq!(err, AssignError::UnknownTask(TaskId::from("ghost")));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let request = AssignRequest::new(["a"]);
        let config = AssignConfig::default().with_mip_gap(2.0);
        assert!(matches!(
            AssignRunner::solve(&request, &config),
            Err(AssignError::Config(_))
        ));
    }

    #[test]
    fn test_incumbent_at_limit_is_time_limit() {
        // The round-robin hint (a→0, b→1, c→0) is feasible; no search runs.
        let request = AssignRequest::new(["a", "b", "c"]).with_conflict("a", "b");
        let solver = BranchAndBoundSolver::new().with_node_limit(0);
        let result = AssignRunner::solve_with(&request, &AssignConfig::default(), &solver)
            .expect("valid request");
        assert_eq!(result.status, AssignStatus::TimeLimit);
        assert!(result.is_success());
        assert!(!result.is_optimal());
        assert_eq!(result.machines_used, 2);
    }

    #[test]
    fn test_limit_without_incumbent_is_error() {
        let request = AssignRequest::new(["a", "b", "c"]).with_conflict("a", "b");
        let solver = BranchAndBoundSolver::new().with_node_limit(0);
        let config = AssignConfig::default().with_warm_start(false);
        let result = AssignRunner::solve_with(&request, &config, &solver).expect("valid request");
        assert_eq!(result.status, AssignStatus::Error);
        assert!(result.reason.as_deref().is_some_and(|r| r.contains("time limit")));
    }

    struct BrokenBackend;

    impl MipSolver for BrokenBackend {
        fn solve(&self, _model: &MipModel, _config: &SolverConfig) -> MipSolution {
            MipSolution::failed(SolverStatus::Error, "license server unreachable")
        }
    }

    struct EverythingOnZero;

    impl MipSolver for EverythingOnZero {
        fn solve(&self, model: &MipModel, _config: &SolverConfig) -> MipSolution {
            let mut solution = MipSolution::empty(SolverStatus::Optimal);
            solution.values = model
                .vars
                .iter()
                .map(|v| if v.name.ends_with("_0") { 1.0 } else { 0.0 })
                .collect();
            solution.objective_value = Some(1.0);
            solution
        }
    }

    #[test]
    fn test_backend_error_is_propagated_verbatim() {
        let request = AssignRequest::new(["a", "b"]).with_conflict("a", "b");
        let result = AssignRunner::solve_with(&request, &AssignConfig::default(), &BrokenBackend)
            .expect("valid request");
        assert_eq!(result.status, AssignStatus::Error);
        let reason = result.reason.unwrap_or_default();
        assert!(reason.contains("license server unreachable"));
        assert!(reason.contains("2 tasks"));
    }

    #[test]
    fn test_invalid_backend_answer_is_rejected() {
        let request = AssignRequest::new(["a", "b"]).with_conflict("a", "b");
        let result =
            AssignRunner::solve_with(&request, &AssignConfig::default(), &EverythingOnZero)
                .expect("valid request");
        assert_eq!(result.status, AssignStatus::Error);
        assert!(result.assignment.is_none());

        let unchecked = AssignConfig::default().with_check_solution(false);
        let result =
            AssignRunner::solve_with(&request, &unchecked, &EverythingOnZero).expect("valid");
        assert_eq!(result.status, AssignStatus::Optimal);
    }

    #[test]
    fn test_spawn_reports_progress_then_result() {
        let request = AssignRequest::new(["T1", "T2", "T3"]).with_conflict("T1", "T2");
        let handle = AssignRunner::spawn(request, AssignConfig::default(), BranchAndBoundSolver::new())
            .expect("worker started");

        let events: Vec<SolveEvent> = handle.events().iter().collect();
        assert!(matches!(
            events.first(),
            Some(SolveEvent::Progress(SolvePhase::GraphBuilt { candidate_machines: 2, .. }))
        ));
        assert!(events
            .iter()
            .any(|e| matches!(e, SolveEvent::Progress(SolvePhase::Solving))));
        match events.last() {
            Some(SolveEvent::Finished(result)) => assert_eq!(result.machines_used, 2),
            other => panic!("unexpected last event: {other:?}"),
        }
    }

    #[test]
    fn test_spawn_wait_reports_errors() {
        let request = AssignRequest::new(["a", "a"]);
        let handle = AssignRunner::spawn(request, AssignConfig::default(), BranchAndBoundSolver::new())
            .expect("worker started");
        assert!(matches!(handle.wait(), Err(AssignError::DuplicateTask(_))));
    }

    #[test]
    fn test_concurrent_invocations_are_independent() {
        let handles: Vec<AssignHandle> = (1..=4)
            .map(|k| {
                let tasks: Vec<String> = (0..k).map(|i| format!("t{i}")).collect();
                let mut request = AssignRequest::new(tasks.clone());
                for i in 0..k {
                    for j in i + 1..k {
                        request = request.with_conflict(tasks[i].as_str(), tasks[j].as_str());
                    }
                }
                AssignRunner::spawn(request, AssignConfig::default(), BranchAndBoundSolver::new())
                    .expect("worker started")
            })
            .collect();

        for (k, handle) in (1..=4).zip(handles) {
            let result = handle.wait().expect("solved");
            assert_eq!(result.machines_used, k);
        }
    }

    #[test]
    fn test_batch_keeps_order() {
        let requests = vec![
            AssignRequest::new(["a", "b"]).with_conflict("a", "b"),
            AssignRequest::new(["x"]).with_conflict("x", "y"),
            AssignRequest::new(["p", "q", "r"]),
        ];
        let results =
            AssignRunner::solve_batch(&requests, &AssignConfig::default(), &BranchAndBoundSolver::new());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(|r| r.machines_used), Ok(2));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().map(|r| r.machines_used), Ok(1));
    }

    #[test]
    fn test_time_limit_config_reaches_solver() {
        let config = AssignConfig::default().with_time_limit(Duration::from_millis(250));
        assert_eq!(config.solver_config().time_limit_ms, 250);
    }

    // ---- properties over small random instances ----

    #[derive(Debug, Clone)]
    struct Instance {
        durations: Vec<u8>,
        conflicts: Vec<(usize, usize)>,
        time_capacity: Option<u8>,
        hard_cap: Option<usize>,
    }

    impl Instance {
        fn request(&self) -> AssignRequest {
            let name = |i: usize| format!("t{i}");
            let mut request = AssignRequest::new((0..self.durations.len()).map(name));
            for (i, &d) in self.durations.iter().enumerate() {
                request = request.with_duration(name(i), f64::from(d));
            }
            for &(a, b) in &self.conflicts {
                request = request.with_conflict(name(a), name(b));
            }
            if let Some(cap) = self.time_capacity {
                request = request.with_time_capacity(0, f64::from(cap));
            }
            if let Some(cap) = self.hard_cap {
                request = request.with_hard_cap(cap);
            }
            request
        }

        fn conflicting(&self, a: usize, b: usize) -> bool {
            self.conflicts
                .iter()
                .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
        }

        /// Fewest machines any valid assignment uses, by exhaustive search.
        fn brute_force_minimum(&self) -> Option<usize> {
            let n = self.durations.len();
            let capacity = self.time_capacity.map_or(f64::INFINITY, f64::from);
            let limit = self.hard_cap.unwrap_or(n).min(n.max(1));
            let mut best = None;
            let mut machine_of = vec![0usize; n];
            let mut loads = Vec::new();
            self.place(0, &mut machine_of, &mut loads, capacity, limit, &mut best);
            best
        }

        fn place(
            &self,
            task: usize,
            machine_of: &mut [usize],
            loads: &mut Vec<f64>,
            capacity: f64,
            limit: usize,
            best: &mut Option<usize>,
        ) {
            if task == machine_of.len() {
                if best.map_or(true, |b| loads.len() < b) {
                    *best = Some(loads.len());
                }
                return;
            }
            let duration = f64::from(self.durations[task]);
            for m in 0..=loads.len() {
                if m == limit {
                    break;
                }
                let clash = (0..task).any(|o| machine_of[o] == m && self.conflicting(o, task));
                let load = loads.get(m).copied().unwrap_or(0.0);
                if clash || load + duration > capacity + 1e-9 {
                    continue;
                }
                machine_of[task] = m;
                if m == loads.len() {
                    loads.push(duration);
                    self.place(task + 1, machine_of, loads, capacity, limit, best);
                    loads.pop();
                } else {
                    loads[m] += duration;
                    self.place(task + 1, machine_of, loads, capacity, limit, best);
                    loads[m] -= duration;
                }
            }
        }
    }

    fn instance() -> impl Strategy<Value = Instance> {
        (1usize..=6)
            .prop_flat_map(|n| {
                (
                    prop::collection::vec(1u8..=3, n),
                    prop::collection::vec((0..n, 0..n), 0..=n * 2),
                    prop::option::of(3u8..=6),
                    prop::option::of(1usize..=6),
                )
            })
            .prop_map(|(durations, pairs, time_capacity, hard_cap)| Instance {
                durations,
                conflicts: pairs.into_iter().filter(|(a, b)| a != b).collect(),
                time_capacity,
                hard_cap,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_solutions_respect_every_invariant(inst in instance()) {
            let request = inst.request();
            let result = solve(&request, true);
            let expected = inst.brute_force_minimum();

            match expected {
                None => prop_assert_eq!(result.status, AssignStatus::Infeasible),
                Some(minimum) => {
                    prop_assert_eq!(result.status, AssignStatus::Optimal);
                    prop_assert_eq!(result.machines_used, minimum);
                }
            }
            if inst.hard_cap.is_none() {
                prop_assert!(result.is_success());
            }

            if let Some(assignment) = &result.assignment {
                // Completeness.
                prop_assert_eq!(assignment.len(), inst.durations.len());
                // Exclusion.
                for &(a, b) in &inst.conflicts {
                    let ma = assignment.machine_of(&TaskId::from(format!("t{a}")));
                    let mb = assignment.machine_of(&TaskId::from(format!("t{b}")));
                    prop_assert_ne!(ma, mb);
                }
                // Capacity.
                for load in &result.loads {
                    prop_assert!(load.task_count() <= load.task_capacity);
                    prop_assert!(load.total_duration <= load.time_capacity + 1e-9);
                }
                // Bounds.
                prop_assert!(result.machines_used >= result.diagnostics.lower_bound);
                if let Some(cap) = inst.hard_cap {
                    prop_assert!(result.machines_used <= cap);
                }
                // Prefix.
                prop_assert!(used_prefix(&result));
            }
        }

        #[test]
        fn prop_warm_start_does_not_change_the_optimum(inst in instance()) {
            let request = inst.request();
            let with_hint = solve(&request, true);
            let without_hint = solve(&request, false);
            prop_assert_eq!(with_hint.status, without_hint.status);
            prop_assert_eq!(with_hint.machines_used, without_hint.machines_used);
        }
    }
}
