//! Conflict-aware machine assignment.
//!
//! Assigns tasks to the fewest machines such that conflicting tasks never
//! share a machine and per-machine capacities hold. The problem is
//! formulated as a 0-1 model and handed to a [`MipSolver`](crate::mip::MipSolver).
//!
//! # Pipeline
//!
//! 1. [`AssignProblem::from_request`] validates input and builds the conflict graph
//! 2. [`CapacityTable::normalize`] and [`lower_bound`] bound the machine count
//! 3. [`ModelBuilder`] emits variables, clique rows, linking, symmetry and capacity rows
//! 4. the solver runs under [`AssignConfig`] limits
//! 5. [`extract`] reads the assignment back and [`check_assignment`] verifies it
//!
//! [`AssignRunner`] drives all of it.
//!
//! # Examples
//!
//! ```
//! use u_assign::assign::{AssignConfig, AssignRequest, AssignRunner};
//!
//! let request = AssignRequest::new(["build", "test", "deploy"])
//!     .with_conflict("build", "deploy")
//!     .with_duration("build", 2.0)
//!     .with_time_capacity(0, 4.0);
//!
//! let result = AssignRunner::solve(&request, &AssignConfig::default()).unwrap();
//! assert!(result.is_success());
//! for (machine, tasks) in result.by_machine() {
//!     println!("{machine}: {tasks:?}");
//! }
//! ```

mod builder;
mod capacity;
mod check;
mod config;
mod extract;
mod problem;
mod result;
mod runner;
mod summary;
mod types;

pub use builder::{AssignmentModel, ModelBuilder};
pub use capacity::{lower_bound, CapacityTable};
pub use check::{check_assignment, Violation};
pub use config::AssignConfig;
pub use extract::extract;
pub use problem::AssignProblem;
pub use result::{AssignResult, AssignStatus, Diagnostics};
pub use runner::{AssignHandle, AssignRunner, SolveEvent, SolvePhase};
pub use summary::{machine_loads, MachineLoad};
pub use types::{AssignRequest, Assignment, MachineId, Task, TaskId, DEFAULT_DURATION};
