//! Exact job-shop makespan solver.
//!
//! Schedules jobs (ordered chains of tasks) on exclusive tools so that the
//! time until the last task finishes is minimal. Tasks without a tool run
//! unconstrained except by their chain.
//!
//! # Modules
//!
//! - **`models`**: Input and output records: `TaskRecord`, `SolveResult`,
//!   `TimelineEntry`, `SolveStatus`, plus a seeded instance generator
//! - **`validation`**: Input integrity checks (durations, sequence numbers,
//!   identifiers, duplicates)
//! - **`shop`**: Immutable index-based model (job chains, tool groups,
//!   disjunctions, horizon)
//! - **`bnb`**: Time-window propagation, lower bounds and branch-and-bound
//!   search, sequential or parallel
//! - **`extract`**: Timeline construction and invariant checks
//! - **`scheduler`**: `JobShopScheduler` facade, greedy warm start, KPIs
//! - **`scenario`**: Nested scenario document adapter
//! - **`config`** / **`error`**: `SolverConfig` and `SolveError`
//!
//! # Example
//!
//! ```
//! use u_jobshop::{JobShopScheduler, SolverConfig, TaskRecord};
//!
//! let tasks = vec![
//!     TaskRecord::new("J1", "A", 1, 3).with_tool("M1"),
//!     TaskRecord::new("J2", "B", 1, 4).with_tool("M1"),
//! ];
//! let result = JobShopScheduler::new()
//!     .with_config(SolverConfig::default().with_node_limit(10_000))
//!     .solve(&tasks)
//!     .unwrap();
//! assert_eq!(result.elapsed, 7);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"
//! - Brucker, Jurisch & Sievers (1994), "A branch and bound algorithm for the
//!   job-shop scheduling problem"

pub mod bnb;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod scenario;
pub mod scheduler;
pub mod shop;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::SolverConfig;
pub use error::{Result, SolveError};
pub use models::{SolveResult, SolveStatus, TaskRecord, TimelineEntry};
pub use scheduler::JobShopScheduler;
