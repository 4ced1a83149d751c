//! Exact branch-and-bound for job-shop makespan minimization.
//!
//! # Algorithm
//!
//! Depth-first search over the orientations of tool disjunctions, with
//! time-window propagation after every decision and a lower bound at every
//! node. A greedy schedule can seed the incumbent. With more than one worker,
//! the tree is split at a fixed depth and subtrees are searched in parallel.
//!
//! # Modules
//!
//! - **`propagate`**: time windows, arc propagation, trail-based undo
//! - **`bounds`**: static and per-node makespan lower bounds
//! - **`search`**: the depth-first driver and branching rule
//! - **`parallel`**: subtree splitting and worker threads
//! - **`incumbent`**: best-schedule tracking and the shared bound
//! - **`budget`**: node and time limits
//!
//! # References
//!
//! - Brucker, Jurisch & Sievers (1994), "A branch and bound algorithm for the
//!   job-shop scheduling problem"
//! - Applegate & Cook (1991), "A computational study of the job-shop
//!   scheduling problem"

mod bounds;
mod budget;
mod incumbent;
mod parallel;
mod propagate;
mod search;
mod stats;
mod trail;

pub use bounds::{BoundEstimator, LowerBound};
pub use budget::{SearchBudget, SearchCommand};
pub use incumbent::{Candidate, Incumbent, SharedBound};
pub use parallel::run_parallel;
pub use propagate::{Conflict, Propagator, Window};
pub use search::{BnbSearch, Decision, SearchOutcome};
pub use stats::SearchStatistics;
