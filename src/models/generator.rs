//! Seeded random instance generator.
//!
//! Produces job-shop task lists in the style of Taillard's benchmark
//! generator: every job visits the tools in an independently shuffled order,
//! with uniformly drawn integer durations. A fraction of tasks can be made
//! tool-less to model manual steps.
//!
//! # Reference
//! Taillard (1993), "Benchmarks for basic scheduling problems"

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::TaskRecord;

/// Generator configuration for synthetic instances.
///
/// # Example
/// ```
/// use u_jobshop::models::generator::InstanceGenerator;
///
/// let tasks = InstanceGenerator::new(4, 3).with_seed(7).generate();
/// assert_eq!(tasks.len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    jobs: usize,
    tools: usize,
    tasks_per_job: usize,
    min_duration: i64,
    max_duration: i64,
    toolless_ratio: f64,
    seed: u64,
}

impl InstanceGenerator {
    /// Creates a generator for `jobs` jobs over `tools` tools, one task per
    /// tool per job, durations in `1..=10`.
    pub fn new(jobs: usize, tools: usize) -> Self {
        Self {
            jobs,
            tools,
            tasks_per_job: tools,
            min_duration: 1,
            max_duration: 10,
            toolless_ratio: 0.0,
            seed: 0,
        }
    }

    /// Sets the number of tasks per job. Tools repeat when it exceeds the tool count.
    pub fn with_tasks_per_job(mut self, tasks_per_job: usize) -> Self {
        self.tasks_per_job = tasks_per_job;
        self
    }

    /// Sets the inclusive duration range. Values below 1 are raised to 1.
    pub fn with_durations(mut self, min: i64, max: i64) -> Self {
        self.min_duration = min.max(1);
        self.max_duration = max.max(self.min_duration);
        self
    }

    /// Sets the probability that a task uses no tool.
    pub fn with_toolless_ratio(mut self, ratio: f64) -> Self {
        self.toolless_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates the task records. Identical settings yield identical output.
    pub fn generate(&self) -> Vec<TaskRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::with_capacity(self.jobs * self.tasks_per_job);
        let mut routing: Vec<usize> = (0..self.tools).collect();

        for j in 0..self.jobs {
            routing.shuffle(&mut rng);
            for k in 0..self.tasks_per_job {
                let duration = rng.random_range(self.min_duration..=self.max_duration);
                let mut record =
                    TaskRecord::new(format!("J{j}"), format!("J{j}_T{k}"), k as i64 + 1, duration);

                let toolless = self.toolless_ratio > 0.0 && rng.random_bool(self.toolless_ratio);
                if !routing.is_empty() && !toolless {
                    record = record.with_tool(format!("M{}", routing[k % routing.len()]));
                }
                records.push(record);
            }
        }

        records
    }
}
