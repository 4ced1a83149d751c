//! Immutable job-shop model.
//!
//! Built once per solve from validated task records. Holds index-based,
//! read-only adjacency: job chains (task indices sorted by sequence number)
//! and tool groups (task indices naming the tool). Tool groups reference
//! tasks by index and never own or mutate them.
//!
//! # Task indexing
//! Tasks are stored job by job (jobs in order of first appearance in the
//! input), each job's tasks in chain order. A task index is therefore also
//! the output order of the extracted timeline.
//!
//! # Disjunctions
//! Every unordered pair of tasks that share a tool and belong to different
//! jobs is a disjunction: the search decides which of the two runs first.
//! Same-job pairs on one tool are already ordered by their chain.
//!
//! # Reference
//! Roy & Sussmann (1964), "Les problèmes d'ordonnancement avec contraintes
//! disjonctives" (disjunctive graph)

use std::collections::HashMap;
use std::ops::Range;

use tracing::warn;

use crate::models::TaskRecord;
use crate::validation::{self, ValidationErrors};

/// A task inside the model.
#[derive(Debug, Clone)]
pub struct ShopTask {
    /// Owning job identifier.
    pub job_id: String,
    /// Task identifier.
    pub task_id: String,
    /// Tool identifier, if any.
    pub tool_id: Option<String>,
    /// Sequence number within the job.
    pub seq: i64,
    /// Processing time.
    pub duration: i64,
    /// Index of the owning job.
    pub job: usize,
    /// Index of the tool group, if any.
    pub tool: Option<usize>,
    /// Sum of durations of earlier tasks in the same job.
    pub head: i64,
    /// Sum of durations of later tasks in the same job.
    pub tail: i64,
    /// Position of the record in the input list.
    pub input_index: usize,
}

/// A job: an ordered chain of task indices.
#[derive(Debug, Clone)]
pub struct Job {
    /// Job identifier.
    pub id: String,
    /// Task indices in sequence order.
    pub tasks: Vec<usize>,
}

/// A tool group: the tasks that occupy one tool.
#[derive(Debug, Clone)]
pub struct Tool {
    /// Tool identifier.
    pub id: String,
    /// Task indices in input order.
    pub tasks: Vec<usize>,
}

/// An undecided ordering between two tasks on the same tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disjunction {
    /// Tool group index.
    pub tool: usize,
    /// Task listed first in the tool group.
    pub first: usize,
    /// Task listed second in the tool group.
    pub second: usize,
}

/// Immutable model of one scheduling instance.
#[derive(Debug, Clone)]
pub struct ShopModel {
    tasks: Vec<ShopTask>,
    jobs: Vec<Job>,
    tools: Vec<Tool>,
    disjunctions: Vec<Disjunction>,
    tool_disjunctions: Vec<Range<usize>>,
    horizon: i64,
}

impl ShopModel {
    /// Validates records and builds the model.
    ///
    /// Jobs keep their first-appearance order; tasks inside a job are sorted
    /// by `seq` with a stable sort, so shared sequence numbers fall back to
    /// input order. Tool groups keep input order.
    pub fn build(records: &[TaskRecord]) -> Result<Self, ValidationErrors> {
        validation::validate_records(records)?;

        for (job_id, seq) in validation::shared_sequences(records) {
            warn!(job_id = %job_id, seq, "tasks share a sequence number; ordering by input position");
        }

        // Group input positions by job, in first-appearance order
        let mut job_index: HashMap<&str, usize> = HashMap::new();
        let mut job_members: Vec<(String, Vec<usize>)> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let j = *job_index.entry(record.job_id.as_str()).or_insert_with(|| {
                job_members.push((record.job_id.clone(), Vec::new()));
                job_members.len() - 1
            });
            job_members[j].1.push(i);
        }

        // Tool indices in first-appearance order
        let mut tool_index: HashMap<&str, usize> = HashMap::new();
        let mut tool_ids: Vec<String> = Vec::new();
        for record in records {
            if let Some(tool) = record.tool() {
                tool_index.entry(tool).or_insert_with(|| {
                    tool_ids.push(tool.to_string());
                    tool_ids.len() - 1
                });
            }
        }

        let mut tasks = Vec::with_capacity(records.len());
        let mut jobs = Vec::with_capacity(job_members.len());
        let mut task_of_input = vec![0usize; records.len()];

        for (j, (job_id, mut members)) in job_members.into_iter().enumerate() {
            members.sort_by_key(|&i| records[i].seq.unwrap_or_default());

            let total: i64 = members.iter().map(|&i| records[i].duration).sum();
            let mut head = 0;
            let mut chain = Vec::with_capacity(members.len());

            for &i in &members {
                let record = &records[i];
                let tool = record.tool();
                task_of_input[i] = tasks.len();
                chain.push(tasks.len());
                tasks.push(ShopTask {
                    job_id: record.job_id.clone(),
                    task_id: record.task_id.clone(),
                    tool_id: tool.map(String::from),
                    seq: record.seq.unwrap_or_default(),
                    duration: record.duration,
                    job: j,
                    tool: tool.map(|t| tool_index[t]),
                    head,
                    tail: total - head - record.duration,
                    input_index: i,
                });
                head += record.duration;
            }

            jobs.push(Job {
                id: job_id,
                tasks: chain,
            });
        }

        let mut tools: Vec<Tool> = tool_ids
            .into_iter()
            .map(|id| Tool {
                id,
                tasks: Vec::new(),
            })
            .collect();
        for (i, record) in records.iter().enumerate() {
            if let Some(tool) = record.tool() {
                tools[tool_index[tool]].tasks.push(task_of_input[i]);
            }
        }

        let mut disjunctions = Vec::new();
        let mut tool_disjunctions = Vec::with_capacity(tools.len());
        for (t, tool) in tools.iter().enumerate() {
            let start = disjunctions.len();
            for (k, &a) in tool.tasks.iter().enumerate() {
                for &b in &tool.tasks[k + 1..] {
                    if tasks[a].job != tasks[b].job {
                        disjunctions.push(Disjunction {
                            tool: t,
                            first: a,
                            second: b,
                        });
                    }
                }
            }
            tool_disjunctions.push(start..disjunctions.len());
        }

        let horizon = tasks.iter().map(|t| t.duration).sum();

        Ok(Self {
            tasks,
            jobs,
            tools,
            disjunctions,
            tool_disjunctions,
            horizon,
        })
    }

    /// All tasks, indexed by task index.
    #[inline]
    pub fn tasks(&self) -> &[ShopTask] {
        &self.tasks
    }

    /// One task.
    #[inline]
    pub fn task(&self, index: usize) -> &ShopTask {
        &self.tasks[index]
    }

    /// Duration of a task.
    #[inline]
    pub fn duration(&self, index: usize) -> i64 {
        self.tasks[index].duration
    }

    /// Number of tasks.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Job chains.
    #[inline]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Tool groups.
    #[inline]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// All disjunctions, grouped by tool.
    #[inline]
    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Index range of a tool's disjunctions in [`ShopModel::disjunctions`].
    #[inline]
    pub fn tool_disjunctions(&self, tool: usize) -> Range<usize> {
        self.tool_disjunctions[tool].clone()
    }

    /// Sum of all durations; an upper bound on any task end.
    #[inline]
    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    /// Next task in the same job, if any.
    #[inline]
    pub fn job_successor(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.tasks.len() && self.tasks[next].job == self.tasks[index].job).then_some(next)
    }

    /// Previous task in the same job, if any.
    #[inline]
    pub fn job_predecessor(&self, index: usize) -> Option<usize> {
        (index > 0 && self.tasks[index - 1].job == self.tasks[index].job).then(|| index - 1)
    }

    /// Whether the model has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
