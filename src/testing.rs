//! Helpers shared by unit tests.

use std::collections::VecDeque;

use crate::models::generator::InstanceGenerator;
use crate::models::TaskRecord;
use crate::shop::ShopModel;

/// Small random instance, durations 1..=9.
pub(crate) fn random_records(seed: u64, jobs: usize, tools: usize) -> Vec<TaskRecord> {
    InstanceGenerator::new(jobs, tools)
        .with_durations(1, 9)
        .with_seed(seed)
        .generate()
}

/// Optimal makespan by enumerating every orientation of every disjunction.
///
/// Orientations that close a cycle are skipped. Only usable for a handful of
/// disjunctions.
pub(crate) fn brute_force_makespan(model: &ShopModel) -> Option<i64> {
    let n = model.task_count();
    let m = model.disjunctions().len();
    assert!(m <= 20, "too many disjunctions for enumeration: {m}");
    if n == 0 {
        return Some(0);
    }

    let mut best: Option<i64> = None;
    for mask in 0u32..(1u32 << m) {
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for job in model.jobs() {
            for pair in job.tasks.windows(2) {
                successors[pair[0]].push(pair[1]);
            }
        }
        for (k, d) in model.disjunctions().iter().enumerate() {
            if mask & (1 << k) == 0 {
                successors[d.first].push(d.second);
            } else {
                successors[d.second].push(d.first);
            }
        }

        if let Some(makespan) = longest_path(model, &successors) {
            best = Some(best.map_or(makespan, |b| b.min(makespan)));
        }
    }
    best
}

/// Makespan of the earliest-start schedule of an arc set, or `None` on a cycle.
fn longest_path(model: &ShopModel, successors: &[Vec<usize>]) -> Option<i64> {
    let n = successors.len();
    let mut in_degree = vec![0usize; n];
    for list in successors {
        for &v in list {
            in_degree[v] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut start = vec![0i64; n];
    let mut visited = 0;
    while let Some(u) = queue.pop_front() {
        visited += 1;
        let end = start[u] + model.duration(u);
        for &v in &successors[u] {
            start[v] = start[v].max(end);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    (visited == n).then(|| (0..n).map(|v| start[v] + model.duration(v)).max().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brute_force_single_tool() {
        let model = ShopModel::build(&[
            TaskRecord::new("J1", "A", 1, 3).with_tool("M1"),
            TaskRecord::new("J2", "B", 1, 4).with_tool("M1"),
            TaskRecord::new("J3", "C", 1, 2),
        ])
        .unwrap();
        assert_eq!(brute_force_makespan(&model), Some(7));
    }

    #[test]
    fn test_brute_force_empty() {
        let model = ShopModel::build(&[]).unwrap();
        assert_eq!(brute_force_makespan(&model), Some(0));
    }
}
