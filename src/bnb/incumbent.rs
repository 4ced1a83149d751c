//! Best-known schedule tracking.
//!
//! [`Incumbent`] is the per-search record of the best complete schedule.
//! [`SharedBound`] is the only state shared between parallel workers: the
//! best makespan any worker has found, tightened with an atomic `fetch_min`.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::shop::ShopModel;

/// A complete schedule: one start time per task index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    starts: Vec<i64>,
    makespan: i64,
}

impl Candidate {
    /// Builds a candidate, computing its makespan from the model's durations.
    pub fn from_starts(model: &ShopModel, starts: Vec<i64>) -> Self {
        let makespan = starts
            .iter()
            .zip(model.tasks())
            .map(|(s, t)| s + t.duration)
            .max()
            .unwrap_or(0);
        Self { starts, makespan }
    }

    #[inline]
    pub fn starts(&self) -> &[i64] {
        &self.starts
    }

    #[inline]
    pub fn start(&self, task: usize) -> i64 {
        self.starts[task]
    }

    #[inline]
    pub fn makespan(&self) -> i64 {
        self.makespan
    }
}

/// Best schedule found by one search.
#[derive(Debug, Clone, Default)]
pub struct Incumbent {
    best: Option<Candidate>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `candidate` if it is strictly better. Returns whether it was.
    pub fn try_install(&mut self, candidate: Candidate) -> bool {
        match &self.best {
            Some(current) if current.makespan <= candidate.makespan => false,
            _ => {
                self.best = Some(candidate);
                true
            }
        }
    }

    /// Makespan of the incumbent, if any.
    #[inline]
    pub fn makespan(&self) -> Option<i64> {
        self.best.as_ref().map(Candidate::makespan)
    }

    /// Makespan to beat; `i64::MAX` while there is no incumbent.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.makespan().unwrap_or(i64::MAX)
    }

    #[inline]
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }
}

/// Best makespan across workers.
#[derive(Debug)]
pub struct SharedBound {
    value: AtomicI64,
}

impl SharedBound {
    pub fn new() -> Self {
        Self {
            value: AtomicI64::new(i64::MAX),
        }
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Lowers the bound to `makespan`. Returns whether it improved.
    #[inline]
    pub fn tighten(&self, makespan: i64) -> bool {
        self.value.fetch_min(makespan, Ordering::AcqRel) > makespan
    }
}

impl Default for SharedBound {
    fn default() -> Self {
        Self::new()
    }
}
