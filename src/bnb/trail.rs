//! Undo log for propagation state.
//!
//! Every window change and every decided arc is pushed as an entry. A frame
//! marks the trail length at the start of a decision level; backtracking pops
//! entries down to that mark, newest first.

/// One reversible mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailEntry {
    /// `earliest_start` of `task` was `previous` before the change.
    EarliestStart { task: usize, previous: i64 },
    /// `latest_start` of `task` was `previous` before the change.
    LatestStart { task: usize, previous: i64 },
    /// Arc `from → to` was appended to the adjacency lists.
    Arc { from: usize, to: usize },
}

/// Linear log of entries with frame markers.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    entries: Vec<TrailEntry>,
    frames: Vec<usize>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, entry: TrailEntry) {
        self.entries.push(entry);
    }

    /// Opens a decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Closes the newest decision level, returning its entries newest first.
    ///
    /// Returns an empty list when no frame is open.
    pub fn pop_frame(&mut self) -> Vec<TrailEntry> {
        match self.frames.pop() {
            Some(start) => {
                let mut undone = self.entries.split_off(start);
                undone.reverse();
                undone
            }
            None => Vec::new(),
        }
    }

    /// Number of open decision levels.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
