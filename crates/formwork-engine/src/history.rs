//! Bounded undo/redo history over full state snapshots.
//!
//! History is linear, not a tree: recording while the cursor sits behind
//! the last entry discards the redo branch. When the entry count exceeds
//! the limit, the oldest entries are dropped.

use serde_json::Value;

/// Default maximum number of snapshots retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 350;

/// A bounded, truncating undo/redo stack of full state snapshots.
///
/// Invariant: `0 <= current_index() < len() <= limit()`, and the history
/// always contains at least the snapshot it was seeded with.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Value>,
    current: usize,
    limit: usize,
}

impl History {
    /// Create a history seeded with the initial snapshot.
    ///
    /// `limit` is clamped to a minimum of 1.
    pub fn new(initial: Value, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            current: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new snapshot.
    ///
    /// Entries beyond the cursor (the redo branch) are discarded, the
    /// snapshot is appended, and the oldest entries are dropped if the
    /// limit is exceeded. The cursor lands on the new last entry.
    /// Snapshots identical to the current entry are recorded all the
    /// same; no dedup is performed.
    pub fn record(&mut self, state: Value) {
        self.entries.truncate(self.current + 1);
        self.entries.push(state);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(0..excess);
        }
        self.current = self.entries.len() - 1;
    }

    /// Step the cursor back and return the snapshot there.
    ///
    /// Clamps at the oldest entry; already at the floor is a no-op
    /// returning the current snapshot.
    pub fn undo(&mut self, steps: usize) -> &Value {
        self.current = self.current.saturating_sub(steps);
        &self.entries[self.current]
    }

    /// Step the cursor forward and return the snapshot there.
    ///
    /// Clamps at the newest entry; already at the end is a no-op
    /// returning the current snapshot.
    pub fn redo(&mut self, steps: usize) -> &Value {
        self.current = (self.current + steps).min(self.entries.len() - 1);
        &self.entries[self.current]
    }

    /// Whether the cursor can move back `steps` entries.
    #[inline]
    pub fn can_undo(&self, steps: usize) -> bool {
        self.current >= steps
    }

    /// Whether the cursor can move forward `steps` entries.
    #[inline]
    pub fn can_redo(&self, steps: usize) -> bool {
        self.current + steps < self.entries.len()
    }

    /// The snapshot at the cursor.
    #[inline]
    pub fn current(&self) -> &Value {
        &self.entries[self.current]
    }

    /// Number of retained snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: history retains at least the seed snapshot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Position of the cursor.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The retention limit.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
