//! Bounded undo/redo history.

use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};

/// Default number of snapshots to keep.
pub const DEFAULT_CAPACITY: usize = 50;

/// A snapshot of canvas state for undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All shapes in z-order.
    pub shapes: Vec<Shape>,
    /// Selected shape at the time of the snapshot.
    pub selected: Option<ShapeId>,
}

/// Linear snapshot history with a cursor.
///
/// The cursor points at the snapshot matching the current state. Pushing
/// discards anything after the cursor; once the history is full the oldest
/// snapshot is evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    /// `None` before the first push.
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Record a new state.
    pub fn push(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&i| i > 0)?;
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// Step forward. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&i| i + 1 < self.entries.len())?;
        self.cursor = Some(cursor + 1);
        self.entries.get(cursor + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Drop every snapshot and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
