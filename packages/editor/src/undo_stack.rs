//! # Undo/Redo Stack
//!
//! Linear history of whole-project snapshots.
//!
//! ## Design
//!
//! - Each undo-significant commit records the post-commit project
//! - `index` points at the snapshot matching the live project
//! - Recording after an undo discards the redo branch
//! - Undo/redo only move `index`; they never record
//! - Cosmetic commits overwrite the entry at `index` without adding a step
//! - The stack is bounded: past `max_size` the oldest snapshot is evicted
//!
//! Snapshots are cheap because page trees share unchanged subtrees through
//! `Arc`, so a snapshot costs roughly the nodes touched since the last one.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new(project.clone(), 50);
//!
//! stack.record(edited.clone());
//! assert!(stack.can_undo());
//!
//! let previous = stack.undo().cloned();
//! let next = stack.redo().cloned();
//! ```

use pagecraft_document::Project;

pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Bounded undo/redo history of project snapshots
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Snapshots, oldest first
    entries: Vec<Project>,

    /// Position of the live project in `entries`
    index: usize,

    /// Maximum number of snapshots kept (at least 1)
    max_size: usize,
}

impl UndoStack {
    /// Start a history whose only entry is `initial`
    pub fn new(initial: Project, max_size: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record the state after an undo-significant change
    pub fn record(&mut self, snapshot: Project) {
        // New action invalidates the redo branch
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);

        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }

        self.index = self.entries.len() - 1;
    }

    /// Overwrite the snapshot at the current position.
    ///
    /// Used for changes that are not undo steps themselves but must survive
    /// undoing a later step. The redo branch is kept.
    pub fn replace_current(&mut self, snapshot: Project) {
        if let Some(entry) = self.entries.get_mut(self.index) {
            *entry = snapshot;
        }
    }

    /// Step back; returns the snapshot to restore
    pub fn undo(&mut self) -> Option<&Project> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward; returns the snapshot to restore
    pub fn redo(&mut self) -> Option<&Project> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Drop all history and start again from `initial`
    pub fn reset(&mut self, initial: Project) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }

    /// Snapshot at the current position
    pub fn current(&self) -> Option<&Project> {
        self.entries.get(self.index)
    }

    pub fn entries(&self) -> &[Project] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
