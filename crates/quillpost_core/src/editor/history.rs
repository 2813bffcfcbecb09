//! Bounded undo/redo history of document revisions.
//!
//! # Invariants
//! - Recording a new revision clears the redo stack.
//! - At most `max_levels` undo entries are kept after every record or redo;
//!   the oldest is dropped first.

use crate::editor::selection::SelectionRange;
use crate::model::document::FormattedDocument;
use std::collections::VecDeque;

/// Document revision plus the selection that was active on it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: FormattedDocument,
    pub range: Option<SelectionRange>,
}

#[derive(Debug)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    max_levels: usize,
}

impl History {
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_levels: max_levels.max(1),
        }
    }

    /// Records the state being replaced by a new revision.
    pub fn record(&mut self, previous: Snapshot) {
        self.redo.clear();
        self.undo.push_back(previous);
        self.trim();
    }

    /// Steps back: returns the state to restore and keeps `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        self.trim();
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn trim(&mut self) {
        while self.undo.len() > self.max_levels {
            self.undo.pop_front();
        }
    }
}
