// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Managing undo state

use super::edit::{Edit, EditSink};
use crate::error::EditError;
use crate::model::Document;
use std::collections::VecDeque;

/// Default size of the undo stack.
const DEFAULT_UNDO_STACK_SIZE: usize = 128;

/// A bounded history of performed edits that can be undone and redone.
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Maximum number of edits to keep.
    max_undo_count: usize,
    /// Performed edits, oldest first.
    stack: VecDeque<Edit>,
    /// Number of edits in `stack` currently applied to the document.
    live_index: usize,
}

impl UndoStack {
    /// Create a new undo stack with the default size.
    pub fn new() -> Self {
        Self::new_sized(DEFAULT_UNDO_STACK_SIZE)
    }

    /// Create a new undo stack with a specific maximum size.
    pub fn new_sized(max_undo_count: usize) -> Self {
        UndoStack {
            max_undo_count: max_undo_count.max(1),
            stack: VecDeque::new(),
            live_index: 0,
        }
    }

    /// Undo the most recent applied edit, returning its name.
    pub fn undo(&mut self, doc: &mut Document) -> Option<&str> {
        if self.live_index == 0 {
            return None;
        }
        self.live_index -= 1;
        let edit = self.stack.get(self.live_index)?;
        edit.undo(doc);
        Some(edit.name())
    }

    /// Redo a previously undone edit, returning its name.
    pub fn redo(&mut self, doc: &mut Document) -> Option<&str> {
        if self.live_index == self.stack.len() {
            return None;
        }
        let edit = self.stack.get(self.live_index)?;
        self.live_index += 1;
        edit.redo(doc);
        Some(edit.name())
    }

    /// Add a performed edit, dropping anything that was undone.
    pub fn push(&mut self, edit: Edit) {
        // If we have undone edits and then edit, the redo branch is gone
        self.stack.truncate(self.live_index);
        self.stack.push_back(edit);
        self.live_index += 1;

        if self.stack.len() > self.max_undo_count {
            self.stack.pop_front();
            self.live_index -= 1;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.live_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.live_index < self.stack.len()
    }

    /// Applied edits, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Edit> {
        self.stack.iter().take(self.live_index)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSink for UndoStack {
    fn perform(&mut self, edit: Edit) -> Result<(), EditError> {
        tracing::debug!("Performed '{}'", edit.name());
        self.push(edit);
        Ok(())
    }
}
