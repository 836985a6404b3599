// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Undoable edits and the interface to the undo system.
//!
//! A gesture mutates the document directly while it runs. A `Transaction`
//! snapshots each curve and shape the first time the gesture touches it;
//! at pointer-up it compares against the current state and produces one
//! `Edit` holding before/after snapshots of everything that changed.

use crate::error::EditError;
use crate::model::{CurveId, Document, ShapeId, ShapeSnapshot};
use crate::path::CurveSnapshot;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// The state change of one curve or shape.
///
/// `None` means the object does not exist on that side of the edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Change {
    Shape {
        id: ShapeId,
        before: Option<ShapeSnapshot>,
        after: Option<ShapeSnapshot>,
    },
    Curve {
        id: CurveId,
        before: Option<CurveSnapshot>,
        after: Option<CurveSnapshot>,
    },
}

/// One undoable step, named for the undo menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edit {
    name: String,
    changes: Vec<Change>,
}

#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

impl Side {
    fn pick<'a, T>(self, before: &'a Option<T>, after: &'a Option<T>) -> Option<&'a T> {
        match self {
            Side::Before => before.as_ref(),
            Side::After => after.as_ref(),
        }
    }
}

impl Edit {
    pub fn new(name: impl Into<String>, changes: Vec<Change>) -> Self {
        Self {
            name: name.into(),
            changes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// The after-state of `curve`, if this edit touched it
    pub fn curve_after(&self, curve: CurveId) -> Option<&CurveSnapshot> {
        self.changes.iter().find_map(|change| match change {
            Change::Curve { id, after, .. } if *id == curve => after.as_ref(),
            _ => None,
        })
    }

    /// Put the document back into its state before the edit
    pub fn undo(&self, doc: &mut Document) {
        tracing::debug!("Undo '{}'", self.name);
        self.apply(doc, Side::Before);
    }

    /// Re-apply the edit
    pub fn redo(&self, doc: &mut Document) {
        tracing::debug!("Redo '{}'", self.name);
        self.apply(doc, Side::After);
    }

    /// Shapes that exist first, then curves, then shapes that go away, so
    /// curves always have an owner while they are restored.
    fn apply(&self, doc: &mut Document, side: Side) {
        for change in &self.changes {
            if let Change::Shape { id, before, after } = change {
                if let Some(state) = side.pick(before, after) {
                    doc.restore_shape(*id, Some(state));
                }
            }
        }
        for change in &self.changes {
            if let Change::Curve { id, before, after } = change {
                doc.restore_curve(*id, side.pick(before, after));
            }
        }
        for change in &self.changes {
            if let Change::Shape { id, before, after } = change {
                if side.pick(before, after).is_none() {
                    doc.restore_shape(*id, None);
                }
            }
        }
    }
}

/// The undo system as seen by the path tool.
///
/// The tool calls `perform` exactly once per completed gesture.
pub trait EditSink {
    fn perform(&mut self, edit: Edit) -> Result<(), EditError>;
}

impl<T: EditSink> EditSink for Arc<Mutex<T>> {
    fn perform(&mut self, edit: Edit) -> Result<(), EditError> {
        let mut sink = self.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("EditSink mutex was poisoned, recovering");
            poisoned.into_inner()
        });
        sink.perform(edit)
    }
}

/// Collects before-snapshots for one gesture
#[derive(Debug, Default)]
pub(crate) struct Transaction {
    shapes: Vec<(ShapeId, Option<ShapeSnapshot>)>,
    curves: Vec<(CurveId, Option<CurveSnapshot>)>,
}

impl Transaction {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Remember `curve` as it is now, unless already remembered.
    ///
    /// Call before mutating or creating the curve.
    pub(crate) fn touch_curve(&mut self, doc: &Document, curve: CurveId) {
        if !self.curves.iter().any(|(id, _)| *id == curve) {
            self.curves.push((curve, doc.curve_snapshot(curve)));
        }
    }

    pub(crate) fn touch_shape(&mut self, doc: &Document, shape: ShapeId) {
        if !self.shapes.iter().any(|(id, _)| *id == shape) {
            self.shapes.push((shape, doc.shape_snapshot(shape)));
        }
    }

    /// Record a curve that did not exist before this gesture
    pub(crate) fn created_curve(&mut self, curve: CurveId) {
        if !self.curves.iter().any(|(id, _)| *id == curve) {
            self.curves.push((curve, None));
        }
    }

    /// Record a shape that did not exist before this gesture
    pub(crate) fn created_shape(&mut self, shape: ShapeId) {
        if !self.shapes.iter().any(|(id, _)| *id == shape) {
            self.shapes.push((shape, None));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.curves.is_empty()
    }

    /// Compare against the document and build the edit; `None` if nothing
    /// changed
    pub(crate) fn finish(self, doc: &Document, name: &str) -> Option<Edit> {
        let shapes = self.shapes.into_iter().filter_map(|(id, before)| {
            let after = doc.shape_snapshot(id);
            (before != after).then_some(Change::Shape { id, before, after })
        });
        let curves = self.curves.into_iter().filter_map(|(id, before)| {
            let after = doc.curve_snapshot(id);
            (before != after).then_some(Change::Curve { id, before, after })
        });
        let changes: Vec<Change> = shapes.chain(curves).collect();
        (!changes.is_empty()).then(|| Edit::new(name, changes))
    }
}
