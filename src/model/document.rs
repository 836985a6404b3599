// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The document: an arena of curves and the shapes that own them.
//!
//! Curves are keyed by `CurveId` and shapes by `ShapeId`; the document is
//! their only owner. Tools, selections, and edits hold ids and resolve them
//! on each use, treating a missing id as stale.
//!
//! The document is shared with the renderer via `Arc<RwLock<Document>>`;
//! `read_document` / `write_document` acquire the lock with poison recovery.

use crate::error::EditError;
use crate::model::entity_id::{CurveId, ShapeId};
use crate::path::{CurveSnapshot, PathCurve};
use kurbo::{Affine, Point, Shape as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A drawable made of one or more curves
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    /// Object space to canvas space
    pub transform: Affine,
    /// Owned curves, in drawing order
    pub paths: Vec<CurveId>,
}

/// The state of a shape without its curves' point data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub transform: Affine,
    pub paths: Vec<CurveId>,
    /// Position in the z-order, 0 is the bottom
    pub z_index: usize,
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Canvas space to object space
    pub fn inverse_transform(&self) -> Affine {
        self.transform.inverse()
    }
}

/// All curves and shapes being edited
#[derive(Debug, Default)]
pub struct Document {
    curves: HashMap<CurveId, PathCurve>,
    shapes: HashMap<ShapeId, Shape>,
    /// Shapes from bottom to top
    z_order: Vec<ShapeId>,
}

// ============================================================================
// DOCUMENT IMPLEMENTATION
// ============================================================================

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a document for sharing with the renderer
    pub fn shared(self) -> Arc<RwLock<Document>> {
        Arc::new(RwLock::new(self))
    }

    pub fn curve(&self, id: CurveId) -> Option<&PathCurve> {
        self.curves.get(&id)
    }

    pub fn curve_mut(&mut self, id: CurveId) -> Option<&mut PathCurve> {
        self.curves.get_mut(&id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Shapes from bottom to top
    pub fn shapes(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// The shape that owns `curve`
    pub fn shape_of(&self, curve: CurveId) -> Option<ShapeId> {
        self.shapes()
            .find(|shape| shape.paths.contains(&curve))
            .map(Shape::id)
    }

    /// Add an empty shape on top of the z-order
    pub fn create_shape(&mut self, transform: Affine) -> Result<ShapeId, EditError> {
        if self.z_order.try_reserve(1).is_err() || self.shapes.try_reserve(1).is_err() {
            tracing::warn!("Document: failed to allocate shape");
            return Err(EditError::Allocation("shape"));
        }
        let id = ShapeId::next();
        self.shapes.insert(
            id,
            Shape {
                id,
                transform,
                paths: Vec::new(),
            },
        );
        self.z_order.push(id);
        tracing::debug!("Document: created shape {id:?}");
        Ok(id)
    }

    /// Add an empty curve to `shape`
    pub fn create_curve(&mut self, shape: ShapeId) -> Result<CurveId, EditError> {
        let curve = PathCurve::new();
        let id = curve.id();
        self.adopt_curve(shape, curve)?;
        tracing::debug!("Document: created curve {id:?} in {shape:?}");
        Ok(id)
    }

    fn adopt_curve(&mut self, shape: ShapeId, curve: PathCurve) -> Result<(), EditError> {
        if self.curves.try_reserve(1).is_err() {
            return Err(EditError::Allocation("curve"));
        }
        let owner = self
            .shapes
            .get_mut(&shape)
            .ok_or(EditError::UnknownShape(shape))?;
        if owner.paths.try_reserve(1).is_err() {
            return Err(EditError::Allocation("curve"));
        }
        owner.paths.push(curve.id());
        self.curves.insert(curve.id(), curve);
        Ok(())
    }

    /// Remove a curve from the arena and from its owning shape
    pub fn remove_curve(&mut self, id: CurveId) -> Option<PathCurve> {
        for shape in self.shapes.values_mut() {
            shape.paths.retain(|&curve| curve != id);
        }
        self.curves.remove(&id)
    }

    /// Remove a shape together with its curves
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(&id)?;
        self.z_order.retain(|&s| s != id);
        for curve in &shape.paths {
            self.curves.remove(curve);
        }
        Some(shape)
    }

    /// Topmost shape whose filled outline contains `canvas_point`
    pub fn shape_at(&self, canvas_point: Point) -> Option<ShapeId> {
        self.shapes().rev().find_map(|shape| {
            let local = shape.inverse_transform() * canvas_point;
            let winding: i32 = shape
                .paths
                .iter()
                .filter_map(|id| self.curves.get(id))
                .filter(|curve| curve.count_points() > 1)
                .map(|curve| {
                    let mut path = curve.to_bezpath();
                    // Fill treats open outlines as closed
                    if !curve.is_closed() {
                        path.close_path();
                    }
                    path.winding(local)
                })
                .sum();
            (winding != 0).then_some(shape.id)
        })
    }

    // ===== SNAPSHOTS (undo/redo) =====

    pub fn shape_snapshot(&self, id: ShapeId) -> Option<ShapeSnapshot> {
        let shape = self.shapes.get(&id)?;
        Some(ShapeSnapshot {
            transform: shape.transform,
            paths: shape.paths.clone(),
            z_index: self.z_order.iter().position(|&s| s == id).unwrap_or(0),
        })
    }

    pub fn curve_snapshot(&self, id: CurveId) -> Option<CurveSnapshot> {
        self.curves.get(&id).map(PathCurve::snapshot)
    }

    /// Make shape `id` match `snapshot`, or remove it when `None`
    pub(crate) fn restore_shape(&mut self, id: ShapeId, snapshot: Option<&ShapeSnapshot>) {
        let Some(snapshot) = snapshot else {
            if let Some(shape) = self.shapes.remove(&id) {
                self.z_order.retain(|&s| s != id);
                for curve in &shape.paths {
                    self.curves.remove(curve);
                }
            }
            return;
        };
        let shape = self.shapes.entry(id).or_insert_with(|| Shape {
            id,
            transform: Affine::IDENTITY,
            paths: Vec::new(),
        });
        shape.transform = snapshot.transform;
        shape.paths = snapshot.paths.clone();
        self.z_order.retain(|&s| s != id);
        let z_index = snapshot.z_index.min(self.z_order.len());
        self.z_order.insert(z_index, id);
    }

    /// Make curve `id` match `snapshot`, or remove it when `None`.
    ///
    /// A re-created curve keeps its old id but has no listeners.
    pub(crate) fn restore_curve(&mut self, id: CurveId, snapshot: Option<&CurveSnapshot>) {
        match snapshot {
            Some(snapshot) => {
                self.curves
                    .entry(id)
                    .or_insert_with(|| PathCurve::with_id(id))
                    .restore(snapshot);
            }
            None => {
                self.remove_curve(id);
            }
        }
    }
}

// ============================================================================
// THREAD-SAFE ACCESS HELPERS
// ============================================================================

/// Acquire a read lock on a shared document, recovering from poison.
///
/// A poisoned lock means a writer panicked mid-edit. The document data is
/// still structurally valid (each curve mutation commits atomically), so we
/// log a warning and continue rather than propagating the panic.
pub fn read_document(doc: &Arc<RwLock<Document>>) -> RwLockReadGuard<'_, Document> {
    doc.read().unwrap_or_else(|poisoned| {
        tracing::warn!("Document RwLock was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Acquire a write lock on a shared document, recovering from poison.
///
/// See [`read_document`] for details on poison recovery.
pub fn write_document(doc: &Arc<RwLock<Document>>) -> RwLockWriteGuard<'_, Document> {
    doc.write().unwrap_or_else(|poisoned| {
        tracing::warn!("Document RwLock was poisoned, recovering");
        poisoned.into_inner()
    })
}
