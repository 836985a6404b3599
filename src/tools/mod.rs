// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture system for path editing.
//!
//! A gesture is one pointer-down → move → up interaction. The dispatcher in
//! `path_tool` picks one `GestureKind` on pointer-down; the gesture then
//! receives `set_origin` once and `drag_to` for every move. A gesture may
//! hand the rest of the interaction to another gesture by returning
//! `Transition::Become` with the replacement already primed.

use crate::editing::edit::Transaction;
use crate::editing::object_selection::lock_selection;
use crate::editing::{Modifiers, ObjectSelection, PathPointRef, PointSelection, ViewPort};
use crate::error::EditError;
use crate::model::{CurveId, Document, OriginTag, ShapeId};
use crate::path::{EventQueue, PathCurve, PathEvent};
use kurbo::{Affine, Point, Rect};
use std::sync::{Arc, Mutex};

// ===== Gesture Trait =====

/// One interaction mode of the path tool.
///
/// Points handed to a gesture are in canvas space; gestures convert to the
/// edited shape's object space through the context.
pub trait Gesture {
    /// Start the gesture at `origin`
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError>;

    /// The pointer moved to `current` while the button is held
    fn drag_to(
        &mut self,
        current: Point,
        modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition;

    /// Cursor to show while this gesture is (or would be) active
    fn cursor(&self, current: Point) -> CursorKind;

    /// Label of the undo entry this gesture produces
    fn command_name(&self) -> &'static str;
}

/// What a gesture wants after handling an event
#[derive(Debug)]
pub enum Transition {
    /// Keep the current gesture
    Stay,
    /// Replace the current gesture for the rest of the interaction
    Become(GestureKind),
}

/// Cursor shapes requested by the path tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum CursorKind {
    Default,
    FollowLink,
    PathSelect,
    PathMove,
    PathSharp,
    PathAdd,
    PathInsert,
    PathRemove,
    PathClose,
    PathNew,
}

/// Which part of a control point a drag moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// The point, with its handles following
    MovePoint,
    MoveIn,
    MoveOut,
    /// The out-handle, with the in-handle mirrored through the point
    MoveOutMirrorIn,
}

impl DragMode {
    /// Mode for a plain drag of `which`
    pub fn for_handle(which: crate::path::HandleKind) -> Self {
        use crate::path::HandleKind;
        match which {
            HandleKind::Point | HandleKind::AllOfPoint => DragMode::MovePoint,
            HandleKind::HandleIn => DragMode::MoveIn,
            HandleKind::HandleOut => DragMode::MoveOut,
        }
    }
}

// ===== GestureKind Enum =====

/// Enum wrapping all gesture types
#[derive(Debug, Clone)]
pub enum GestureKind {
    SelectPoints(select_points::SelectPoints),
    DragPoint(drag_point::DragPoint),
    DragSelection(drag_selection::DragSelection),
    ToggleSmoothSharp(toggle_smooth::ToggleSmoothSharp),
    AddPoint(add_point::AddPoint),
    InsertPoint(insert_point::InsertPoint),
    RemovePoint(remove_point::RemovePoint),
    ClosePath(close_path::ClosePath),
    CreatePath(create_path::CreatePath),
    CreateShape(create_path::CreateShape),
    PickShape(pick_shape::PickShape),
}

impl GestureKind {
    pub fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        match self {
            GestureKind::SelectPoints(g) => g.set_origin(origin, ctx),
            GestureKind::DragPoint(g) => g.set_origin(origin, ctx),
            GestureKind::DragSelection(g) => g.set_origin(origin, ctx),
            GestureKind::ToggleSmoothSharp(g) => g.set_origin(origin, ctx),
            GestureKind::AddPoint(g) => g.set_origin(origin, ctx),
            GestureKind::InsertPoint(g) => g.set_origin(origin, ctx),
            GestureKind::RemovePoint(g) => g.set_origin(origin, ctx),
            GestureKind::ClosePath(g) => g.set_origin(origin, ctx),
            GestureKind::CreatePath(g) => g.set_origin(origin, ctx),
            GestureKind::CreateShape(g) => g.set_origin(origin, ctx),
            GestureKind::PickShape(g) => g.set_origin(origin, ctx),
        }
    }

    pub fn drag_to(
        &mut self,
        current: Point,
        modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        match self {
            GestureKind::SelectPoints(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::DragPoint(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::DragSelection(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::ToggleSmoothSharp(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::AddPoint(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::InsertPoint(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::RemovePoint(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::ClosePath(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::CreatePath(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::CreateShape(g) => g.drag_to(current, modifiers, ctx),
            GestureKind::PickShape(g) => g.drag_to(current, modifiers, ctx),
        }
    }

    pub fn cursor(&self, current: Point) -> CursorKind {
        match self {
            GestureKind::SelectPoints(g) => g.cursor(current),
            GestureKind::DragPoint(g) => g.cursor(current),
            GestureKind::DragSelection(g) => g.cursor(current),
            GestureKind::ToggleSmoothSharp(g) => g.cursor(current),
            GestureKind::AddPoint(g) => g.cursor(current),
            GestureKind::InsertPoint(g) => g.cursor(current),
            GestureKind::RemovePoint(g) => g.cursor(current),
            GestureKind::ClosePath(g) => g.cursor(current),
            GestureKind::CreatePath(g) => g.cursor(current),
            GestureKind::CreateShape(g) => g.cursor(current),
            GestureKind::PickShape(g) => g.cursor(current),
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            GestureKind::SelectPoints(g) => g.command_name(),
            GestureKind::DragPoint(g) => g.command_name(),
            GestureKind::DragSelection(g) => g.command_name(),
            GestureKind::ToggleSmoothSharp(g) => g.command_name(),
            GestureKind::AddPoint(g) => g.command_name(),
            GestureKind::InsertPoint(g) => g.command_name(),
            GestureKind::RemovePoint(g) => g.command_name(),
            GestureKind::ClosePath(g) => g.command_name(),
            GestureKind::CreatePath(g) => g.command_name(),
            GestureKind::CreateShape(g) => g.command_name(),
            GestureKind::PickShape(g) => g.command_name(),
        }
    }
}

// ===== Gesture Context =====

/// The shape being edited and the curves the tool works on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditTarget {
    pub shape: Option<ShapeId>,
    /// Curves of the edited shape, bottom first
    pub paths: Vec<CurveId>,
    /// The curve new points are appended to
    pub current: Option<CurveId>,
}

/// Everything a gesture may read or change during one event.
///
/// Built by the path tool while it holds the document write lock, so a
/// context never outlives a single `set_origin` / `drag_to` call.
pub struct GestureCtx<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) tx: &'a mut Transaction,
    pub(crate) target: &'a mut EditTarget,
    pub(crate) points: &'a mut PointSelection,
    pub(crate) selection_rect: &'a mut Option<Rect>,
    pub(crate) objects: &'a Arc<Mutex<ObjectSelection>>,
    pub(crate) origin: OriginTag,
    pub(crate) events: &'a Arc<EventQueue>,
    pub(crate) view: ViewPort,
    pub(crate) modifiers: Modifiers,
    pub(crate) drag_insert_position: bool,
}

impl GestureCtx<'_> {
    pub fn doc(&self) -> &Document {
        &*self.doc
    }

    pub fn zoom(&self) -> f64 {
        self.view.zoom
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn points(&self) -> &PointSelection {
        &*self.points
    }

    /// Object-to-canvas transform of the edited shape
    pub fn object_transform(&self) -> Affine {
        self.target
            .shape
            .and_then(|id| self.doc.shape(id))
            .map(|shape| shape.transform)
            .unwrap_or(Affine::IDENTITY)
    }

    pub fn to_object(&self, canvas: Point) -> Point {
        self.object_transform().inverse() * canvas
    }

    pub fn to_canvas(&self, object: Point) -> Point {
        self.object_transform() * object
    }

    /// Screen pixels between two object-space points
    pub fn screen_distance(&self, a: Point, b: Point) -> f64 {
        self.to_canvas(a).distance(self.to_canvas(b)) * self.view.zoom
    }

    /// Mutable access to a curve; its prior state is recorded for undo
    pub fn curve_mut(&mut self, id: CurveId) -> Option<&mut PathCurve> {
        self.tx.touch_curve(&*self.doc, id);
        self.doc.curve_mut(id)
    }

    // ===== POINT SELECTION =====

    /// Select `point`; without `extend` everything else is deselected
    pub fn select_point(&mut self, point: PathPointRef, extend: bool) {
        if extend {
            self.points.insert(point);
        } else {
            self.points.select_only(point);
        }
    }

    pub fn deselect_point(&mut self, point: &PathPointRef) {
        self.points.remove(point);
    }

    /// Show `rect` (canvas space) as the rubber band and select
    /// `previous` XOR the points inside it.
    ///
    /// A point is inside if the point or either handle is.
    pub fn set_selection_rect(&mut self, rect: Option<Rect>, previous: &PointSelection) {
        if *self.selection_rect == rect {
            return;
        }
        *self.selection_rect = rect;
        let Some(rect) = rect else {
            return;
        };
        let transform = self.object_transform();
        let inside = self
            .target
            .paths
            .iter()
            .filter_map(|&id| self.doc.curve(id).map(|curve| (id, curve)))
            .flat_map(|(id, curve)| {
                curve
                    .points()
                    .iter()
                    .enumerate()
                    .filter(move |(_, cp)| {
                        [cp.point, cp.point_in, cp.point_out]
                            .into_iter()
                            .any(|p| rect.contains(transform * p))
                    })
                    .map(move |(index, _)| PathPointRef::whole(id, index))
            });
        *self.points = previous.symmetric_difference(&PointSelection::from_points(inside));
    }

    // ===== EDITED SHAPE =====

    /// Switch the edited shape.
    ///
    /// With `modify_selection` the object selection follows, tagged with
    /// the tool's origin so the tool ignores the echo.
    pub fn set_shape(&mut self, shape: Option<ShapeId>, modify_selection: bool) {
        if self.target.shape.is_none() || self.target.shape != shape {
            let listener = self.events.as_listener();
            for &id in &self.target.paths {
                if let Some(curve) = self.doc.curve_mut(id) {
                    curve.remove_listener(&listener);
                }
            }
            self.target.paths.clear();
            self.target.current = None;
            self.points.clear();
        }
        if self.target.shape == shape {
            return;
        }
        self.target.shape = shape;

        match shape.and_then(|id| self.doc.shape(id)).map(|s| s.paths.clone()) {
            Some(paths) => {
                tracing::debug!("PathTool: editing shape {shape:?}");
                let listener = self.events.as_listener();
                for &id in &paths {
                    if let Some(curve) = self.doc.curve_mut(id) {
                        curve.add_listener(listener.clone());
                    }
                }
                self.target.current = paths.first().copied();
                self.target.paths = paths;
                if let (true, Some(shape)) = (modify_selection, shape) {
                    let mut objects = lock_selection(self.objects);
                    let others: Vec<ShapeId> = objects.selected().filter(|&s| s != shape).collect();
                    for other in others {
                        objects.deselect(other, self.origin);
                    }
                    objects.select(shape, self.origin);
                }
            }
            None => {
                self.target.shape = None;
                if modify_selection {
                    lock_selection(self.objects).clear(self.origin);
                }
            }
        }
    }

    /// Create a new shape positioned at `canvas` and start editing it
    pub fn create_shape(&mut self, canvas: Point) -> Result<ShapeId, EditError> {
        let shape = self.doc.create_shape(Affine::translate(canvas.to_vec2()))?;
        self.tx.created_shape(shape);
        self.set_shape(Some(shape), true);
        Ok(shape)
    }

    /// Create a new curve in the edited shape with one point at `object`;
    /// it becomes the current curve
    pub fn create_path(&mut self, object: Point) -> Result<CurveId, EditError> {
        let shape = self.target.shape.ok_or(EditError::NoShape)?;
        if self.target.paths.try_reserve(1).is_err() {
            return Err(EditError::Allocation("path list"));
        }
        self.tx.touch_shape(&*self.doc, shape);
        let id = self.doc.create_curve(shape)?;
        self.tx.created_curve(id);

        let listener = self.events.as_listener();
        let curve = self.doc.curve_mut(id).ok_or(EditError::UnknownCurve(id))?;
        curve.add_listener(listener);
        if !curve.add_point(object) {
            return Err(EditError::Allocation("control point"));
        }
        self.target.paths.push(id);
        self.target.current = Some(id);
        Ok(id)
    }

    // ===== CURVE NOTIFICATIONS =====

    /// Apply pending curve notifications to the point selection
    pub fn sync(&mut self) {
        for (curve, event) in self.events.drain() {
            let count = self.doc.curve(curve).map_or(0, PathCurve::count_points);
            match event {
                PathEvent::PointAdded(index) => {
                    self.points.select_only(PathPointRef::whole(curve, index));
                }
                PathEvent::PointRemoved(index) => self.points.point_removed(curve, index),
                PathEvent::PathReversed => self.points.path_reversed(curve, count),
                PathEvent::PathChanged => self.points.truncate(curve, count),
                PathEvent::PointChanged(_) | PathEvent::PathClosedChanged => {}
            }
        }
    }
}

// ===== Gesture Modules =====

pub mod add_point;
pub mod close_path;
pub mod create_path;
pub mod drag_point;
pub mod drag_selection;
pub mod insert_point;
pub mod path_tool;
pub mod pick_shape;
pub mod remove_point;
pub mod select_points;
pub mod toggle_smooth;

pub use path_tool::PathTool;
