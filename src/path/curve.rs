// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! `PathCurve`: an ordered sequence of cubic control points.
//!
//! The curve is the only way to mutate its points. Every mutation commits
//! fully, drops the cached bounds, and then notifies listeners in
//! registration order. Out-of-range indices are silent no-ops that return
//! `false` (or `None` for queries).

use super::events::{ListenerList, PathEvent, PathListener};
use super::flatten::{FlatEl, Flatten, PathIterator, tolerance_for};
use super::locator;
use super::point::{ControlPoint, mirror};
use crate::model::CurveId;
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, Weak};

/// The point data of a curve without identity or listeners.
///
/// Used for undo snapshots and for the debug dump.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveSnapshot {
    pub points: Vec<ControlPoint>,
    pub closed: bool,
}

/// A cubic bezier curve made of control points with tangent handles
#[derive(Debug, Clone)]
pub struct PathCurve {
    id: CurveId,
    points: Vec<ControlPoint>,
    closed: bool,
    /// Bounds of the flattened curve; reset by every mutation
    bounds: OnceLock<Rect>,
    listeners: ListenerList,
    /// While set, notifications are held back
    suspended: bool,
    /// A mutation happened while suspended
    changed_while_suspended: bool,
}

impl PathCurve {
    /// Create an empty, open curve
    pub fn new() -> Self {
        Self::with_id(CurveId::next())
    }

    /// Create an empty curve that reuses an existing id (undo/redo)
    pub(crate) fn with_id(id: CurveId) -> Self {
        Self {
            id,
            points: Vec::new(),
            closed: false,
            bounds: OnceLock::new(),
            listeners: ListenerList::default(),
            suspended: false,
            changed_while_suspended: false,
        }
    }

    /// Create a curve from existing point data
    pub fn from_snapshot(snapshot: CurveSnapshot) -> Self {
        let mut curve = Self::new();
        curve.points = snapshot.points;
        curve.closed = snapshot.closed;
        curve
    }

    pub fn id(&self) -> CurveId {
        self.id
    }

    /// Copy of the point data
    pub fn snapshot(&self) -> CurveSnapshot {
        CurveSnapshot {
            points: self.points.clone(),
            closed: self.closed,
        }
    }

    /// Replace all point data; notifies `PathChanged`
    pub fn restore(&mut self, snapshot: &CurveSnapshot) -> bool {
        if self.points.len() < snapshot.points.len()
            && self
                .points
                .try_reserve(snapshot.points.len() - self.points.len())
                .is_err()
        {
            tracing::warn!("PathCurve::restore: failed to reserve {} points", snapshot.points.len());
            return false;
        }
        self.points.clear();
        self.points.extend_from_slice(&snapshot.points);
        self.closed = snapshot.closed;
        self.commit(PathEvent::PathChanged);
        true
    }

    // ===== STRUCTURE =====

    /// Append a point with zero-length handles
    pub fn add_point(&mut self, point: Point) -> bool {
        self.insert(self.points.len(), ControlPoint::at(point))
    }

    /// Insert a point with zero-length handles at `index` (clamped to the end)
    pub fn add_point_at(&mut self, point: Point, index: usize) -> bool {
        self.insert(index.min(self.points.len()), ControlPoint::at(point))
    }

    /// Append a point with explicit handles
    pub fn add_control_point(
        &mut self,
        point: Point,
        point_in: Point,
        point_out: Point,
        connected: bool,
    ) -> bool {
        self.insert(
            self.points.len(),
            ControlPoint::new(point, point_in, point_out, connected),
        )
    }

    /// Insert a fully specified control point at `index` (clamped to the end)
    pub fn insert_control_point(&mut self, index: usize, control: ControlPoint) -> bool {
        self.insert(index.min(self.points.len()), control)
    }

    fn insert(&mut self, index: usize, control: ControlPoint) -> bool {
        if self.points.try_reserve(1).is_err() {
            tracing::warn!("PathCurve: failed to allocate control point");
            return false;
        }
        self.points.insert(index, control);
        self.commit(PathEvent::PointAdded(index));
        true
    }

    /// Insert a point on segment `segment` at parametric position `t`
    /// without changing the curve's shape.
    ///
    /// The neighbouring handles are shortened to match. Listeners see one
    /// `PointAdded` for the whole split. Returns the index of the new point.
    pub fn split_segment(&mut self, segment: usize, t: f64) -> Option<usize> {
        let split = locator::split_segment(&self.points, self.closed, segment, t)?;
        if self.points.try_reserve(1).is_err() {
            tracing::warn!("PathCurve: failed to allocate control point");
            return None;
        }
        let index = segment + 1;
        self.points.insert(index, split.inserted);
        self.points[segment].point_out = split.start_out;
        let end = locator::segment_end(&self.points, index);
        if let Some(next) = self.points.get_mut(end) {
            next.point_in = split.end_in;
        }
        self.commit(PathEvent::PointAdded(index));
        Some(index)
    }

    /// Remove the point at `index`, shifting later points down
    pub fn remove_point(&mut self, index: usize) -> bool {
        if index >= self.points.len() {
            return false;
        }
        self.points.remove(index);
        self.commit(PathEvent::PointRemoved(index));
        true
    }

    /// Remove every point
    pub fn make_empty(&mut self) {
        if self.points.is_empty() {
            return;
        }
        self.points.clear();
        self.commit(PathEvent::PathChanged);
    }

    // ===== POINT MUTATION =====

    /// Move the point at `index`; its handles travel by the same offset
    pub fn set_point(&mut self, index: usize, point: Point) -> bool {
        let Some(control) = self.points.get_mut(index) else {
            return false;
        };
        let delta = point - control.point;
        control.translate(delta);
        self.commit(PathEvent::PointChanged(index));
        true
    }

    /// Replace point, both handles, and the connected flag at `index`
    pub fn set_control_point(&mut self, index: usize, control: ControlPoint) -> bool {
        let Some(slot) = self.points.get_mut(index) else {
            return false;
        };
        *slot = control;
        self.commit(PathEvent::PointChanged(index));
        true
    }

    /// Move the in-handle at `index`
    pub fn set_point_in(&mut self, index: usize, point_in: Point) -> bool {
        let Some(control) = self.points.get_mut(index) else {
            return false;
        };
        control.point_in = point_in;
        self.commit(PathEvent::PointChanged(index));
        true
    }

    /// Move the out-handle at `index`.
    ///
    /// With `mirror`, the in-handle is placed at the reflection of the new
    /// out-handle through the point.
    pub fn set_point_out(&mut self, index: usize, point_out: Point, mirror_in: bool) -> bool {
        let Some(control) = self.points.get_mut(index) else {
            return false;
        };
        control.point_out = point_out;
        if mirror_in {
            control.point_in = mirror(point_out, control.point);
        }
        self.commit(PathEvent::PointChanged(index));
        true
    }

    /// Set the advisory collinearity flag; handles do not move
    pub fn set_in_out_connected(&mut self, index: usize, connected: bool) -> bool {
        let Some(control) = self.points.get_mut(index) else {
            return false;
        };
        control.connected = connected;
        self.commit(PathEvent::PointChanged(index));
        true
    }

    // ===== QUERIES =====

    pub fn point_at(&self, index: usize) -> Option<Point> {
        self.points.get(index).map(|c| c.point)
    }

    pub fn point_in_at(&self, index: usize) -> Option<Point> {
        self.points.get(index).map(|c| c.point_in)
    }

    pub fn point_out_at(&self, index: usize) -> Option<Point> {
        self.points.get(index).map(|c| c.point_out)
    }

    pub fn points_at(&self, index: usize) -> Option<ControlPoint> {
        self.points.get(index).copied()
    }

    /// All control points in traversal order
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn count_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of cubic segments, counting the closing one
    pub fn segment_count(&self) -> usize {
        locator::segment_count(&self.points, self.closed)
    }

    /// Distance to the nearest segment and the index of its start point
    pub fn distance(&self, query: Point) -> Option<(f64, usize)> {
        locator::distance(&self.points, self.closed, query)
    }

    /// Parametric position on segment `segment` closest to `query`
    pub fn find_bezier_scale(&self, segment: usize, query: Point) -> Option<f64> {
        locator::find_bezier_scale(&self.points, self.closed, segment, query)
    }

    /// Point on segment `segment` at parametric position `t`
    pub fn point_on_segment(&self, segment: usize, t: f64) -> Option<Point> {
        locator::point_on_segment(&self.points, self.closed, segment, t)
    }

    /// Tight bounds of the flattened curve.
    ///
    /// An empty curve has zero bounds.
    pub fn bounds(&self) -> Rect {
        *self.bounds.get_or_init(|| {
            let mut flat = self.flatten(1.0).map(|el| match el {
                FlatEl::MoveTo(p) | FlatEl::LineTo(p) => p,
            });
            let Some(first) = flat.next() else {
                return Rect::ZERO;
            };
            flat.fold(Rect::from_points(first, first), |rect, p| rect.union_pt(p))
        })
    }

    /// Bounds of every point and handle; always contains `bounds()`
    pub fn control_point_bounds(&self) -> Rect {
        let mut all = self
            .points
            .iter()
            .flat_map(|c| [c.point, c.point_in, c.point_out]);
        let Some(first) = all.next() else {
            return Rect::ZERO;
        };
        all.fold(Rect::from_points(first, first), |rect, p| rect.union_pt(p))
    }

    /// Lazy polyline approximation; larger `smoothness` is finer
    pub fn flatten(&self, smoothness: f64) -> Flatten<'_> {
        Flatten::new(&self.points, self.closed, tolerance_for(smoothness))
    }

    /// Feed the polyline approximation to `consumer`
    pub fn iterate(&self, consumer: &mut dyn PathIterator, smoothness: f64) {
        for el in self.flatten(smoothness) {
            match el {
                FlatEl::MoveTo(p) => consumer.move_to(p),
                FlatEl::LineTo(p) => consumer.line_to(p),
            }
        }
    }

    /// Convert to a kurbo path for rendering and fill hit-testing
    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(first.point);
        for index in 0..self.segment_count() {
            if let Some(cubic) = locator::segment(&self.points, self.closed, index) {
                path.curve_to(cubic.p1, cubic.p2, cubic.p3);
            }
        }
        if self.closed {
            path.close_path();
        }
        path
    }

    // ===== WHOLE-PATH OPERATIONS =====

    /// Open or close the curve
    pub fn set_closed(&mut self, closed: bool) {
        if self.closed == closed {
            return;
        }
        self.closed = closed;
        self.commit(PathEvent::PathClosedChanged);
    }

    /// Reverse traversal order; each point swaps its handles.
    ///
    /// Applying it twice restores the original exactly.
    pub fn reverse(&mut self) {
        self.points.reverse();
        for control in &mut self.points {
            control.swap_handles();
        }
        self.commit(PathEvent::PathReversed);
    }

    /// Apply `transform` to every point and handle
    pub fn apply_transform(&mut self, transform: Affine) {
        for control in &mut self.points {
            control.transform(transform);
        }
        self.commit(PathEvent::PathChanged);
    }

    /// Merge consecutive control points that sit at the same position.
    ///
    /// The merged point keeps the in-handle of the first and the out-handle
    /// of the second. Returns the number of points removed.
    pub fn clean_up(&mut self) -> usize {
        let before = self.points.len();
        let mut merged: Vec<ControlPoint> = Vec::with_capacity(before);
        for control in self.points.drain(..) {
            match merged.last_mut() {
                Some(last) if last.point == control.point => {
                    last.point_out = control.point_out;
                    last.connected &= control.connected;
                }
                _ => merged.push(control),
            }
        }
        if self.closed && merged.len() > 1 {
            let last = merged[merged.len() - 1];
            if last.point == merged[0].point {
                merged[0].point_in = last.point_in;
                merged.pop();
            }
        }
        self.points = merged;
        let removed = before - self.points.len();
        if removed > 0 {
            self.commit(PathEvent::PathChanged);
        }
        removed
    }

    // ===== NOTIFICATION =====

    /// Register a listener; the curve only keeps a weak reference
    pub fn add_listener(&mut self, listener: Weak<dyn PathListener>) -> bool {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, listener: &Weak<dyn PathListener>) -> bool {
        self.listeners.remove(listener)
    }

    pub fn count_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Hold back notifications; resuming after any mutation delivers a
    /// single `PathChanged`
    pub fn suspend_notifications(&mut self, suspend: bool) {
        if self.suspended == suspend {
            return;
        }
        self.suspended = suspend;
        if !suspend && std::mem::take(&mut self.changed_while_suspended) {
            self.listeners.notify(self.id, PathEvent::PathChanged);
        }
    }

    /// Drop cached data and tell listeners; called after each mutation
    fn commit(&mut self, event: PathEvent) {
        self.bounds = OnceLock::new();
        if self.suspended {
            self.changed_while_suspended = true;
            return;
        }
        self.listeners.notify(self.id, event);
    }
}

impl Default for PathCurve {
    fn default() -> Self {
        Self::new()
    }
}
