// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Control points: an on-curve vertex plus its two tangent handles.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// A vertex on the curve together with its in- and out-handles.
///
/// Handles are absolute positions, not offsets from `point`. A handle that
/// coincides with `point` is a zero-length tangent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Position on the curve
    pub point: Point,
    /// Handle for the incoming segment
    pub point_in: Point,
    /// Handle for the outgoing segment
    pub point_out: Point,
    /// Point and handles are meant to stay collinear.
    ///
    /// Advisory only; the curve never enforces it.
    pub connected: bool,
}

/// Which part of a control point an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// The on-curve point itself
    Point,
    /// The incoming tangent handle
    HandleIn,
    /// The outgoing tangent handle
    HandleOut,
    /// The point with both handles, as a unit
    AllOfPoint,
}

impl ControlPoint {
    /// A point whose handles coincide with it (zero-length tangents).
    ///
    /// The point starts out connected, so the first mirrored drag of its
    /// out-handle keeps the tangent smooth.
    pub fn at(point: Point) -> Self {
        Self {
            point,
            point_in: point,
            point_out: point,
            connected: true,
        }
    }

    pub fn new(point: Point, point_in: Point, point_out: Point, connected: bool) -> Self {
        Self {
            point,
            point_in,
            point_out,
            connected,
        }
    }

    /// Move the point and both handles by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.point += delta;
        self.point_in += delta;
        self.point_out += delta;
    }

    /// Apply an affine transform to the point and both handles
    pub fn transform(&mut self, affine: Affine) {
        self.point = affine * self.point;
        self.point_in = affine * self.point_in;
        self.point_out = affine * self.point_out;
    }

    /// Swap the in- and out-handle (used when reversing a curve)
    pub fn swap_handles(&mut self) {
        std::mem::swap(&mut self.point_in, &mut self.point_out);
    }

    /// Position of the addressed part; `AllOfPoint` resolves to the point
    pub fn position(&self, which: HandleKind) -> Point {
        match which {
            HandleKind::Point | HandleKind::AllOfPoint => self.point,
            HandleKind::HandleIn => self.point_in,
            HandleKind::HandleOut => self.point_out,
        }
    }

    /// Both handles sit on the point
    pub fn is_corner(&self) -> bool {
        self.point_in == self.point && self.point_out == self.point
    }
}

/// Reflect `handle` through `center`
pub(crate) fn mirror(handle: Point, center: Point) -> Point {
    center + (center - handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_point_has_zero_length_handles() {
        let cp = ControlPoint::at(Point::new(3.0, 4.0));
        assert!(cp.is_corner());
        assert!(cp.connected);
    }

    #[test]
    fn translate_moves_handles_along() {
        let mut cp = ControlPoint::new(
            Point::new(0.0, 0.0),
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
            true,
        );
        cp.translate(Vec2::new(2.0, 3.0));
        assert_eq!(cp.point, Point::new(2.0, 3.0));
        assert_eq!(cp.point_in, Point::new(1.0, 3.0));
        assert_eq!(cp.point_out, Point::new(3.0, 3.0));
    }

    #[test]
    fn position_by_handle_kind() {
        let cp = ControlPoint::new(
            Point::new(0.0, 0.0),
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
            false,
        );
        assert_eq!(cp.position(HandleKind::AllOfPoint), cp.point);
        assert_eq!(cp.position(HandleKind::HandleIn), cp.point_in);
        assert_eq!(cp.position(HandleKind::HandleOut), cp.point_out);
    }

    #[test]
    fn mirror_reflects_through_center() {
        let m = mirror(Point::new(3.0, 1.0), Point::new(1.0, 1.0));
        assert_eq!(m, Point::new(-1.0, 1.0));
    }
}
