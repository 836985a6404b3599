// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Inserting a point on a segment without changing the curve's shape.

use super::drag_point::DragPoint;
use super::{CursorKind, DragMode, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use crate::model::CurveId;
use crate::path::{ControlPoint, HandleKind};
use crate::settings;
use kurbo::Point;

/// Splits `segment` under the pointer.
///
/// Dragging afterwards either slides the new point along the original
/// segment or drags it freely, depending on the tool's drag-insert setting.
#[derive(Debug, Clone)]
pub struct InsertPoint {
    curve: CurveId,
    segment: usize,
    /// Segment endpoints before the split, restored before each re-split
    previous: Option<ControlPoint>,
    next: Option<ControlPoint>,
    inserted: Option<usize>,
    /// Gesture start, object space
    origin: Point,
}

impl InsertPoint {
    pub fn new(curve: CurveId, segment: usize) -> Self {
        Self {
            curve,
            segment,
            previous: None,
            next: None,
            inserted: None,
            origin: Point::ZERO,
        }
    }

    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Undo the split and split again at the pointer position
    fn slide(&mut self, index: usize, object: Point, ctx: &mut GestureCtx<'_>) {
        let segment = self.segment;
        let (Some(previous), Some(next)) = (self.previous, self.next) else {
            return;
        };
        let Some(curve) = ctx.curve_mut(self.curve) else {
            return;
        };
        curve.suspend_notifications(true);
        curve.remove_point(index);
        let next_index = (segment + 1) % curve.count_points().max(1);
        curve.set_control_point(segment, previous);
        curve.set_control_point(next_index, next);
        if let Some(t) = curve.find_bezier_scale(segment, object) {
            if curve.split_segment(segment, t).is_none() {
                tracing::warn!("PathTool: re-inserting point failed");
            }
        }
        curve.suspend_notifications(false);
    }
}

impl Gesture for InsertPoint {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        self.origin = ctx.to_object(origin);
        let object = self.origin;
        let segment = self.segment;
        let curve = ctx
            .curve_mut(self.curve)
            .ok_or(EditError::UnknownCurve(self.curve))?;
        let count = curve.count_points();
        self.previous = curve.points_at(segment);
        self.next = curve.points_at((segment + 1) % count.max(1));

        let Some(t) = curve.find_bezier_scale(segment, object) else {
            tracing::debug!("PathTool: no split position on segment {segment}");
            return Ok(Transition::Stay);
        };
        let index = curve
            .split_segment(segment, t)
            .ok_or(EditError::Allocation("control point"))?;
        self.inserted = Some(index);
        ctx.select_point(PathPointRef::whole(self.curve, index), false);
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        current: Point,
        modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        let Some(index) = self.inserted else {
            return Transition::Stay;
        };
        let object = ctx.to_object(current);
        if ctx.screen_distance(self.origin, object) <= settings::gesture::RECLASSIFY_THRESHOLD {
            return Transition::Stay;
        }
        if ctx.drag_insert_position {
            self.slide(index, object, ctx);
            return Transition::Stay;
        }
        let target = PathPointRef::new(self.curve, index, HandleKind::Point);
        let origin = ctx.to_canvas(self.origin);
        DragPoint::take_over(
            target,
            DragMode::MovePoint,
            origin,
            Some((current, modifiers)),
            ctx,
        )
        .unwrap_or_else(|err| {
            tracing::warn!("PathTool: could not start point drag: {err}");
            Transition::Stay
        })
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathInsert
    }

    fn command_name(&self) -> &'static str {
        "Insert path point"
    }
}
