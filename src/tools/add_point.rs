// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Appending a point to the current curve.

use super::drag_point::DragPoint;
use super::{CursorKind, DragMode, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use crate::model::CurveId;
use crate::path::HandleKind;
use crate::settings;
use kurbo::Point;

/// Appends a point; dragging pulls out its handles symmetrically
#[derive(Debug, Clone)]
pub struct AddPoint {
    curve: CurveId,
    /// Index of the appended point, once added
    added: Option<usize>,
    /// Gesture start, object space
    origin: Point,
}

impl AddPoint {
    pub fn new(curve: CurveId) -> Self {
        Self {
            curve,
            added: None,
            origin: Point::ZERO,
        }
    }
}

impl Gesture for AddPoint {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        self.origin = ctx.to_object(origin);
        let object = self.origin;
        let curve = ctx
            .curve_mut(self.curve)
            .ok_or(EditError::UnknownCurve(self.curve))?;
        if !curve.add_point(object) {
            return Err(EditError::Allocation("control point"));
        }
        let index = curve.count_points() - 1;
        self.added = Some(index);
        ctx.select_point(PathPointRef::whole(self.curve, index), false);
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        current: Point,
        modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        let Some(index) = self.added else {
            return Transition::Stay;
        };
        let moved = ctx.screen_distance(self.origin, ctx.to_object(current));
        if moved <= settings::gesture::RECLASSIFY_THRESHOLD {
            return Transition::Stay;
        }
        let target = PathPointRef::new(self.curve, index, HandleKind::HandleOut);
        let origin = ctx.to_canvas(self.origin);
        DragPoint::take_over(
            target,
            DragMode::MoveOutMirrorIn,
            origin,
            Some((current, modifiers)),
            ctx,
        )
        .unwrap_or_else(|err| {
            tracing::warn!("PathTool: could not start handle drag: {err}");
            Transition::Stay
        })
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathAdd
    }

    fn command_name(&self) -> &'static str {
        "Add path point"
    }
}
