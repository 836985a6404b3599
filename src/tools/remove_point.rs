// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Removing a point, or retracting one of its handles.

use super::{CursorKind, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use crate::path::HandleKind;
use kurbo::Point;

/// Removes the hit point; a hit handle collapses onto its point instead
#[derive(Debug, Clone)]
pub struct RemovePoint {
    target: PathPointRef,
}

impl RemovePoint {
    pub fn new(target: PathPointRef) -> Self {
        Self { target }
    }
}

impl Gesture for RemovePoint {
    fn set_origin(
        &mut self,
        _origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        let index = self.target.index;
        let which = self.target.which;
        let Some(curve) = ctx.curve_mut(self.target.curve) else {
            return Ok(Transition::Stay);
        };
        let Some(point) = curve.point_at(index) else {
            return Ok(Transition::Stay);
        };
        match which {
            HandleKind::Point | HandleKind::AllOfPoint => curve.remove_point(index),
            HandleKind::HandleIn => curve.set_point_in(index, point),
            HandleKind::HandleOut => curve.set_point_out(index, point, false),
        };
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        _current: Point,
        _modifiers: Modifiers,
        _ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        Transition::Stay
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathRemove
    }

    fn command_name(&self) -> &'static str {
        "Remove path point"
    }
}
