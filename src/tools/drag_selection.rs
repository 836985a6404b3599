// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Dragging all selected points together.

use super::{CursorKind, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use kurbo::{Point, Vec2};

/// Moves every selected point by the pointer's movement since the last
/// event
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    /// Pointer position at the previous event, object space
    last: Point,
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Translate every selected point (and its handles) by `delta`
pub(crate) fn move_selection(ctx: &mut GestureCtx<'_>, delta: Vec2) {
    let selected: Vec<PathPointRef> = ctx.points().iter().collect();
    for point in selected {
        let Some(curve) = ctx.curve_mut(point.curve) else {
            continue;
        };
        if let Some(position) = curve.point_at(point.index) {
            curve.set_point(point.index, position + delta);
        }
    }
}

impl Gesture for DragSelection {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        self.last = ctx.to_object(origin);
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        current: Point,
        _modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        let current = ctx.to_object(current);
        let delta = current - self.last;
        self.last = current;
        move_selection(ctx, delta);
        Transition::Stay
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathMove
    }

    fn command_name(&self) -> &'static str {
        "Drag path points"
    }
}
