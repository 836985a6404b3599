// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Dragging one point or handle.

use super::{CursorKind, DragMode, Gesture, GestureCtx, GestureKind, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use kurbo::{Point, Vec2};

/// Moves one point or handle so it follows the pointer
#[derive(Debug, Clone)]
pub struct DragPoint {
    target: PathPointRef,
    mode: DragMode,
    /// Pointer minus handle position at the start, object space
    click_offset: Vec2,
}

impl DragPoint {
    pub fn new(target: PathPointRef, mode: DragMode) -> Self {
        Self {
            target,
            mode,
            click_offset: Vec2::ZERO,
        }
    }

    pub fn target(&self) -> PathPointRef {
        self.target
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Take over a running gesture: start at `origin`, then follow to
    /// `current` if given. Both are canvas space.
    pub(crate) fn take_over(
        target: PathPointRef,
        mode: DragMode,
        origin: Point,
        current: Option<(Point, Modifiers)>,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        tracing::debug!("PathTool: continuing as drag of {target:?} ({mode:?})");
        ctx.sync();
        let mut drag = DragPoint::new(target, mode);
        drag.set_origin(origin, ctx)?;
        if let Some((current, modifiers)) = current {
            drag.drag_to(current, modifiers, ctx);
        }
        Ok(Transition::Become(GestureKind::DragPoint(drag)))
    }
}

impl Gesture for DragPoint {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        let origin = ctx.to_object(origin);
        let Some(cp) = self.target.control_point(ctx.doc()) else {
            return Ok(Transition::Stay);
        };
        let handle = match self.mode {
            DragMode::MovePoint => cp.point,
            DragMode::MoveIn => cp.point_in,
            DragMode::MoveOut | DragMode::MoveOutMirrorIn => cp.point_out,
        };
        self.click_offset = origin - handle;

        let whole = self.target.as_whole();
        let shift = ctx.modifiers().shift;
        if shift && ctx.points().contains(&whole) {
            ctx.deselect_point(&whole);
        } else {
            ctx.select_point(whole, shift);
        }
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        current: Point,
        _modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        let position = ctx.to_object(current) - self.click_offset;
        let index = self.target.index;
        let mode = self.mode;
        let Some(curve) = ctx.curve_mut(self.target.curve) else {
            return Transition::Stay;
        };
        match mode {
            DragMode::MovePoint => curve.set_point(index, position),
            DragMode::MoveIn => curve.set_point_in(index, position),
            DragMode::MoveOut => curve.set_point_out(index, position, false),
            DragMode::MoveOutMirrorIn => curve.set_point_out(index, position, true),
        };
        Transition::Stay
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathMove
    }

    fn command_name(&self) -> &'static str {
        "Drag path point"
    }
}
