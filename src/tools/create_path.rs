// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Starting a new curve, optionally in a new shape.
//!
//! Both gestures place the first point at the pointer and immediately hand
//! over to a mirrored drag of its out-handle, so press-drag-release draws a
//! smooth starting point.

use super::drag_point::DragPoint;
use super::{CursorKind, DragMode, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use crate::path::HandleKind;
use kurbo::Point;

/// Adds a new curve to the edited shape
#[derive(Debug, Clone, Default)]
pub struct CreatePath;

/// Creates a new shape positioned at the pointer, with one curve in it
#[derive(Debug, Clone, Default)]
pub struct CreateShape;

impl CreatePath {
    pub fn new() -> Self {
        Self
    }
}

impl CreateShape {
    pub fn new() -> Self {
        Self
    }
}

/// Create the curve at `origin` (canvas) and continue as a handle drag
fn start_path(origin: Point, ctx: &mut GestureCtx<'_>) -> Result<Transition, EditError> {
    let object = ctx.to_object(origin);
    let curve = ctx.create_path(object)?;
    let target = PathPointRef::new(curve, 0, HandleKind::HandleOut);
    DragPoint::take_over(target, DragMode::MoveOutMirrorIn, origin, None, ctx)
}

impl Gesture for CreatePath {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        start_path(origin, ctx)
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
        CursorKind::PathNew
    }

    fn command_name(&self) -> &'static str {
        "Create path"
    }
}

impl Gesture for CreateShape {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        ctx.create_shape(origin)?;
        start_path(origin, ctx)
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
        CursorKind::PathNew
    }

    fn command_name(&self) -> &'static str {
        "Create shape"
    }
}
