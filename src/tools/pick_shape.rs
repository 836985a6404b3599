// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Switching the edited shape by clicking on it.

use super::{CursorKind, Gesture, GestureCtx, Transition};
use crate::editing::Modifiers;
use crate::error::EditError;
use crate::model::ShapeId;
use kurbo::Point;

#[derive(Debug, Clone)]
pub struct PickShape {
    shape: Option<ShapeId>,
}

impl PickShape {
    /// `shape` is the shape under the pointer, if any
    pub fn new(shape: Option<ShapeId>) -> Self {
        Self { shape }
    }
}

impl Gesture for PickShape {
    fn set_origin(
        &mut self,
        _origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        ctx.set_shape(self.shape, true);
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
        if self.shape.is_some() {
            CursorKind::FollowLink
        } else {
            CursorKind::Default
        }
    }

    fn command_name(&self) -> &'static str {
        "Pick shape"
    }
}
