// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Closing (or reopening) a curve by clicking its first point.

use super::{CursorKind, Gesture, GestureCtx, Transition};
use crate::editing::Modifiers;
use crate::error::EditError;
use crate::model::CurveId;
use kurbo::Point;

#[derive(Debug, Clone)]
pub struct ClosePath {
    curve: CurveId,
}

impl ClosePath {
    pub fn new(curve: CurveId) -> Self {
        Self { curve }
    }
}

impl Gesture for ClosePath {
    fn set_origin(
        &mut self,
        _origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        if let Some(curve) = ctx.curve_mut(self.curve) {
            let closed = curve.is_closed();
            curve.set_closed(!closed);
        }
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
        CursorKind::PathClose
    }

    fn command_name(&self) -> &'static str {
        "Close path"
    }
}
