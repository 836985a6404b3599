// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Click-toggle and rubber-band point selection.

use super::{CursorKind, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef, PointSelection};
use crate::error::EditError;
use crate::settings;
use kurbo::{Point, Rect};

/// Toggles a clicked point, or rubber-bands when started off any point
#[derive(Debug, Clone, Default)]
pub struct SelectPoints {
    /// The clicked point, if any
    point: Option<PathPointRef>,
    /// Gesture start, canvas space
    start: Point,
    /// Selection when the gesture started
    previous: PointSelection,
    /// Canvas distance dragged so far
    drag_distance: f64,
}

impl SelectPoints {
    pub fn new(point: Option<PathPointRef>) -> Self {
        Self {
            point: point.map(PathPointRef::as_whole),
            ..Self::default()
        }
    }

    pub fn point(&self) -> Option<PathPointRef> {
        self.point
    }

    /// A click off any point that never became a rubber band clears the
    /// selection on pointer-up
    pub fn deselect_on_pointer_up(&self, zoom: f64) -> bool {
        self.point.is_none()
            && self.drag_distance * zoom < settings::gesture::RUBBER_BAND_THRESHOLD
    }
}

impl Gesture for SelectPoints {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        self.start = origin;
        self.previous = ctx.points().clone();
        self.drag_distance = 0.0;
        if let Some(point) = self.point {
            if self.previous.contains(&point) {
                ctx.deselect_point(&point);
            } else {
                ctx.select_point(point, true);
            }
        }
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        current: Point,
        _modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        if self.point.is_some() {
            return Transition::Stay;
        }
        self.drag_distance = current.distance(self.start);
        let rect = (self.drag_distance * ctx.zoom() >= settings::gesture::RUBBER_BAND_THRESHOLD)
            .then(|| Rect::from_points(self.start, current));
        ctx.set_selection_rect(rect, &self.previous);
        Transition::Stay
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathSelect
    }

    fn command_name(&self) -> &'static str {
        "Select points"
    }
}
