// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Toggling a point between smooth and sharp.

use super::drag_point::DragPoint;
use super::{CursorKind, DragMode, Gesture, GestureCtx, Transition};
use crate::editing::{Modifiers, PathPointRef};
use crate::error::EditError;
use crate::path::{ControlPoint, HandleKind};
use crate::settings;
use kurbo::Point;

/// Flips a point between connected and corner; dragging far enough turns
/// the gesture into a handle drag
#[derive(Debug, Clone)]
pub struct ToggleSmoothSharp {
    target: PathPointRef,
    mode: DragMode,
    /// Gesture start, object space
    origin: Point,
}

impl ToggleSmoothSharp {
    /// `mode` comes from the part that was hit: the point itself drags the
    /// out-handle with the in-handle mirrored
    pub fn new(target: PathPointRef) -> Self {
        let mode = match target.which {
            HandleKind::HandleIn => DragMode::MoveIn,
            HandleKind::HandleOut => DragMode::MoveOut,
            HandleKind::Point | HandleKind::AllOfPoint => DragMode::MoveOutMirrorIn,
        };
        Self {
            target,
            mode,
            origin: Point::ZERO,
        }
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }
}

/// The point after a smooth/sharp toggle.
///
/// A connected point becomes a corner; with `reset` its handles also
/// collapse onto it. A corner becomes connected, with the in-handle turned
/// to face away from the out-handle at its old length.
pub fn toggle_sharp(mut cp: ControlPoint, reset: bool) -> ControlPoint {
    if cp.connected {
        cp.connected = false;
        if reset {
            cp.point_in = cp.point;
            cp.point_out = cp.point;
        }
    } else {
        cp.connected = true;
        let out = cp.point_out - cp.point;
        if out.hypot2() > 0.0 {
            let in_len = (cp.point_in - cp.point).hypot();
            cp.point_in = cp.point - out.normalize() * in_len;
        }
    }
    cp
}

impl Gesture for ToggleSmoothSharp {
    fn set_origin(
        &mut self,
        origin: Point,
        ctx: &mut GestureCtx<'_>,
    ) -> Result<Transition, EditError> {
        self.origin = ctx.to_object(origin);
        let index = self.target.index;
        let reset = self.mode == DragMode::MoveOutMirrorIn;
        if let Some(curve) = ctx.curve_mut(self.target.curve) {
            if let Some(cp) = curve.points_at(index) {
                curve.set_control_point(index, toggle_sharp(cp, reset));
            }
        }
        ctx.select_point(self.target.as_whole(), false);
        Ok(Transition::Stay)
    }

    fn drag_to(
        &mut self,
        current: Point,
        modifiers: Modifiers,
        ctx: &mut GestureCtx<'_>,
    ) -> Transition {
        let moved = ctx.screen_distance(self.origin, ctx.to_object(current));
        if moved <= settings::gesture::RECLASSIFY_THRESHOLD {
            return Transition::Stay;
        }
        let which = match self.mode {
            DragMode::MoveIn => HandleKind::HandleIn,
            _ => HandleKind::HandleOut,
        };
        let target = PathPointRef::new(self.target.curve, self.target.index, which);
        let origin = ctx.to_canvas(self.origin);
        DragPoint::take_over(target, self.mode, origin, Some((current, modifiers)), ctx)
            .unwrap_or_else(|err| {
                tracing::warn!("PathTool: could not start handle drag: {err}");
                Transition::Stay
            })
    }

    fn cursor(&self, _current: Point) -> CursorKind {
        CursorKind::PathSharp
    }

    fn command_name(&self) -> &'static str {
        "Set path point sharp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_becomes_corner() {
        let cp = ControlPoint::new(
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            true,
        );
        let kept = toggle_sharp(cp, false);
        assert!(!kept.connected);
        assert_eq!(kept.point_in, cp.point_in);

        let reset = toggle_sharp(cp, true);
        assert!(reset.is_corner());
    }

    #[test]
    fn corner_becomes_smooth_keeping_in_length() {
        let cp = ControlPoint::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 0.0),
            false,
        );
        let smooth = toggle_sharp(cp, false);
        assert!(smooth.connected);
        assert!((smooth.point_in - Point::new(-5.0, 0.0)).hypot() < 1e-9);
        assert_eq!(smooth.point_out, cp.point_out);
    }

    #[test]
    fn corner_without_out_handle_keeps_in_handle() {
        let cp = ControlPoint::new(Point::ZERO, Point::new(3.0, 4.0), Point::ZERO, false);
        let smooth = toggle_sharp(cp, false);
        assert!(smooth.connected);
        assert_eq!(smooth.point_in, cp.point_in);
    }
}
