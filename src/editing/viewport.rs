// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Screen (device pixel) to canvas coordinate conversion.
//!
//! Canvas space is the document's shared coordinate space; each shape then
//! maps canvas to its own object space through its transform. Hit radii are
//! given in screen pixels and divided by the zoom to get canvas distances.

use crate::settings;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// The position and scale of the view over the canvas.
///
/// `screen = canvas * zoom + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPort {
    /// Screen position of the canvas origin
    pub offset: Vec2,
    /// Screen pixels per canvas unit
    pub zoom: f64,
}

impl ViewPort {
    pub fn new(offset: Vec2, zoom: f64) -> Self {
        let mut view = Self { offset, zoom: 1.0 };
        view.set_zoom(zoom);
        view
    }

    /// Set the zoom, clamped to the supported range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(settings::view::MIN_ZOOM, settings::view::MAX_ZOOM)
        } else {
            1.0
        };
    }

    /// Canvas to screen transform
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        ((screen - self.offset).to_vec2() / self.zoom).to_point()
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        (canvas.to_vec2() * self.zoom).to_point() + self.offset
    }

    /// Convert a length in screen pixels to canvas units
    pub fn screen_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }
}

impl Default for ViewPort {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_canvas_round_trip() {
        let view = ViewPort::new(Vec2::new(100.0, 50.0), 2.0);
        let canvas = Point::new(10.0, -4.0);
        let screen = view.canvas_to_screen(canvas);
        assert_eq!(screen, Point::new(120.0, 42.0));
        assert_eq!(view.screen_to_canvas(screen), canvas);
        assert_eq!(view.affine() * canvas, screen);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewPort::default();
        view.set_zoom(1e9);
        assert_eq!(view.zoom, settings::view::MAX_ZOOM);
        view.set_zoom(f64::NAN);
        assert_eq!(view.zoom, 1.0);
    }

    #[test]
    fn hit_radius_shrinks_with_zoom() {
        let view = ViewPort::new(Vec2::ZERO, 4.0);
        assert_eq!(view.screen_distance(10.0), 2.5);
    }
}
