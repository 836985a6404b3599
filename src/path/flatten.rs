// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Adaptive flattening of cubic segments into polylines.
//!
//! A segment is split in half (De Casteljau at t = 0.5) until both inner
//! control points lie within the flatness tolerance of the chord, so gentle
//! curves produce few lines and tight bends produce many. The subdivision
//! runs on an explicit stack so the output is a lazy iterator.

use super::locator;
use super::point::ControlPoint;
use crate::settings;
use kurbo::{CubicBez, ParamCurve, Point};

/// One element of a flattened curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlatEl {
    MoveTo(Point),
    LineTo(Point),
}

/// Consumer for `PathCurve::iterate`, mirroring polyline construction
pub trait PathIterator {
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
}

/// Tolerance used for a given smoothness; larger smoothness is finer
pub fn tolerance_for(smoothness: f64) -> f64 {
    if smoothness > 0.0 {
        settings::flatten::TOLERANCE / smoothness
    } else {
        settings::flatten::TOLERANCE
    }
}

/// Yields the end points of the lines approximating one cubic segment.
///
/// The segment's start point is not yielded.
#[derive(Debug, Clone)]
pub struct SegmentFlattener {
    stack: Vec<(CubicBez, u32)>,
    tolerance: f64,
}

impl SegmentFlattener {
    pub fn new(cubic: CubicBez, tolerance: f64) -> Self {
        Self {
            stack: vec![(cubic, 0)],
            tolerance,
        }
    }
}

impl Iterator for SegmentFlattener {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while let Some((cubic, depth)) = self.stack.pop() {
            if depth >= settings::flatten::MAX_DEPTH || is_flat(&cubic, self.tolerance) {
                return Some(cubic.p3);
            }
            let (first, second) = cubic.subdivide();
            // First half on top so points come out in curve order
            self.stack.push((second, depth + 1));
            self.stack.push((first, depth + 1));
        }
        None
    }
}

/// Lazy flattening of a whole curve.
///
/// Emits one `MoveTo` for the first point, then `LineTo`s for every
/// segment, including the closing segment of a closed curve.
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    points: &'a [ControlPoint],
    closed: bool,
    tolerance: f64,
    next_segment: usize,
    started: bool,
    current: Option<SegmentFlattener>,
}

impl<'a> Flatten<'a> {
    pub(crate) fn new(points: &'a [ControlPoint], closed: bool, tolerance: f64) -> Self {
        Self {
            points,
            closed,
            tolerance,
            next_segment: 0,
            started: false,
            current: None,
        }
    }
}

impl Iterator for Flatten<'_> {
    type Item = FlatEl;

    fn next(&mut self) -> Option<FlatEl> {
        if !self.started {
            self.started = true;
            return self.points.first().map(|first| FlatEl::MoveTo(first.point));
        }
        loop {
            if let Some(point) = self.current.as_mut().and_then(Iterator::next) {
                return Some(FlatEl::LineTo(point));
            }
            let cubic = locator::segment(self.points, self.closed, self.next_segment)?;
            self.next_segment += 1;
            self.current = Some(SegmentFlattener::new(cubic, self.tolerance));
        }
    }
}

/// Both inner control points are within `tolerance` of the chord segment.
///
/// Handles that overshoot the end points fail the test even when they are
/// collinear with the chord, since the curve then leaves the chord.
fn is_flat(cubic: &CubicBez, tolerance: f64) -> bool {
    distance_to_chord(cubic.p1, cubic.p0, cubic.p3) <= tolerance
        && distance_to_chord(cubic.p2, cubic.p0, cubic.p3) <= tolerance
}

fn distance_to_chord(p: Point, a: Point, b: Point) -> f64 {
    let chord = b - a;
    let len2 = chord.hypot2();
    if len2 < f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(chord) / len2).clamp(0.0, 1.0);
    p.distance(a + chord * t)
}
