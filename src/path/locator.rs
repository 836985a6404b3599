// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometric queries over a control point sequence.
//!
//! These are free functions over `&[ControlPoint]` plus the closed flag so
//! they can run on a live curve or on a snapshot alike. Segment `i` runs
//! from point `i` to point `i + 1`; on a closed curve the last segment wraps
//! back to point 0.

use super::flatten::SegmentFlattener;
use super::point::ControlPoint;
use crate::settings;
use kurbo::{CubicBez, Line, ParamCurve, ParamCurveNearest, Point};

/// Accuracy passed to kurbo's nearest-point solver for straight lines
const LINE_NEAREST_ACCURACY: f64 = 1e-9;

/// Below this extent a segment counts as a single point
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Number of cubic segments in the sequence
pub fn segment_count(points: &[ControlPoint], closed: bool) -> usize {
    match points.len() {
        0 | 1 => 0,
        n if closed => n,
        n => n - 1,
    }
}

/// Index of the point that ends segment `index`
pub fn segment_end(points: &[ControlPoint], index: usize) -> usize {
    if index + 1 >= points.len() { 0 } else { index + 1 }
}

/// The cubic for segment `index`, if it exists
pub fn segment(points: &[ControlPoint], closed: bool, index: usize) -> Option<CubicBez> {
    if index >= segment_count(points, closed) {
        return None;
    }
    let start = &points[index];
    let end = &points[segment_end(points, index)];
    Some(CubicBez::new(
        start.point,
        start.point_out,
        end.point_in,
        end.point,
    ))
}

/// Minimal distance from `query` to the flattened curve, together with the
/// index of the point that starts the closest segment.
///
/// Returns `None` when the sequence has no segment (fewer than two points).
pub fn distance(points: &[ControlPoint], closed: bool, query: Point) -> Option<(f64, usize)> {
    let mut best: Option<(f64, usize)> = None;
    for index in 0..segment_count(points, closed) {
        let Some(cubic) = segment(points, closed, index) else {
            continue;
        };
        let mut prev = cubic.p0;
        for next in SegmentFlattener::new(cubic, settings::flatten::TOLERANCE) {
            let dist_sq = Line::new(prev, next)
                .nearest(query, LINE_NEAREST_ACCURACY)
                .distance_sq;
            if best.is_none_or(|(closest, _)| dist_sq < closest) {
                best = Some((dist_sq, index));
            }
            prev = next;
        }
    }
    best.map(|(dist_sq, index)| (dist_sq.sqrt(), index))
}

/// Parametric position on segment `index` closest to `query`.
///
/// Samples the segment uniformly, then narrows the interval around the best
/// sample with a ternary search. Fails for a missing or zero-length segment.
pub fn find_bezier_scale(
    points: &[ControlPoint],
    closed: bool,
    index: usize,
    query: Point,
) -> Option<f64> {
    let cubic = segment(points, closed, index)?;
    if is_degenerate(&cubic) {
        return None;
    }

    let samples = settings::flatten::SCALE_SAMPLES.max(2);
    let dist = |t: f64| cubic.eval(t).distance_squared(query);

    let mut best_index = 0;
    let mut best_dist = f64::INFINITY;
    for i in 0..=samples {
        let d = dist(i as f64 / samples as f64);
        if d < best_dist {
            best_dist = d;
            best_index = i;
        }
    }

    let step = 1.0 / samples as f64;
    let mut lo = (best_index as f64 - 1.0).max(0.0) * step;
    let mut hi = ((best_index as f64 + 1.0) * step).min(1.0);
    for _ in 0..settings::flatten::SCALE_ITERATIONS {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        if dist(m1) < dist(m2) {
            hi = m2;
        } else {
            lo = m1;
        }
    }
    Some(((lo + hi) * 0.5).clamp(0.0, 1.0))
}

/// Evaluate segment `index` at `t` (clamped to 0..=1)
pub fn point_on_segment(points: &[ControlPoint], closed: bool, index: usize, t: f64) -> Option<Point> {
    if !t.is_finite() {
        return None;
    }
    segment(points, closed, index).map(|cubic| cubic.eval(t.clamp(0.0, 1.0)))
}

/// Result of splitting one segment at `t` without changing its shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSplit {
    /// Parametric position of the split
    pub t: f64,
    /// New out-handle of the segment's start point
    pub start_out: Point,
    /// The control point to insert between start and end
    pub inserted: ControlPoint,
    /// New in-handle of the segment's end point
    pub end_in: Point,
}

/// De Casteljau split of segment `index` at `t`
pub fn split_segment(
    points: &[ControlPoint],
    closed: bool,
    index: usize,
    t: f64,
) -> Option<SegmentSplit> {
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let CubicBez { p0, p1, p2, p3 } = segment(points, closed, index)?;

    let start_out = p0.lerp(p1, t);
    let middle = p1.lerp(p2, t);
    let end_in = p2.lerp(p3, t);
    let point_in = start_out.lerp(middle, t);
    let point_out = middle.lerp(end_in, t);
    let point = point_in.lerp(point_out, t);

    Some(SegmentSplit {
        t,
        start_out,
        inserted: ControlPoint::new(point, point_in, point_out, true),
        end_in,
    })
}

fn is_degenerate(cubic: &CubicBez) -> bool {
    let p0 = cubic.p0;
    [cubic.p1, cubic.p2, cubic.p3]
        .iter()
        .all(|p| p.distance(p0) < DEGENERATE_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn line_points() -> Vec<ControlPoint> {
        vec![
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::at(Point::new(10.0, 0.0)),
        ]
    }

    fn arch_points() -> Vec<ControlPoint> {
        vec![
            ControlPoint::new(
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(0.0, 40.0),
                false,
            ),
            ControlPoint::new(
                Point::new(60.0, 0.0),
                Point::new(60.0, 40.0),
                Point::new(60.0, 0.0),
                false,
            ),
        ]
    }

    #[test]
    fn segment_counts() {
        let pts = line_points();
        assert_eq!(segment_count(&pts, false), 1);
        assert_eq!(segment_count(&pts, true), 2);
        assert_eq!(segment_count(&pts[..1], true), 0);
        assert_eq!(segment_count(&[], false), 0);
    }

    #[test]
    fn closing_segment_wraps() {
        let pts = line_points();
        let closing = segment(&pts, true, 1).unwrap();
        assert_eq!(closing.p0, Point::new(10.0, 0.0));
        assert_eq!(closing.p3, Point::new(0.0, 0.0));
        assert!(segment(&pts, false, 1).is_none());
    }

    #[test]
    fn distance_to_straight_segment() {
        let pts = line_points();
        let (dist, index) = distance(&pts, false, Point::new(5.0, 3.0)).unwrap();
        assert!((dist - 3.0).abs() < EPSILON);
        assert_eq!(index, 0);
    }

    #[test]
    fn distance_reports_closing_segment() {
        let pts = vec![
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::at(Point::new(10.0, 0.0)),
            ControlPoint::at(Point::new(10.0, 10.0)),
        ];
        let (dist, index) = distance(&pts, true, Point::new(4.0, 5.0)).unwrap();
        assert_eq!(index, 2);
        assert!(dist < 1.0);
    }

    #[test]
    fn distance_needs_a_segment() {
        let pts = line_points();
        assert!(distance(&pts[..1], false, Point::ZERO).is_none());
        assert!(distance(&[], false, Point::ZERO).is_none());
    }

    #[test]
    fn evaluation_matches_bernstein_form() {
        let pts = arch_points();
        let t: f64 = 0.3;
        let mt = 1.0 - t;
        let expected_y = 3.0 * mt * mt * t * 40.0 + 3.0 * mt * t * t * 40.0;
        let p = point_on_segment(&pts, false, 0, t).unwrap();
        assert!((p.y - expected_y).abs() < EPSILON);
    }

    #[test]
    fn scale_round_trip() {
        let pts = arch_points();
        for &t0 in &[0.0, 0.1, 0.25, 0.5, 0.8, 1.0] {
            let p = point_on_segment(&pts, false, 0, t0).unwrap();
            let t = find_bezier_scale(&pts, false, 0, p).unwrap();
            assert!((t - t0).abs() < 1e-4, "t0={t0} t={t}");
        }
    }

    #[test]
    fn scale_fails_on_degenerate_segment() {
        let pts = vec![
            ControlPoint::at(Point::new(5.0, 5.0)),
            ControlPoint::at(Point::new(5.0, 5.0)),
        ];
        assert!(find_bezier_scale(&pts, false, 0, Point::ZERO).is_none());
        assert!(find_bezier_scale(&pts, false, 3, Point::ZERO).is_none());
    }

    #[test]
    fn split_preserves_shape() {
        let pts = arch_points();
        let split = split_segment(&pts, false, 0, 0.5).unwrap();
        let on_curve = point_on_segment(&pts, false, 0, 0.5).unwrap();
        assert!(split.inserted.point.distance(on_curve) < EPSILON);

        let first = CubicBez::new(
            pts[0].point,
            split.start_out,
            split.inserted.point_in,
            split.inserted.point,
        );
        let original = segment(&pts, false, 0).unwrap();
        // The first half at 0.5 equals the original at 0.25
        assert!(first.eval(0.5).distance(original.eval(0.25)) < EPSILON);
    }

    #[test]
    fn split_rejects_out_of_range_scale() {
        let pts = arch_points();
        assert!(split_segment(&pts, false, 0, 1.5).is_none());
        assert!(split_segment(&pts, false, 0, f64::NAN).is_none());
    }
}
