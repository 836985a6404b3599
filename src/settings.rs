// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor tunables and configuration constants.
//!
//! Every pixel distance here is in device pixels. Callers divide by the
//! current zoom level to get the matching object-space tolerance.

// ============================================================================
// HIT TESTING SETTINGS
// ============================================================================
/// Radius around a control point or handle that counts as a hit
const POINT_HIT_RADIUS: f64 = 10.0;

/// Radius around a curve segment that counts as a hit (for insertion)
const SEGMENT_HIT_RADIUS: f64 = 7.0;

// ============================================================================
// GESTURE SETTINGS
// ============================================================================
/// Drag distance before a select gesture turns into a rubber-band
const RUBBER_BAND_THRESHOLD: f64 = 5.0;

/// Drag distance before toggle/add/insert gestures hand off to dragging
const RECLASSIFY_THRESHOLD: f64 = 7.0;

/// Whether dragging right after an insertion moves the insertion along the
/// segment (true) or drags the freshly inserted point (false)
const DRAG_INSERT_POSITION: bool = true;

// ============================================================================
// FLATTENING SETTINGS
// ============================================================================
/// Flatness tolerance (object units) at smoothness 1.0
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Hard limit on recursive subdivision depth per segment
const FLATTEN_MAX_DEPTH: u32 = 16;

/// Uniform samples taken before refining a parametric scale search
const SCALE_SEARCH_SAMPLES: usize = 64;

/// Ternary-search iterations used to refine the best sample
const SCALE_SEARCH_ITERATIONS: usize = 48;

// ============================================================================
// NUDGE SETTINGS
// ============================================================================
/// Arrow key nudge, in device pixels
const NUDGE_DEVICE_PIXELS: f64 = 1.0;

// ============================================================================
// VIEW SETTINGS
// ============================================================================
/// Minimum zoom level (2% of original size)
const MIN_ZOOM: f64 = 0.02;

/// Maximum zoom level (50x original size)
const MAX_ZOOM: f64 = 50.0;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Hit testing radii (device pixels)
pub mod hit {
    /// Control point and handle radius
    pub const POINT_RADIUS: f64 = super::POINT_HIT_RADIUS;

    /// Segment radius
    pub const SEGMENT_RADIUS: f64 = super::SEGMENT_HIT_RADIUS;
}

/// Gesture thresholds (device pixels)
pub mod gesture {
    pub const RUBBER_BAND_THRESHOLD: f64 = super::RUBBER_BAND_THRESHOLD;
    pub const RECLASSIFY_THRESHOLD: f64 = super::RECLASSIFY_THRESHOLD;
    pub const DRAG_INSERT_POSITION: bool = super::DRAG_INSERT_POSITION;
}

/// Curve flattening and parametric search
pub mod flatten {
    /// Tolerance at smoothness 1.0; higher smoothness divides it
    pub const TOLERANCE: f64 = super::FLATTEN_TOLERANCE;

    pub const MAX_DEPTH: u32 = super::FLATTEN_MAX_DEPTH;

    pub const SCALE_SAMPLES: usize = super::SCALE_SEARCH_SAMPLES;

    pub const SCALE_ITERATIONS: usize = super::SCALE_SEARCH_ITERATIONS;
}

/// Keyboard nudging
pub mod nudge {
    /// Offset per arrow key press (device pixels)
    pub const DEVICE_PIXELS: f64 = super::NUDGE_DEVICE_PIXELS;
}

/// View settings (zoom)
pub mod view {
    /// Minimum zoom level (2% of original size)
    pub const MIN_ZOOM: f64 = super::MIN_ZOOM;

    /// Maximum zoom level (50x original size)
    pub const MAX_ZOOM: f64 = super::MAX_ZOOM;
}
