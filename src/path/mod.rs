// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editable cubic paths.
//!
//! A `PathCurve` is an ordered list of `ControlPoint`s, each an on-curve
//! point with an in- and an out-handle. Segment `i` runs from point `i` to
//! point `i + 1` and a closed curve adds a segment back to point 0. Curves
//! notify registered `PathListener`s after every mutation.

pub mod curve;
pub mod events;
pub mod flatten;
pub mod locator;
pub mod point;

pub use curve::{CurveSnapshot, PathCurve};
pub use events::{EventQueue, PathEvent, PathListener};
pub use flatten::{FlatEl, Flatten, PathIterator};
pub use locator::SegmentSplit;
pub use point::{ControlPoint, HandleKind};
