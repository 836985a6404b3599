// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Non-owning references to one point or handle of a curve.

use crate::model::{CurveId, Document};
use crate::path::{ControlPoint, HandleKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Addresses `which` part of control point `index` on `curve`.
///
/// The reference goes stale once the curve leaves the document or the index
/// falls out of range; every accessor then returns `None`.
///
/// Equality ignores `which` when either side is `AllOfPoint`, so a
/// reference to a whole point matches references to its handles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathPointRef {
    pub curve: CurveId,
    pub index: usize,
    pub which: HandleKind,
}

impl PathPointRef {
    pub fn new(curve: CurveId, index: usize, which: HandleKind) -> Self {
        Self {
            curve,
            index,
            which,
        }
    }

    /// A reference to the whole control point
    pub fn whole(curve: CurveId, index: usize) -> Self {
        Self::new(curve, index, HandleKind::AllOfPoint)
    }

    /// The same point addressed as a whole
    pub fn as_whole(self) -> Self {
        Self::whole(self.curve, self.index)
    }

    pub fn is_valid(&self, doc: &Document) -> bool {
        self.control_point(doc).is_some()
    }

    pub fn control_point(&self, doc: &Document) -> Option<ControlPoint> {
        doc.curve(self.curve)?.points_at(self.index)
    }

    /// Object-space position of the referenced point or handle
    pub fn position(&self, doc: &Document) -> Option<Point> {
        self.control_point(doc).map(|cp| cp.position(self.which))
    }
}

impl PartialEq for PathPointRef {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve
            && self.index == other.index
            && (self.which == other.which
                || self.which == HandleKind::AllOfPoint
                || other.which == HandleKind::AllOfPoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Affine;

    #[test]
    fn whole_point_matches_its_handles() {
        let curve = CurveId::next();
        let whole = PathPointRef::whole(curve, 2);
        let handle = PathPointRef::new(curve, 2, HandleKind::HandleIn);
        let other_handle = PathPointRef::new(curve, 2, HandleKind::HandleOut);

        assert_eq!(whole, handle);
        assert_eq!(handle, whole);
        assert_ne!(handle, other_handle);
        assert_ne!(whole, PathPointRef::whole(curve, 3));
    }

    #[test]
    fn stale_reference_resolves_to_none() {
        let mut doc = Document::new();
        let shape = doc.create_shape(Affine::IDENTITY).unwrap();
        let curve = doc.create_curve(shape).unwrap();
        doc.curve_mut(curve).unwrap().add_point(Point::new(1.0, 1.0));

        let live = PathPointRef::whole(curve, 0);
        assert_eq!(live.position(&doc), Some(Point::new(1.0, 1.0)));
        assert!(!PathPointRef::whole(curve, 1).is_valid(&doc));

        doc.remove_curve(curve);
        assert!(live.position(&doc).is_none());
    }
}
