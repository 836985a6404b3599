// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Point selection for the path tool.
//!
//! `PointSelection` wraps an `Arc<BTreeSet<PointKey>>` so gestures can keep
//! a cheap copy of the selection they started with (rubber-banding XORs
//! against it). Mutations go through `Arc::make_mut`, copying only when the
//! set is shared. The `BTreeSet` gives deterministic iteration order, which
//! matters for multi-point operations like nudging.

use super::point_ref::PathPointRef;
use crate::model::CurveId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A selected control point: the curve and the point index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointKey {
    pub curve: CurveId,
    pub index: usize,
}

impl From<PathPointRef> for PointKey {
    fn from(point: PathPointRef) -> Self {
        Self {
            curve: point.curve,
            index: point.index,
        }
    }
}

impl From<PointKey> for PathPointRef {
    fn from(key: PointKey) -> Self {
        PathPointRef::whole(key.curve, key.index)
    }
}

/// A set of selected control points.
///
/// Membership is per control point; which handle a reference names does not
/// matter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointSelection {
    inner: Arc<BTreeSet<PointKey>>,
}

impl PointSelection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, point: &PathPointRef) -> bool {
        self.inner.contains(&PointKey::from(*point))
    }

    /// Selected points as whole-point references, in curve/index order
    pub fn iter(&self) -> impl Iterator<Item = PathPointRef> + '_ {
        self.inner.iter().map(|&key| key.into())
    }

    pub fn insert(&mut self, point: PathPointRef) {
        if !self.contains(&point) {
            Arc::make_mut(&mut self.inner).insert(point.into());
        }
    }

    pub fn remove(&mut self, point: &PathPointRef) {
        if self.contains(point) {
            Arc::make_mut(&mut self.inner).remove(&PointKey::from(*point));
        }
    }

    /// Flip membership of `point`
    pub fn toggle(&mut self, point: PathPointRef) {
        if self.contains(&point) {
            self.remove(&point);
        } else {
            self.insert(point);
        }
    }

    /// Make `point` the only selected point
    pub fn select_only(&mut self, point: PathPointRef) {
        let mut set = BTreeSet::new();
        set.insert(point.into());
        self.inner = Arc::new(set);
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.inner = Arc::new(BTreeSet::new());
        }
    }

    /// Points in exactly one of the two selections
    pub fn symmetric_difference(&self, other: &PointSelection) -> PointSelection {
        PointSelection {
            inner: Arc::new(
                self.inner
                    .symmetric_difference(&other.inner)
                    .copied()
                    .collect(),
            ),
        }
    }

    /// Build a selection from references
    pub fn from_points(points: impl IntoIterator<Item = PathPointRef>) -> Self {
        Self {
            inner: Arc::new(points.into_iter().map(PointKey::from).collect()),
        }
    }

    // ===== RECONCILIATION WITH CURVE CHANGES =====

    /// Rewrite the indices selected on `curve` with `f`; `None` deselects
    fn remap(&mut self, curve: CurveId, f: impl Fn(usize) -> Option<usize>) {
        if !self.inner.iter().any(|key| key.curve == curve) {
            return;
        }
        let remapped = self
            .inner
            .iter()
            .filter_map(|&key| {
                if key.curve != curve {
                    return Some(key);
                }
                f(key.index).map(|index| PointKey { curve, index })
            })
            .collect();
        self.inner = Arc::new(remapped);
    }

    /// A point was inserted at `index`; later points move up
    pub fn point_added(&mut self, curve: CurveId, index: usize) {
        self.remap(curve, |i| Some(if i >= index { i + 1 } else { i }));
    }

    /// The point at `index` was removed; later points move down
    pub fn point_removed(&mut self, curve: CurveId, index: usize) {
        self.remap(curve, |i| match i.cmp(&index) {
            std::cmp::Ordering::Less => Some(i),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(i - 1),
        });
    }

    /// The curve with `count` points was reversed
    pub fn path_reversed(&mut self, curve: CurveId, count: usize) {
        self.remap(curve, |i| (i < count).then(|| count - 1 - i));
    }

    /// Drop selected indices at or beyond `count`
    pub fn truncate(&mut self, curve: CurveId, count: usize) {
        self.remap(curve, |i| (i < count).then_some(i));
    }

    /// Drop everything selected on `curve`
    pub fn remove_curve(&mut self, curve: CurveId) {
        self.remap(curve, |_| None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::HandleKind;

    fn pt(curve: CurveId, index: usize) -> PathPointRef {
        PathPointRef::whole(curve, index)
    }

    #[test]
    fn new_selection_is_empty() {
        let sel = PointSelection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
    }

    #[test]
    fn membership_ignores_handle_kind() {
        let curve = CurveId::next();
        let mut sel = PointSelection::new();
        sel.insert(PathPointRef::new(curve, 1, HandleKind::HandleOut));
        assert!(sel.contains(&pt(curve, 1)));
        assert!(sel.contains(&PathPointRef::new(curve, 1, HandleKind::Point)));
        sel.insert(pt(curve, 1));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn toggle_and_select_only() {
        let curve = CurveId::next();
        let mut sel = PointSelection::new();
        sel.select_only(pt(curve, 1));
        sel.toggle(pt(curve, 2));
        assert_eq!(sel.len(), 2);
        sel.toggle(pt(curve, 1));
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![pt(curve, 2)]);
    }

    #[test]
    fn clone_is_independent() {
        let curve = CurveId::next();
        let mut sel = PointSelection::new();
        sel.insert(pt(curve, 0));
        let mut clone = sel.clone();
        clone.insert(pt(curve, 1));
        assert!(!sel.contains(&pt(curve, 1)));
        assert!(clone.contains(&pt(curve, 1)));
    }

    #[test]
    fn xor_with_previous_selection() {
        let curve = CurveId::next();
        let previous = PointSelection::from_points([pt(curve, 0), pt(curve, 1)]);
        let in_rect = PointSelection::from_points([pt(curve, 1), pt(curve, 2)]);
        let result = previous.symmetric_difference(&in_rect);
        assert_eq!(
            result,
            PointSelection::from_points([pt(curve, 0), pt(curve, 2)])
        );
    }

    #[test]
    fn indices_follow_structural_changes() {
        let curve = CurveId::next();
        let other = CurveId::next();
        let mut sel = PointSelection::from_points([pt(curve, 0), pt(curve, 2), pt(other, 2)]);

        sel.point_added(curve, 1);
        assert_eq!(
            sel,
            PointSelection::from_points([pt(curve, 0), pt(curve, 3), pt(other, 2)])
        );

        sel.point_removed(curve, 0);
        assert_eq!(
            sel,
            PointSelection::from_points([pt(curve, 2), pt(other, 2)])
        );

        sel.path_reversed(curve, 4);
        assert!(sel.contains(&pt(curve, 1)));

        sel.truncate(curve, 1);
        assert_eq!(sel, PointSelection::from_points([pt(other, 2)]));
    }
}
