// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Stable identifiers for curves, shapes, and selection origins.
//!
//! All ids are drawn from one global atomic counter, so a curve id can never
//! collide with a shape id and ids are never reused within a process. The
//! document arena is keyed by these ids; tools and selections only ever hold
//! ids and resolve them on use.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_raw() -> u64 {
    ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Identifies one `PathCurve` in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurveId(u64);

/// Identifies one shape (the drawable that owns curves)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(u64);

/// Causality token passed along with selection changes.
///
/// A receiver compares the token by value to recognise changes it caused
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OriginTag(u64);

impl CurveId {
    /// Create a new unique curve id
    pub fn next() -> Self {
        Self(next_raw())
    }
}

impl ShapeId {
    /// Create a new unique shape id
    pub fn next() -> Self {
        Self(next_raw())
    }
}

impl OriginTag {
    /// Create a new unique origin tag
    pub fn next() -> Self {
        Self(next_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = CurveId::next();
        let b = CurveId::next();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn tags_compare_by_value() {
        let tag = OriginTag::next();
        let copy = tag;
        assert_eq!(tag, copy);
        assert_ne!(tag, OriginTag::next());
    }
}
