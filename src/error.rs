// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Error type for operations that build new curves, shapes, or edits.
//!
//! Out-of-range indices are not errors: the curve API treats them as silent
//! no-ops and reports them through `bool`/`Option` results instead.

use crate::model::{CurveId, ShapeId};

/// Failure of a construction or commit step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Memory for a new point, curve, or shape could not be reserved.
    /// Nothing was modified.
    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    /// The curve id does not resolve in the document arena.
    #[error("curve {0:?} is not part of the document")]
    UnknownCurve(CurveId),

    /// The shape id does not resolve in the document arena.
    #[error("shape {0:?} is not part of the document")]
    UnknownShape(ShapeId),

    /// A new path needs a shape to live in, and none is being edited.
    #[error("no shape is being edited")]
    NoShape,

    /// The undo system refused the edit.
    #[error("edit '{name}' was rejected: {reason}")]
    Rejected { name: String, reason: String },
}
