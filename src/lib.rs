// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pathtool: the bezier path model and path editing state machine of a
//! vector illustration editor.
//!
//! - [`path`]: control points, `PathCurve` and its geometric queries
//! - [`model`]: the document arena of shapes and curves
//! - [`editing`]: point/object selection, undoable edits, view and input
//! - [`tools`]: the gesture variants and the `PathTool` dispatcher
//!
//! The library logs through `tracing` but never installs a subscriber.

pub mod editing;
pub mod error;
pub mod model;
pub mod path;
pub mod script;
pub mod settings;
pub mod tools;

pub use editing::{Edit, EditSink, Key, Modifiers, ObjectSelection, PathPointRef, UndoStack, ViewPort};
pub use error::EditError;
pub use model::{CurveId, Document, ShapeId};
pub use path::{ControlPoint, HandleKind, PathCurve};
pub use tools::{CursorKind, GestureKind, PathTool};
