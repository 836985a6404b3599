// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod edit;
pub mod input;
pub mod object_selection;
pub mod point_ref;
pub mod selection;
pub mod undo;
pub mod viewport;

pub use edit::{Change, Edit, EditSink};
pub use input::{Key, Modifiers};
pub use object_selection::{ObjectSelection, SelectionEvent, SelectionListener, SelectionQueue};
pub use point_ref::PathPointRef;
pub use selection::{PointKey, PointSelection};
pub use undo::UndoStack;
pub use viewport::ViewPort;
