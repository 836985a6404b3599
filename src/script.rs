// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture scripts: replaying pointer and key events from a TOML file.
//!
//! A debugging aid for exercising the path tool without a UI. Example:
//!
//! ```toml
//! zoom = 2.0
//!
//! [[step]]
//! event = "down"
//! x = 10.0
//! y = 20.0
//!
//! [[step]]
//! event = "move"
//! x = 40.0
//! y = 20.0
//! modifiers = { shift = true }
//!
//! [[step]]
//! event = "up"
//! ```

use crate::editing::{Key, Modifiers, ObjectSelection, PathPointRef, UndoStack};
use crate::model::{Document, ShapeId, read_document, write_document};
use crate::path::CurveSnapshot;
use crate::tools::{CursorKind, PathTool};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

fn default_zoom() -> f64 {
    1.0
}

/// A parsed gesture script
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Zoom level passed with every pointer-down
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Overrides the drag-after-insert behaviour
    #[serde(default)]
    pub drag_insert_position: Option<bool>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One replayed event; pointer positions are in screen pixels
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Step {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Up,
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Confirm,
    Undo,
    Redo,
}

/// Document state after a replay
#[derive(Debug, Serialize)]
pub struct Report {
    pub shapes: Vec<ShapeReport>,
    /// Undo entry names, oldest first
    pub history: Vec<String>,
    pub selected_points: Vec<PathPointRef>,
    pub last_cursor: Option<CursorKind>,
}

#[derive(Debug, Serialize)]
pub struct ShapeReport {
    pub id: ShapeId,
    pub transform: Affine,
    pub curves: Vec<CurveSnapshot>,
}

impl Script {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Replay every step against a fresh document
    pub fn replay(&self) -> Report {
        let doc = Document::new().shared();
        let objects = ObjectSelection::new().shared();
        let undo = Arc::new(Mutex::new(UndoStack::new()));
        let mut tool = PathTool::new(Arc::clone(&doc), objects, Arc::clone(&undo));
        if let Some(slide) = self.drag_insert_position {
            tool.set_drag_insert_position(slide);
        }

        let mut last_cursor = None;
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!("Script step {index}: {step:?}");
            match *step {
                Step::Down { x, y, modifiers } => {
                    if let Err(err) = tool.on_pointer_down(Point::new(x, y), modifiers, self.zoom) {
                        tracing::warn!("Script step {index}: pointer-down failed: {err}");
                    }
                }
                Step::Move { x, y, modifiers } => {
                    last_cursor = Some(tool.on_pointer_move(Point::new(x, y), modifiers));
                }
                Step::Up => {
                    tool.on_pointer_up();
                }
                Step::Key { key, modifiers } => {
                    tool.on_key_down(key, modifiers);
                }
                Step::Confirm => tool.confirm(),
                Step::Undo | Step::Redo => {
                    let mut doc = write_document(&doc);
                    let mut stack = undo.lock().unwrap_or_else(PoisonError::into_inner);
                    let name = match step {
                        Step::Undo => stack.undo(&mut doc),
                        _ => stack.redo(&mut doc),
                    };
                    if name.is_none() {
                        tracing::info!("Script step {index}: nothing to {step:?}");
                    }
                    drop(stack);
                    drop(doc);
                    tool.handle_selection_changes();
                }
            }
        }

        let history = undo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history()
            .map(|edit| edit.name().to_string())
            .collect();
        let doc = read_document(&doc);
        let shapes = doc
            .shapes()
            .map(|shape| ShapeReport {
                id: shape.id(),
                transform: shape.transform,
                curves: shape
                    .paths
                    .iter()
                    .filter_map(|&id| doc.curve_snapshot(id))
                    .collect(),
            })
            .collect();
        Report {
            shapes,
            history,
            selected_points: tool.point_selection().iter().collect(),
            last_cursor,
        }
    }
}
