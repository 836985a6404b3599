// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shape-level selection shared between the path tool and the rest of the
//! editor.
//!
//! Every change carries an `OriginTag` naming whoever caused it. Listeners
//! compare the tag by value to ignore changes they caused themselves.

use crate::model::{OriginTag, ShapeId};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Receives object selection changes
pub trait SelectionListener: Send + Sync {
    fn object_selected(&self, _shape: ShapeId, _origin: OriginTag) {}

    fn object_deselected(&self, _shape: ShapeId, _origin: OriginTag) {}
}

/// One object selection change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(ShapeId, OriginTag),
    Deselected(ShapeId, OriginTag),
}

/// The set of selected shapes
#[derive(Debug, Default)]
pub struct ObjectSelection {
    selected: BTreeSet<ShapeId>,
    listeners: Vec<Weak<dyn SelectionListener>>,
}

impl ObjectSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap for sharing between the tool and the editor
    pub fn shared(self) -> Arc<Mutex<ObjectSelection>> {
        Arc::new(Mutex::new(self))
    }

    pub fn is_selected(&self, shape: ShapeId) -> bool {
        self.selected.contains(&shape)
    }

    pub fn selected(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.selected.iter().copied()
    }

    /// Select `shape`; listeners hear about it only if it was not selected
    pub fn select(&mut self, shape: ShapeId, origin: OriginTag) -> bool {
        if !self.selected.insert(shape) {
            return false;
        }
        self.notify(SelectionEvent::Selected(shape, origin));
        true
    }

    pub fn deselect(&mut self, shape: ShapeId, origin: OriginTag) -> bool {
        if !self.selected.remove(&shape) {
            return false;
        }
        self.notify(SelectionEvent::Deselected(shape, origin));
        true
    }

    /// Deselect everything
    pub fn clear(&mut self, origin: OriginTag) {
        for shape in std::mem::take(&mut self.selected) {
            self.notify(SelectionEvent::Deselected(shape, origin));
        }
    }

    pub fn add_listener(&mut self, listener: Weak<dyn SelectionListener>) {
        self.listeners.retain(|l| l.strong_count() > 0);
        if !self.listeners.iter().any(|l| l.ptr_eq(&listener)) {
            self.listeners.push(listener);
        }
    }

    pub fn remove_listener(&mut self, listener: &Weak<dyn SelectionListener>) {
        self.listeners.retain(|l| !l.ptr_eq(listener));
    }

    fn notify(&self, event: SelectionEvent) {
        for listener in self.listeners.iter().filter_map(Weak::upgrade) {
            match event {
                SelectionEvent::Selected(shape, origin) => listener.object_selected(shape, origin),
                SelectionEvent::Deselected(shape, origin) => {
                    listener.object_deselected(shape, origin)
                }
            }
        }
    }
}

/// Acquire a shared object selection, recovering from poison
pub fn lock_selection(selection: &Arc<Mutex<ObjectSelection>>) -> MutexGuard<'_, ObjectSelection> {
    selection.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("ObjectSelection mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// A listener that records selection changes for later draining
#[derive(Debug, Default)]
pub struct SelectionQueue {
    events: Mutex<Vec<SelectionEvent>>,
}

impl SelectionQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn drain(&self) -> Vec<SelectionEvent> {
        let mut events = self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *events)
    }

    pub fn as_listener(self: &Arc<Self>) -> Weak<dyn SelectionListener> {
        let listener: Arc<dyn SelectionListener> = self.clone();
        Arc::downgrade(&listener)
    }

    fn push(&self, event: SelectionEvent) {
        let mut events = self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(event);
    }
}

impl SelectionListener for SelectionQueue {
    fn object_selected(&self, shape: ShapeId, origin: OriginTag) {
        self.push(SelectionEvent::Selected(shape, origin));
    }

    fn object_deselected(&self, shape: ShapeId, origin: OriginTag) {
        self.push(SelectionEvent::Deselected(shape, origin));
    }
}
