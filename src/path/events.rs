// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Change notifications emitted by `PathCurve`.
//!
//! Each notification kind has its own method on `PathListener`, with a
//! no-op default so listeners only implement what they care about. A curve
//! holds its listeners weakly and delivers synchronously, in registration
//! order, after the mutation is committed.
//!
//! `EventQueue` is a ready-made listener that records events so an owner
//! holding `&mut` state elsewhere can drain and react to them right after
//! the mutating call returns.

use crate::model::CurveId;
use std::sync::{Arc, Mutex, Weak};

/// One curve notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEvent {
    PointAdded(usize),
    PointRemoved(usize),
    PointChanged(usize),
    PathChanged,
    PathClosedChanged,
    PathReversed,
}

/// Receives curve notifications.
pub trait PathListener: Send + Sync {
    fn point_added(&self, _curve: CurveId, _index: usize) {}

    fn point_removed(&self, _curve: CurveId, _index: usize) {}

    fn point_changed(&self, _curve: CurveId, _index: usize) {}

    fn path_changed(&self, _curve: CurveId) {}

    fn path_closed_changed(&self, _curve: CurveId) {}

    fn path_reversed(&self, _curve: CurveId) {}
}

/// Route `event` to the matching listener method
pub(crate) fn deliver(listener: &dyn PathListener, curve: CurveId, event: PathEvent) {
    match event {
        PathEvent::PointAdded(index) => listener.point_added(curve, index),
        PathEvent::PointRemoved(index) => listener.point_removed(curve, index),
        PathEvent::PointChanged(index) => listener.point_changed(curve, index),
        PathEvent::PathChanged => listener.path_changed(curve),
        PathEvent::PathClosedChanged => listener.path_closed_changed(curve),
        PathEvent::PathReversed => listener.path_reversed(curve),
    }
}

/// Weak listener registrations, in registration order
#[derive(Debug, Clone, Default)]
pub(crate) struct ListenerList {
    listeners: Vec<Weak<dyn PathListener>>,
}

impl ListenerList {
    /// Register `listener`; returns false if it was already registered
    pub(crate) fn add(&mut self, listener: Weak<dyn PathListener>) -> bool {
        self.prune();
        if self.listeners.iter().any(|l| l.ptr_eq(&listener)) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    pub(crate) fn remove(&mut self, listener: &Weak<dyn PathListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !l.ptr_eq(listener));
        self.prune();
        self.listeners.len() != before
    }

    /// Number of registered listeners that are still alive
    pub(crate) fn len(&self) -> usize {
        self.listeners.iter().filter(|l| l.strong_count() > 0).count()
    }

    pub(crate) fn notify(&self, curve: CurveId, event: PathEvent) {
        for listener in self.listeners.iter().filter_map(Weak::upgrade) {
            deliver(listener.as_ref(), curve, event);
        }
    }

    fn prune(&mut self) {
        self.listeners.retain(|l| l.strong_count() > 0);
    }
}

/// A listener that records every notification for later draining.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<Vec<(CurveId, PathEvent)>>,
}

impl EventQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take all recorded events, oldest first
    pub fn drain(&self) -> Vec<(CurveId, PathEvent)> {
        let mut events = self.events.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("EventQueue mutex was poisoned, recovering");
            poisoned.into_inner()
        });
        std::mem::take(&mut *events)
    }

    /// Downgrade for registration on a curve
    pub fn as_listener(self: &Arc<Self>) -> Weak<dyn PathListener> {
        let listener: Arc<dyn PathListener> = self.clone();
        Arc::downgrade(&listener)
    }

    fn push(&self, curve: CurveId, event: PathEvent) {
        let mut events = self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push((curve, event));
    }
}

impl PathListener for EventQueue {
    fn point_added(&self, curve: CurveId, index: usize) {
        self.push(curve, PathEvent::PointAdded(index));
    }

    fn point_removed(&self, curve: CurveId, index: usize) {
        self.push(curve, PathEvent::PointRemoved(index));
    }

    fn point_changed(&self, curve: CurveId, index: usize) {
        self.push(curve, PathEvent::PointChanged(index));
    }

    fn path_changed(&self, curve: CurveId) {
        self.push(curve, PathEvent::PathChanged);
    }

    fn path_closed_changed(&self, curve: CurveId) {
        self.push(curve, PathEvent::PathClosedChanged);
    }

    fn path_reversed(&self, curve: CurveId) {
        self.push(curve, PathEvent::PathReversed);
    }
}
