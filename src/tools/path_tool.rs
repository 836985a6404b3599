// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The path tool: pointer and key events in, curve edits out.
//!
//! On pointer-down the tool classifies the event into one gesture (see
//! `classify`) using zoom-scaled hit testing and the held modifiers. The
//! gesture then drives the edit until pointer-up, where the tool turns
//! everything the gesture changed into a single `Edit` and hands it to the
//! `EditSink` exactly once.
//!
//! The document write lock is held for one `set_origin` / `drag_to` call
//! at a time, never across a whole gesture.

use super::add_point::AddPoint;
use super::close_path::ClosePath;
use super::create_path::{CreatePath, CreateShape};
use super::drag_point::DragPoint;
use super::drag_selection::{DragSelection, move_selection};
use super::insert_point::InsertPoint;
use super::pick_shape::PickShape;
use super::remove_point::RemovePoint;
use super::select_points::SelectPoints;
use super::toggle_smooth::ToggleSmoothSharp;
use super::{CursorKind, DragMode, EditTarget, GestureCtx, GestureKind, Transition};
use crate::editing::edit::Transaction;
use crate::editing::object_selection::lock_selection;
use crate::editing::{
    Edit, EditSink, Key, Modifiers, ObjectSelection, PathPointRef, PointSelection,
    SelectionEvent, SelectionQueue, ViewPort,
};
use crate::error::EditError;
use crate::model::{CurveId, Document, OriginTag, ShapeId, read_document, write_document};
use crate::path::{EventQueue, HandleKind, PathCurve};
use crate::settings;
use kurbo::{Affine, Point, Rect};
use std::sync::{Arc, Mutex, RwLock};

/// Label of the undo entry produced by arrow-key nudging
const NUDGE_COMMAND_NAME: &str = "Move path points";

/// The gesture between pointer-down and pointer-up
struct ActiveGesture {
    kind: GestureKind,
    /// Undo label, fixed by the gesture chosen on pointer-down
    name: &'static str,
    tx: Transaction,
}

/// Tool state handed to gestures through `GestureCtx`
struct Session {
    target: EditTarget,
    points: PointSelection,
    selection_rect: Option<Rect>,
    objects: Arc<Mutex<ObjectSelection>>,
    origin: OriginTag,
    events: Arc<EventQueue>,
    view: ViewPort,
    modifiers: Modifiers,
    drag_insert_position: bool,
}

impl Session {
    fn ctx<'a>(&'a mut self, doc: &'a mut Document, tx: &'a mut Transaction) -> GestureCtx<'a> {
        GestureCtx {
            doc,
            tx,
            target: &mut self.target,
            points: &mut self.points,
            selection_rect: &mut self.selection_rect,
            objects: &self.objects,
            origin: self.origin,
            events: &self.events,
            view: self.view,
            modifiers: self.modifiers,
            drag_insert_position: self.drag_insert_position,
        }
    }

    /// Switch shapes outside of any gesture
    fn set_shape(&mut self, doc: &mut Document, shape: Option<ShapeId>, modify_selection: bool) {
        let mut tx = Transaction::new();
        self.ctx(doc, &mut tx).set_shape(shape, modify_selection);
    }

    fn object_transform(&self, doc: &Document) -> Affine {
        self.target
            .shape
            .and_then(|id| doc.shape(id))
            .map_or(Affine::IDENTITY, |shape| shape.transform)
    }

    /// Bring the edit target back in line with the document.
    ///
    /// Undo and redo may have removed the edited shape, added or removed
    /// curves, or re-created curves without their listeners.
    fn refresh(&mut self, doc: &mut Document) {
        let Some(shape) = self.target.shape else {
            return;
        };
        let Some(paths) = doc.shape(shape).map(|s| s.paths.clone()) else {
            tracing::debug!("PathTool: edited shape {shape:?} is gone");
            self.target = EditTarget::default();
            self.points.clear();
            self.selection_rect = None;
            return;
        };
        for &id in &self.target.paths {
            if !paths.contains(&id) {
                self.points.remove_curve(id);
            }
        }
        let listener = self.events.as_listener();
        for &id in &paths {
            if let Some(curve) = doc.curve_mut(id) {
                curve.add_listener(listener.clone());
                self.points.truncate(id, curve.count_points());
            }
        }
        if !self.target.current.is_some_and(|id| paths.contains(&id)) {
            self.target.current = paths.first().copied();
        }
        self.target.paths = paths;
    }
}

/// Interactive editor for the curves of one shape.
///
/// `S` receives the edit of every completed gesture.
pub struct PathTool<S: EditSink> {
    doc: Arc<RwLock<Document>>,
    sink: S,
    selection_events: Arc<SelectionQueue>,
    session: Session,
    gesture: Option<ActiveGesture>,
    /// Point under the pointer while no gesture runs
    hover: Option<PathPointRef>,
}

impl<S: EditSink> PathTool<S> {
    /// Create a tool over `doc`.
    ///
    /// If a shape is already selected in `objects`, editing starts on it.
    pub fn new(doc: Arc<RwLock<Document>>, objects: Arc<Mutex<ObjectSelection>>, sink: S) -> Self {
        let selection_events = SelectionQueue::new();
        let adopted = {
            let mut selection = lock_selection(&objects);
            selection.add_listener(selection_events.as_listener());
            selection.selected().next()
        };
        let mut tool = Self {
            doc,
            sink,
            selection_events,
            session: Session {
                target: EditTarget::default(),
                points: PointSelection::new(),
                selection_rect: None,
                objects,
                origin: OriginTag::next(),
                events: EventQueue::new(),
                view: ViewPort::default(),
                modifiers: Modifiers::NONE,
                drag_insert_position: settings::gesture::DRAG_INSERT_POSITION,
            },
            gesture: None,
            hover: None,
        };
        if let Some(shape) = adopted {
            let mut doc = write_document(&tool.doc);
            tool.session.set_shape(&mut doc, Some(shape), false);
        }
        tool
    }

    // ===== ACCESSORS =====

    pub fn origin_tag(&self) -> OriginTag {
        self.session.origin
    }

    pub fn view(&self) -> ViewPort {
        self.session.view
    }

    pub fn set_view(&mut self, view: ViewPort) {
        self.session.view = view;
    }

    /// Choose what dragging right after an insertion does: slide the new
    /// point along the segment (`true`) or drag it freely (`false`)
    pub fn set_drag_insert_position(&mut self, slide: bool) {
        self.session.drag_insert_position = slide;
    }

    pub fn edited_shape(&self) -> Option<ShapeId> {
        self.session.target.shape
    }

    pub fn edited_paths(&self) -> &[CurveId] {
        &self.session.target.paths
    }

    /// The curve new points are appended to
    pub fn current_path(&self) -> Option<CurveId> {
        self.session.target.current
    }

    pub fn point_selection(&self) -> &PointSelection {
        &self.session.points
    }

    /// Rubber-band rectangle in canvas space, while one is being dragged
    pub fn selection_rect(&self) -> Option<Rect> {
        self.session.selection_rect
    }

    pub fn hover(&self) -> Option<PathPointRef> {
        self.hover
    }

    /// The running gesture, between pointer-down and pointer-up
    pub fn active_gesture(&self) -> Option<&GestureKind> {
        self.gesture.as_ref().map(|active| &active.kind)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ===== EDITED SHAPE =====

    /// Start editing `shape`, or stop editing with `None`.
    ///
    /// The object selection follows.
    pub fn set_shape(&mut self, shape: Option<ShapeId>) {
        let mut doc = write_document(&self.doc);
        self.session.set_shape(&mut doc, shape, true);
    }

    /// Finish editing the current shape
    pub fn confirm(&mut self) {
        tracing::debug!("PathTool: confirm");
        self.set_shape(None);
    }

    /// Stop editing the current shape
    pub fn cancel(&mut self) {
        tracing::debug!("PathTool: cancel");
        self.set_shape(None);
    }

    /// Apply object selection changes made by others since the last call
    pub fn handle_selection_changes(&mut self) {
        let doc_lock = Arc::clone(&self.doc);
        let mut doc = write_document(&doc_lock);
        self.process_selection_events(&mut doc);
    }

    fn process_selection_events(&mut self, doc: &mut Document) {
        for event in self.selection_events.drain() {
            match event {
                SelectionEvent::Selected(_, origin) | SelectionEvent::Deselected(_, origin)
                    if origin == self.session.origin => {}
                SelectionEvent::Selected(shape, _) => {
                    self.session.set_shape(doc, Some(shape), false);
                }
                SelectionEvent::Deselected(shape, _) => {
                    if self.session.target.shape == Some(shape) {
                        self.session.set_shape(doc, None, false);
                    }
                }
            }
        }
        self.session.refresh(doc);
    }

    // ===== CLASSIFICATION =====

    /// The gesture a pointer-down at `device` with `modifiers` would start
    pub fn classify(&self, device: Point, modifiers: Modifiers) -> GestureKind {
        let doc = read_document(&self.doc);
        let canvas = self.session.view.screen_to_canvas(device);
        self.classify_in(&doc, canvas, modifiers).0
    }

    /// Pick the gesture for `canvas`, along with the point under it
    fn classify_in(
        &self,
        doc: &Document,
        canvas: Point,
        modifiers: Modifiers,
    ) -> (GestureKind, Option<PathPointRef>) {
        let session = &self.session;
        let target = &session.target;
        let zoom = session.view.zoom;
        let object = session.object_transform(doc).inverse() * canvas;
        let curves = || edited_curves(target, doc);

        if let Some(hit) = hit_point(curves(), object, settings::hit::POINT_RADIUS / zoom) {
            let whole = hit.as_whole();
            let kind = if is_close_target(doc.curve(hit.curve), hit, &session.points, modifiers)
            {
                GestureKind::ClosePath(ClosePath::new(hit.curve))
            } else if modifiers.ctrl {
                GestureKind::RemovePoint(RemovePoint::new(hit))
            } else if modifiers.command || modifiers.alt {
                GestureKind::ToggleSmoothSharp(ToggleSmoothSharp::new(hit))
            } else if modifiers.shift {
                return (
                    GestureKind::SelectPoints(SelectPoints::new(Some(whole))),
                    Some(whole),
                );
            } else if hit.which == HandleKind::Point
                && session.points.contains(&whole)
                && session.points.len() > 1
            {
                GestureKind::DragSelection(DragSelection::new())
            } else {
                GestureKind::DragPoint(DragPoint::new(hit, DragMode::for_handle(hit.which)))
            };
            return (kind, Some(hit));
        }

        if modifiers.shift && curves().any(|(_, curve)| !curve.is_empty()) {
            return (GestureKind::SelectPoints(SelectPoints::new(None)), None);
        }

        let segment_radius = settings::hit::SEGMENT_RADIUS / zoom;
        let segment_hit = curves()
            .filter_map(|(id, curve)| curve.distance(object).map(|(d, segment)| (d, id, segment)))
            .filter(|&(d, _, _)| d < segment_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((_, curve, segment)) = segment_hit {
            return (GestureKind::InsertPoint(InsertPoint::new(curve, segment)), None);
        }

        if modifiers.command {
            let picked = doc.shape_at(canvas);
            return (GestureKind::PickShape(PickShape::new(picked)), None);
        }

        if let Some(current) = target.current.and_then(|id| doc.curve(id)) {
            let kind = if !current.is_closed() {
                GestureKind::AddPoint(AddPoint::new(current.id()))
            } else if target.shape.is_some() && modifiers.alt {
                GestureKind::CreatePath(CreatePath::new())
            } else {
                GestureKind::SelectPoints(SelectPoints::new(None))
            };
            return (kind, None);
        }

        (GestureKind::CreateShape(CreateShape::new()), None)
    }

    // ===== POINTER EVENTS =====

    /// Start a gesture at `device` (screen pixels).
    ///
    /// On failure nothing the gesture did is kept and no gesture runs.
    pub fn on_pointer_down(
        &mut self,
        device: Point,
        modifiers: Modifiers,
        zoom: f64,
    ) -> Result<(), EditError> {
        if self.gesture.is_some() {
            tracing::warn!("PathTool: pointer-down during a gesture, finishing it first");
            self.on_pointer_up();
        }
        self.session.view.set_zoom(zoom);
        self.session.modifiers = modifiers;
        let canvas = self.session.view.screen_to_canvas(device);

        let doc_lock = Arc::clone(&self.doc);
        let mut doc = write_document(&doc_lock);
        self.process_selection_events(&mut doc);
        self.session.events.drain();

        let (mut kind, hover) = self.classify_in(&doc, canvas, modifiers);
        self.hover = hover;
        let name = kind.command_name();
        tracing::debug!("PathTool: {name} at {canvas:?}");

        let mut tx = Transaction::new();
        let result = {
            let mut ctx = self.session.ctx(&mut doc, &mut tx);
            let result = kind.set_origin(canvas, &mut ctx);
            ctx.sync();
            result
        };
        match result {
            Ok(transition) => {
                if let Transition::Become(next) = transition {
                    tracing::debug!("PathTool: '{name}' continues as '{}'", next.command_name());
                    kind = next;
                }
                self.gesture = Some(ActiveGesture { kind, name, tx });
                Ok(())
            }
            Err(err) => {
                tracing::warn!("PathTool: '{name}' failed: {err}");
                if let Some(edit) = tx.finish(&doc, name) {
                    edit.undo(&mut doc);
                }
                self.session.events.drain();
                self.session.refresh(&mut doc);
                Err(err)
            }
        }
    }

    /// Track the pointer; returns the cursor to show.
    ///
    /// During a gesture this drags; otherwise it updates the hover state.
    pub fn on_pointer_move(&mut self, device: Point, modifiers: Modifiers) -> CursorKind {
        self.session.modifiers = modifiers;
        let canvas = self.session.view.screen_to_canvas(device);

        let Some(active) = self.gesture.as_mut() else {
            let doc = read_document(&self.doc);
            let (kind, hover) = self.classify_in(&doc, canvas, modifiers);
            drop(doc);
            self.hover = hover;
            return kind.cursor(canvas);
        };

        let mut doc = write_document(&self.doc);
        let mut ctx = self.session.ctx(&mut doc, &mut active.tx);
        let transition = active.kind.drag_to(canvas, modifiers, &mut ctx);
        ctx.sync();
        if let Transition::Become(next) = transition {
            tracing::debug!(
                "PathTool: '{}' continues as '{}'",
                active.kind.command_name(),
                next.command_name()
            );
            active.kind = next;
        }
        active.kind.cursor(canvas)
    }

    /// End the gesture and commit its edit.
    ///
    /// Returns the edit if the gesture changed anything and the sink
    /// accepted it.
    pub fn on_pointer_up(&mut self) -> Option<Edit> {
        self.session.selection_rect = None;
        let active = self.gesture.take()?;

        let doc_lock = Arc::clone(&self.doc);
        let mut doc = write_document(&doc_lock);
        if let GestureKind::SelectPoints(select) = &active.kind {
            if select.deselect_on_pointer_up(self.session.view.zoom) {
                self.session.points.clear();
            }
        }
        let edit = active.tx.finish(&doc, active.name)?;
        self.commit(&mut doc, edit)
    }

    // ===== KEYBOARD =====

    /// Nudge the selected points with the arrow keys.
    ///
    /// Returns whether the key was consumed, which is whenever a shape is
    /// being edited and the key is an arrow.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.session.modifiers = modifiers;
        let Some(direction) = key.nudge_direction() else {
            return false;
        };
        if self.gesture.is_some() {
            return false;
        }

        let doc_lock = Arc::clone(&self.doc);
        let mut doc = write_document(&doc_lock);
        self.process_selection_events(&mut doc);
        if self.session.target.shape.is_none() {
            return false;
        }

        let offset = direction * settings::nudge::DEVICE_PIXELS / self.session.view.zoom;
        let inverse = self.session.object_transform(&doc).inverse();
        let delta = inverse * offset.to_point() - inverse * Point::ZERO;

        let mut tx = Transaction::new();
        {
            let mut ctx = self.session.ctx(&mut doc, &mut tx);
            move_selection(&mut ctx, delta);
            ctx.sync();
        }
        if let Some(edit) = tx.finish(&doc, NUDGE_COMMAND_NAME) {
            self.commit(&mut doc, edit);
        }
        true
    }

    /// Hand `edit` to the sink; a rejected edit is rolled back
    fn commit(&mut self, doc: &mut Document, edit: Edit) -> Option<Edit> {
        match self.sink.perform(edit.clone()) {
            Ok(()) => {
                tracing::info!("PathTool: committed '{}'", edit.name());
                Some(edit)
            }
            Err(err) => {
                tracing::warn!("PathTool: '{}' rejected, rolling back: {err}", edit.name());
                edit.undo(doc);
                self.session.events.drain();
                self.session.refresh(doc);
                None
            }
        }
    }
}

/// The edited curves that still exist, topmost first
fn edited_curves<'a>(
    target: &'a EditTarget,
    doc: &'a Document,
) -> impl Iterator<Item = (CurveId, &'a PathCurve)> + 'a {
    target
        .paths
        .iter()
        .rev()
        .filter_map(move |&id| doc.curve(id).map(|curve| (id, curve)))
}

/// Closest point or handle within `radius` of `object`.
///
/// Curves come topmost first. A handle sitting on its point is never hit on
/// its own; when the in- and out-handle are equally close the out-handle
/// wins.
fn hit_point<'a>(
    curves: impl Iterator<Item = (CurveId, &'a PathCurve)>,
    object: Point,
    radius: f64,
) -> Option<PathPointRef> {
    let mut closest = f64::MAX;
    let mut hit = None;
    for (id, curve) in curves {
        for (index, cp) in curve.points().iter().enumerate().rev() {
            let d = cp.point.distance(object);
            let d_in = cp.point_in.distance(object);
            let d_out = cp.point_out.distance(object);

            if d < radius && d < closest {
                hit = Some(PathPointRef::new(id, index, HandleKind::Point));
                closest = d;
            }
            if cp.point_in != cp.point
                && d_in < radius
                && d_in < closest
                && d_in < d
                && d_in < d_out
            {
                hit = Some(PathPointRef::new(id, index, HandleKind::HandleIn));
                closest = d_in;
            } else if cp.point_out != cp.point
                && d_out < radius
                && d_out < closest
                && d_out < d
            {
                hit = Some(PathPointRef::new(id, index, HandleKind::HandleOut));
                closest = d_out;
            }
        }
    }
    hit
}

/// Clicking the first point of an open curve closes it
fn is_close_target(
    curve: Option<&PathCurve>,
    hit: PathPointRef,
    selection: &PointSelection,
    modifiers: Modifiers,
) -> bool {
    curve.is_some_and(|curve| {
        hit.which == HandleKind::Point
            && hit.index == 0
            && !curve.is_closed()
            && curve.count_points() > 1
            && !selection.contains(&hit)
            && !modifiers.shift
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeSnapshot;
    use crate::tools::Gesture;
    use crate::path::{ControlPoint, PathEvent};
    use kurbo::Vec2;

    /// Records every edit it is handed
    #[derive(Default)]
    struct RecordingSink {
        edits: Vec<Edit>,
    }

    impl EditSink for RecordingSink {
        fn perform(&mut self, edit: Edit) -> Result<(), EditError> {
            self.edits.push(edit);
            Ok(())
        }
    }

    /// Refuses every edit
    struct RejectingSink;

    impl EditSink for RejectingSink {
        fn perform(&mut self, edit: Edit) -> Result<(), EditError> {
            Err(EditError::Rejected {
                name: edit.name().to_string(),
                reason: "read-only".to_string(),
            })
        }
    }

    struct Fixture<S: EditSink> {
        doc: Arc<RwLock<Document>>,
        objects: Arc<Mutex<ObjectSelection>>,
        tool: PathTool<S>,
        shape: ShapeId,
        curve: CurveId,
    }

    /// One shape at the canvas origin holding one curve through `points`
    fn fixture_with<S: EditSink>(sink: S, points: &[ControlPoint], closed: bool) -> Fixture<S> {
        let doc = Document::new().shared();
        let (shape, curve) = {
            let mut doc = write_document(&doc);
            let shape = doc.create_shape(Affine::IDENTITY).unwrap();
            let curve = doc.create_curve(shape).unwrap();
            let path = doc.curve_mut(curve).unwrap();
            for &cp in points {
                assert!(path.add_control_point(cp.point, cp.point_in, cp.point_out, cp.connected));
            }
            path.set_closed(closed);
            (shape, curve)
        };
        let objects = ObjectSelection::new().shared();
        let mut tool = PathTool::new(Arc::clone(&doc), Arc::clone(&objects), sink);
        tool.set_shape(Some(shape));
        Fixture {
            doc,
            objects,
            tool,
            shape,
            curve,
        }
    }

    fn fixture(points: &[Point]) -> Fixture<RecordingSink> {
        let points: Vec<ControlPoint> = points.iter().map(|&p| ControlPoint::at(p)).collect();
        fixture_with(RecordingSink::default(), &points, false)
    }

    fn point(fx: &Fixture<impl EditSink>, index: usize) -> Option<Point> {
        read_document(&fx.doc).curve(fx.curve)?.point_at(index)
    }

    fn control(fx: &Fixture<impl EditSink>, index: usize) -> ControlPoint {
        read_document(&fx.doc)
            .curve(fx.curve)
            .and_then(|c| c.points_at(index))
            .unwrap()
    }

    fn click(tool: &mut PathTool<impl EditSink>, at: Point, modifiers: Modifiers) -> Option<Edit> {
        tool.on_pointer_down(at, modifiers, 1.0).unwrap();
        tool.on_pointer_up()
    }

    fn selected(fx: &Fixture<impl EditSink>) -> Vec<usize> {
        fx.tool.point_selection().iter().map(|p| p.index).collect()
    }

    fn approx(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn basic_drag_commits_one_edit() {
        let mut fx = fixture(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);

        match fx.tool.classify(Point::new(10.0, 0.0), Modifiers::NONE) {
            GestureKind::DragPoint(drag) => {
                assert_eq!(drag.target(), PathPointRef::new(fx.curve, 1, HandleKind::Point));
                assert_eq!(drag.mode(), DragMode::MovePoint);
            }
            other => panic!("expected DragPoint, got {other:?}"),
        }

        fx.tool
            .on_pointer_down(Point::new(10.0, 0.0), Modifiers::NONE, 1.0)
            .unwrap();
        fx.tool.on_pointer_move(Point::new(15.0, 2.0), Modifiers::NONE);
        let cursor = fx.tool.on_pointer_move(Point::new(20.0, 5.0), Modifiers::NONE);
        assert_eq!(cursor, CursorKind::PathMove);
        assert!(fx.tool.sink().edits.is_empty());

        let edit = fx.tool.on_pointer_up().unwrap();
        assert_eq!(edit.name(), "Drag path point");
        assert_eq!(fx.tool.sink().edits.len(), 1);
        assert_eq!(point(&fx, 1), Some(Point::new(20.0, 5.0)));
        assert_eq!(point(&fx, 0), Some(Point::new(0.0, 0.0)));
        assert_eq!(
            edit.curve_after(fx.curve).unwrap().points[1].point,
            Point::new(20.0, 5.0)
        );

        edit.undo(&mut write_document(&fx.doc));
        assert_eq!(point(&fx, 1), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn click_on_first_point_closes_path() {
        let mut fx = fixture(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        let queue = EventQueue::new();
        write_document(&fx.doc)
            .curve_mut(fx.curve)
            .unwrap()
            .add_listener(queue.as_listener());

        assert!(matches!(
            fx.tool.classify(Point::new(1.0, 1.0), Modifiers::NONE),
            GestureKind::ClosePath(_)
        ));
        let edit = click(&mut fx.tool, Point::new(1.0, 1.0), Modifiers::NONE).unwrap();
        assert_eq!(edit.name(), "Close path");
        assert!(read_document(&fx.doc).curve(fx.curve).unwrap().is_closed());

        let events = queue.drain();
        let closed = events
            .iter()
            .filter(|(_, e)| *e == PathEvent::PathClosedChanged)
            .count();
        assert_eq!(closed, 1);
    }

    #[test]
    fn insertion_preserves_shape() {
        let points = [
            ControlPoint::new(Point::ZERO, Point::ZERO, Point::new(0.0, 50.0), false),
            ControlPoint::new(
                Point::new(100.0, 0.0),
                Point::new(100.0, 50.0),
                Point::new(100.0, 0.0),
                false,
            ),
        ];
        let mut fx = fixture_with(RecordingSink::default(), &points, false);
        let (middle, quarter) = {
            let doc = read_document(&fx.doc);
            let curve = doc.curve(fx.curve).unwrap();
            (
                curve.point_on_segment(0, 0.5).unwrap(),
                curve.point_on_segment(0, 0.25).unwrap(),
            )
        };

        match fx.tool.classify(middle, Modifiers::NONE) {
            GestureKind::InsertPoint(insert) => assert_eq!(insert.segment(), 0),
            other => panic!("expected InsertPoint, got {other:?}"),
        }
        let edit = click(&mut fx.tool, middle, Modifiers::NONE).unwrap();
        assert_eq!(edit.name(), "Insert path point");

        let doc = read_document(&fx.doc);
        let curve = doc.curve(fx.curve).unwrap();
        assert_eq!(curve.count_points(), 3);
        assert!(approx(curve.point_at(1).unwrap(), middle));
        assert!(approx(curve.point_on_segment(0, 0.5).unwrap(), quarter));
        drop(doc);
        assert_eq!(selected(&fx), vec![1]);
    }

    #[test]
    fn drag_after_insert_slides_along_segment() {
        let mut fx = fixture(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        fx.tool
            .on_pointer_down(Point::new(50.0, 1.0), Modifiers::NONE, 1.0)
            .unwrap();
        fx.tool.on_pointer_move(Point::new(70.0, 3.0), Modifiers::NONE);
        fx.tool.on_pointer_up().unwrap();

        assert_eq!(read_document(&fx.doc).curve(fx.curve).unwrap().count_points(), 3);
        let inserted = point(&fx, 1).unwrap();
        assert!((inserted.x - 70.0).abs() < 0.5);
        assert!(inserted.y.abs() < 1e-6);
        assert_eq!(point(&fx, 2), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn drag_after_insert_moves_point_when_sliding_is_off() {
        let mut fx = fixture(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        fx.tool.set_drag_insert_position(false);
        fx.tool
            .on_pointer_down(Point::new(50.0, 0.0), Modifiers::NONE, 1.0)
            .unwrap();
        fx.tool.on_pointer_move(Point::new(50.0, 30.0), Modifiers::NONE);
        assert!(matches!(fx.tool.active_gesture(), Some(GestureKind::DragPoint(_))));
        let edit = fx.tool.on_pointer_up().unwrap();
        assert_eq!(edit.name(), "Insert path point");
        assert!(approx(point(&fx, 1).unwrap(), Point::new(50.0, 30.0)));
    }

    #[test]
    fn selection_toggle() {
        let mut fx = fixture(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
        ]);
        assert!(click(&mut fx.tool, Point::new(50.0, 0.0), Modifiers::NONE).is_none());
        assert_eq!(selected(&fx), vec![1]);

        assert!(click(&mut fx.tool, Point::new(100.0, 0.0), Modifiers::SHIFT).is_none());
        assert_eq!(selected(&fx), vec![1, 2]);

        assert!(click(&mut fx.tool, Point::new(50.0, 0.0), Modifiers::SHIFT).is_none());
        assert_eq!(selected(&fx), vec![2]);
        assert!(fx.tool.sink().edits.is_empty());
    }

    #[test]
    fn hit_radius_boundary() {
        let mut fx = fixture(&[Point::new(0.0, 0.0)]);
        let zoom = 2.0;
        fx.tool.set_view(ViewPort::new(Vec2::ZERO, zoom));
        let radius = settings::hit::POINT_RADIUS / zoom;
        let eps = 0.01;

        let inside = fx.tool.view().canvas_to_screen(Point::new(radius - eps, 0.0));
        assert!(matches!(
            fx.tool.classify(inside, Modifiers::NONE),
            GestureKind::DragPoint(_)
        ));

        let outside = fx.tool.view().canvas_to_screen(Point::new(radius + eps, 0.0));
        assert!(matches!(
            fx.tool.classify(outside, Modifiers::NONE),
            GestureKind::AddPoint(_)
        ));
    }

    #[test]
    fn rubber_band_xors_with_previous_selection() {
        let mut fx = fixture(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
        ]);
        click(&mut fx.tool, Point::new(50.0, 0.0), Modifiers::NONE);

        fx.tool
            .on_pointer_down(Point::new(40.0, -20.0), Modifiers::SHIFT, 1.0)
            .unwrap();
        fx.tool.on_pointer_move(Point::new(42.0, -19.0), Modifiers::SHIFT);
        assert_eq!(fx.tool.selection_rect(), None);

        fx.tool.on_pointer_move(Point::new(120.0, 20.0), Modifiers::SHIFT);
        assert_eq!(
            fx.tool.selection_rect(),
            Some(Rect::new(40.0, -20.0, 120.0, 20.0))
        );
        assert_eq!(selected(&fx), vec![2]);

        assert!(fx.tool.on_pointer_up().is_none());
        assert_eq!(fx.tool.selection_rect(), None);
        assert_eq!(selected(&fx), vec![2]);
    }

    #[test]
    fn click_on_empty_canvas_of_closed_path_deselects() {
        let points = [
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::at(Point::new(100.0, 0.0)),
            ControlPoint::at(Point::new(100.0, 100.0)),
        ];
        let mut fx = fixture_with(RecordingSink::default(), &points, true);
        click(&mut fx.tool, Point::new(100.0, 0.0), Modifiers::NONE);
        assert_eq!(selected(&fx), vec![1]);

        assert!(matches!(
            fx.tool.classify(Point::new(300.0, 300.0), Modifiers::NONE),
            GestureKind::SelectPoints(_)
        ));
        click(&mut fx.tool, Point::new(300.0, 300.0), Modifiers::NONE);
        assert!(fx.tool.point_selection().is_empty());
    }

    #[test]
    fn drag_selection_moves_all_selected_points() {
        let mut fx = fixture(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
        ]);
        click(&mut fx.tool, Point::new(50.0, 0.0), Modifiers::NONE);
        click(&mut fx.tool, Point::new(100.0, 0.0), Modifiers::SHIFT);

        fx.tool
            .on_pointer_down(Point::new(50.0, 0.0), Modifiers::NONE, 1.0)
            .unwrap();
        assert!(matches!(fx.tool.active_gesture(), Some(GestureKind::DragSelection(_))));
        fx.tool.on_pointer_move(Point::new(55.0, 5.0), Modifiers::NONE);
        fx.tool.on_pointer_move(Point::new(60.0, 10.0), Modifiers::NONE);
        let edit = fx.tool.on_pointer_up().unwrap();

        assert_eq!(edit.name(), "Drag path points");
        assert_eq!(point(&fx, 0), Some(Point::new(0.0, 0.0)));
        assert_eq!(point(&fx, 1), Some(Point::new(60.0, 10.0)));
        assert_eq!(point(&fx, 2), Some(Point::new(110.0, 10.0)));
    }

    #[test]
    fn toggle_sharp_then_drag_pulls_handles() {
        let mut fx = fixture(&[Point::new(50.0, 50.0)]);
        fx.tool
            .on_pointer_down(Point::new(50.0, 50.0), Modifiers::COMMAND, 1.0)
            .unwrap();
        assert!(!control(&fx, 0).connected);
        assert!(matches!(
            fx.tool.active_gesture(),
            Some(GestureKind::ToggleSmoothSharp(_))
        ));

        fx.tool.on_pointer_move(Point::new(53.0, 50.0), Modifiers::COMMAND);
        assert!(matches!(
            fx.tool.active_gesture(),
            Some(GestureKind::ToggleSmoothSharp(_))
        ));

        fx.tool.on_pointer_move(Point::new(70.0, 50.0), Modifiers::COMMAND);
        match fx.tool.active_gesture() {
            Some(GestureKind::DragPoint(drag)) => {
                assert_eq!(drag.mode(), DragMode::MoveOutMirrorIn);
                assert_eq!(drag.target().which, HandleKind::HandleOut);
            }
            other => panic!("expected DragPoint, got {other:?}"),
        }
        let edit = fx.tool.on_pointer_up().unwrap();
        assert_eq!(edit.name(), "Set path point sharp");
        let cp = control(&fx, 0);
        assert_eq!(cp.point_out, Point::new(70.0, 50.0));
        assert_eq!(cp.point_in, Point::new(30.0, 50.0));
        assert_eq!(fx.tool.sink().edits.len(), 1);
    }

    #[test]
    fn add_point_and_drag_out_handles() {
        let mut fx = fixture(&[Point::new(0.0, 0.0)]);
        fx.tool
            .on_pointer_down(Point::new(100.0, 0.0), Modifiers::NONE, 1.0)
            .unwrap();
        assert_eq!(point(&fx, 1), Some(Point::new(100.0, 0.0)));
        assert_eq!(selected(&fx), vec![1]);

        fx.tool.on_pointer_move(Point::new(120.0, 0.0), Modifiers::NONE);
        let edit = fx.tool.on_pointer_up().unwrap();
        assert_eq!(edit.name(), "Add path point");
        let cp = control(&fx, 1);
        assert_eq!(cp.point_out, Point::new(120.0, 0.0));
        assert_eq!(cp.point_in, Point::new(80.0, 0.0));
        assert_eq!(fx.tool.sink().edits.len(), 1);
    }

    #[test]
    fn ctrl_click_removes_point_or_retracts_handle() {
        let points = [
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::new(
                Point::new(50.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(50.0, 30.0),
                false,
            ),
            ControlPoint::at(Point::new(100.0, 0.0)),
        ];
        let mut fx = fixture_with(RecordingSink::default(), &points, false);

        let edit = click(&mut fx.tool, Point::new(50.0, 29.0), Modifiers::CTRL).unwrap();
        assert_eq!(edit.name(), "Remove path point");
        assert_eq!(control(&fx, 1).point_out, Point::new(50.0, 0.0));

        click(&mut fx.tool, Point::new(50.0, 0.0), Modifiers::CTRL).unwrap();
        assert_eq!(read_document(&fx.doc).curve(fx.curve).unwrap().count_points(), 2);
        assert_eq!(point(&fx, 1), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn create_shape_on_empty_document() {
        let doc = Document::new().shared();
        let objects = ObjectSelection::new().shared();
        let mut tool = PathTool::new(Arc::clone(&doc), Arc::clone(&objects), RecordingSink::default());

        assert!(matches!(
            tool.classify(Point::new(30.0, 40.0), Modifiers::NONE),
            GestureKind::CreateShape(_)
        ));
        tool.on_pointer_down(Point::new(30.0, 40.0), Modifiers::NONE, 1.0)
            .unwrap();
        assert!(matches!(tool.active_gesture(), Some(GestureKind::DragPoint(_))));
        tool.on_pointer_move(Point::new(40.0, 40.0), Modifiers::NONE);
        let edit = tool.on_pointer_up().unwrap();
        assert_eq!(edit.name(), "Create shape");

        let shape = tool.edited_shape().unwrap();
        let curve = tool.current_path().unwrap();
        assert!(lock_selection(&objects).is_selected(shape));
        {
            let doc = read_document(&doc);
            assert_eq!(
                doc.shape(shape).unwrap().transform,
                Affine::translate((30.0, 40.0))
            );
            let cp = doc.curve(curve).unwrap().points_at(0).unwrap();
            assert_eq!(cp.point, Point::ZERO);
            assert_eq!(cp.point_out, Point::new(10.0, 0.0));
            assert_eq!(cp.point_in, Point::new(-10.0, 0.0));
        }

        edit.undo(&mut write_document(&doc));
        assert_eq!(read_document(&doc).shape_count(), 0);
        assert_eq!(read_document(&doc).curve_count(), 0);
    }

    #[test]
    fn alt_click_outside_closed_path_creates_path() {
        let points = [
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::at(Point::new(100.0, 0.0)),
            ControlPoint::at(Point::new(100.0, 100.0)),
        ];
        let mut fx = fixture_with(RecordingSink::default(), &points, true);
        let old_curve = fx.curve;

        let edit = click(&mut fx.tool, Point::new(300.0, 300.0), Modifiers::ALT).unwrap();
        assert_eq!(edit.name(), "Create path");
        assert_eq!(fx.tool.edited_paths().len(), 2);
        let new_curve = fx.tool.current_path().unwrap();
        assert_ne!(new_curve, old_curve);
        let doc = read_document(&fx.doc);
        assert_eq!(doc.shape(fx.shape).unwrap().paths, vec![old_curve, new_curve]);
        assert_eq!(doc.curve(new_curve).unwrap().point_at(0), Some(Point::new(300.0, 300.0)));
    }

    #[test]
    fn command_click_picks_shape() {
        let mut fx = fixture(&[Point::new(0.0, 0.0)]);
        let other = {
            let mut doc = write_document(&fx.doc);
            let other = doc.create_shape(Affine::translate((200.0, 0.0))).unwrap();
            let curve = doc.create_curve(other).unwrap();
            let path = doc.curve_mut(curve).unwrap();
            for p in [(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0)] {
                path.add_point(p.into());
            }
            path.set_closed(true);
            other
        };

        let target = Point::new(225.0, 25.0);
        match fx.tool.classify(target, Modifiers::COMMAND) {
            GestureKind::PickShape(pick) => {
                assert_eq!(pick.cursor(target), CursorKind::FollowLink);
            }
            other => panic!("expected PickShape, got {other:?}"),
        }
        assert!(click(&mut fx.tool, target, Modifiers::COMMAND).is_none());
        assert_eq!(fx.tool.edited_shape(), Some(other));
        assert!(lock_selection(&fx.objects).is_selected(other));
        assert!(!lock_selection(&fx.objects).is_selected(fx.shape));

        click(&mut fx.tool, Point::new(900.0, 900.0), Modifiers::COMMAND);
        assert_eq!(fx.tool.edited_shape(), None);
        assert_eq!(lock_selection(&fx.objects).selected().count(), 0);
    }

    #[test]
    fn arrow_keys_nudge_selection() {
        let mut fx = fixture(&[Point::new(0.0, 0.0), Point::new(50.0, 0.0)]);
        click(&mut fx.tool, Point::new(50.0, 0.0), Modifiers::NONE);

        fx.tool.set_view(ViewPort::new(Vec2::ZERO, 2.0));
        assert!(fx.tool.on_key_down(Key::ArrowRight, Modifiers::NONE));
        assert_eq!(point(&fx, 1), Some(Point::new(50.5, 0.0)));
        assert_eq!(point(&fx, 0), Some(Point::new(0.0, 0.0)));
        assert_eq!(fx.tool.sink().edits.last().unwrap().name(), "Move path points");

        assert!(!fx.tool.on_key_down(Key::Other, Modifiers::NONE));
        fx.tool.confirm();
        assert!(!fx.tool.on_key_down(Key::ArrowUp, Modifiers::NONE));
    }

    #[test]
    fn foreign_selection_changes_edited_shape() {
        let mut fx = fixture(&[Point::new(0.0, 0.0)]);
        let other = write_document(&fx.doc)
            .create_shape(Affine::IDENTITY)
            .unwrap();
        let editor = OriginTag::next();

        lock_selection(&fx.objects).select(other, editor);
        fx.tool.handle_selection_changes();
        assert_eq!(fx.tool.edited_shape(), Some(other));

        lock_selection(&fx.objects).deselect(other, editor);
        fx.tool.handle_selection_changes();
        assert_eq!(fx.tool.edited_shape(), None);
    }

    #[test]
    fn own_selection_changes_are_ignored() {
        let mut fx = fixture(&[Point::new(0.0, 0.0)]);
        let tag = fx.tool.origin_tag();
        lock_selection(&fx.objects).deselect(fx.shape, tag);
        fx.tool.handle_selection_changes();
        assert_eq!(fx.tool.edited_shape(), Some(fx.shape));
    }

    #[test]
    fn tool_adopts_selected_shape() {
        let doc = Document::new().shared();
        let shape = write_document(&doc).create_shape(Affine::IDENTITY).unwrap();
        let objects = ObjectSelection::new().shared();
        lock_selection(&objects).select(shape, OriginTag::next());
        let tool = PathTool::new(doc, objects, RecordingSink::default());
        assert_eq!(tool.edited_shape(), Some(shape));
    }

    #[test]
    fn rejected_edit_is_rolled_back() {
        let points = [
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::at(Point::new(10.0, 0.0)),
        ];
        let mut fx = fixture_with(RejectingSink, &points, false);
        fx.tool
            .on_pointer_down(Point::new(10.0, 0.0), Modifiers::NONE, 1.0)
            .unwrap();
        fx.tool.on_pointer_move(Point::new(30.0, 0.0), Modifiers::NONE);
        assert_eq!(point(&fx, 1), Some(Point::new(30.0, 0.0)));
        assert!(fx.tool.on_pointer_up().is_none());
        assert_eq!(point(&fx, 1), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn undo_of_created_path_drops_it_from_target() {
        let points = [
            ControlPoint::at(Point::new(0.0, 0.0)),
            ControlPoint::at(Point::new(100.0, 0.0)),
            ControlPoint::at(Point::new(100.0, 100.0)),
        ];
        let mut fx = fixture_with(RecordingSink::default(), &points, true);
        let edit = click(&mut fx.tool, Point::new(300.0, 300.0), Modifiers::ALT).unwrap();
        edit.undo(&mut write_document(&fx.doc));

        fx.tool.handle_selection_changes();
        assert_eq!(fx.tool.edited_paths(), &[fx.curve]);
        assert_eq!(fx.tool.current_path(), Some(fx.curve));
        let snapshot: Option<ShapeSnapshot> = read_document(&fx.doc).shape_snapshot(fx.shape);
        assert_eq!(snapshot.unwrap().paths, vec![fx.curve]);
    }

    #[test]
    fn hover_reports_next_cursor() {
        let mut fx = fixture(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert_eq!(
            fx.tool.on_pointer_move(Point::new(100.0, 1.0), Modifiers::NONE),
            CursorKind::PathMove
        );
        assert_eq!(
            fx.tool.hover(),
            Some(PathPointRef::new(fx.curve, 1, HandleKind::Point))
        );
        assert_eq!(
            fx.tool.on_pointer_move(Point::new(50.0, 2.0), Modifiers::NONE),
            CursorKind::PathInsert
        );
        assert_eq!(fx.tool.hover(), None);
        assert_eq!(
            fx.tool.on_pointer_move(Point::new(200.0, 200.0), Modifiers::NONE),
            CursorKind::PathAdd
        );
    }
}
