//! Gesture recognition.
//!
//! Turns a stream of `InputEvent`s into semantic `GestureEvent`s. The
//! controller never touches the scene or the camera: it reads a
//! `ViewContext` snapshot per event and reports what the user meant. The
//! session applies the result.
//!
//! Two-finger input stays in `TwoFingerPending` until either the finger
//! distance or the midpoint has moved past the configured threshold; the
//! first signal to cross wins for the rest of the gesture.

use crate::input::{InputEvent, PointerId, Target, TargetTags};
use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use vecta_core::camera::CameraState;
use vecta_core::config::EditorConfig;
use vecta_core::id::NodeId;
use vecta_core::space::Viewport;
use vecta_render::handles::HandleRef;

/// Camera and viewport as they were when the input event arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    pub camera: CameraState,
    pub viewport: Viewport,
}

/// Semantic result of an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Select { id: NodeId },
    PointerDownOnHandle { handle: HandleRef },
    PointerDownOnObject { id: NodeId },
    /// Move the handle by `delta` world units.
    Drag { handle: HandleRef, delta: Vec2 },
    DragEnd { handle: HandleRef },
    /// Place the camera's view window at `origin` (world units).
    Pan { origin: Point },
    PanEnd,
    /// Zoom to `z`, keeping `pivot` (view space) fixed.
    Zoom { z: f64, pivot: Point },
    ZoomEnd,
    WheelZoom { delta: f64 },
}

/// Baseline of a two-finger gesture, captured when the second contact lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    pub pair: [PointerId; 2],
    /// Initial finger distance (pointer px).
    pub distance: f64,
    /// Initial midpoint (pointer space).
    pub midpoint: Point,
    /// Initial midpoint in view space; the zoom pivot.
    pub pivot: Point,
    pub zoom: f64,
    pub origin: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    DraggingHandle {
        pointer_id: PointerId,
        handle: HandleRef,
        last: Point,
    },
    PanningSingle {
        pointer_id: PointerId,
        start: Point,
        start_origin: Point,
    },
    TwoFingerPending(Pinch),
    TwoFingerZoom(Pinch),
    TwoFingerPan(Pinch),
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DraggingHandle { .. } => "dragging-handle",
            Self::PanningSingle { .. } => "panning-single",
            Self::TwoFingerPending(_) => "two-finger-pending",
            Self::TwoFingerZoom(_) => "two-finger-zoom",
            Self::TwoFingerPan(_) => "two-finger-pan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    id: PointerId,
    position: Point,
}

/// Pointer/touch state machine. One per editor.
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    contacts: SmallVec<[Contact; 4]>,
    threshold: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl GestureController {
    pub fn new(config: &EditorConfig) -> Self {
        let (min_zoom, max_zoom) = config.zoom_bounds();
        Self {
            state: GestureState::Idle,
            contacts: SmallVec::new(),
            threshold: config.gesture_threshold.max(0.0),
            min_zoom,
            max_zoom,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Number of contacts currently down.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: &InputEvent, ctx: &ViewContext) -> Vec<GestureEvent> {
        match event {
            InputEvent::PointerDown {
                pointer_id,
                position,
                target,
            } => self.pointer_down(*pointer_id, *position, target, ctx),
            InputEvent::PointerMove {
                pointer_id,
                position,
            } => self.pointer_move(*pointer_id, *position, ctx),
            InputEvent::PointerUp { pointer_id, .. } | InputEvent::PointerCancel { pointer_id } => {
                self.pointer_up(*pointer_id)
            }
            InputEvent::Wheel { delta, .. } if delta.is_finite() => {
                vec![GestureEvent::WheelZoom { delta: *delta }]
            }
            InputEvent::Wheel { .. } => Vec::new(),
        }
    }

    /// Drop every contact, ending whatever gesture was active.
    pub fn reset(&mut self) -> Vec<GestureEvent> {
        self.contacts.clear();
        let end = self.end_event();
        self.transition(GestureState::Idle);
        end.into_iter().collect()
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        id: PointerId,
        position: Point,
        tags: &TargetTags,
        ctx: &ViewContext,
    ) -> Vec<GestureEvent> {
        if !position.is_finite() || self.contact(id).is_some() {
            log::trace!("ignoring pointer-down {id} at {position:?}");
            return Vec::new();
        }
        let Some(target) = tags.resolve() else {
            log::trace!("ignoring pointer-down {id}: malformed target {tags:?}");
            return Vec::new();
        };
        self.contacts.push(Contact { id, position });

        match self.state {
            GestureState::Idle if self.contacts.len() == 1 => {
                self.begin_single(id, position, target, ctx)
            }
            GestureState::Idle => {
                self.begin_pinch(ctx);
                press_events(target)
            }
            GestureState::PanningSingle { .. } => {
                self.begin_pinch(ctx);
                let mut events = vec![GestureEvent::PanEnd];
                events.extend(press_events(target));
                events
            }
            // Extra fingers during a drag or an active pinch only select.
            _ => press_events(target),
        }
    }

    fn begin_single(
        &mut self,
        id: PointerId,
        position: Point,
        target: Target,
        ctx: &ViewContext,
    ) -> Vec<GestureEvent> {
        let events = press_events(target);
        let drag = match target {
            Target::Canvas => None,
            Target::Handle { handle, locked } => (!locked).then_some(handle),
            Target::Object { id: node, locked } => (!locked).then(|| HandleRef::origin(node)),
        };

        if let Some(handle) = drag {
            self.transition(GestureState::DraggingHandle {
                pointer_id: id,
                handle,
                last: position,
            });
        } else if ctx.camera.is_zoomed_in(ctx.viewport.reference) {
            // Canvas and locked targets pan, but only when there is room to.
            self.transition(GestureState::PanningSingle {
                pointer_id: id,
                start: position,
                start_origin: ctx.camera.view_origin(),
            });
        }
        events
    }

    fn begin_pinch(&mut self, ctx: &ViewContext) {
        let [a, b] = match self.contacts.as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return,
        };
        let midpoint = a.position.midpoint(b.position);
        self.transition(GestureState::TwoFingerPending(Pinch {
            pair: [a.id, b.id],
            distance: a.position.distance(b.position),
            midpoint,
            pivot: ctx.viewport.pointer_to_view(midpoint),
            zoom: ctx.camera.z,
            origin: ctx.camera.view_origin(),
        }));
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move(
        &mut self,
        id: PointerId,
        position: Point,
        ctx: &ViewContext,
    ) -> Vec<GestureEvent> {
        if !position.is_finite() {
            return Vec::new();
        }
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) else {
            log::trace!("ignoring move of unknown pointer {id}");
            return Vec::new();
        };
        contact.position = position;

        match self.state {
            GestureState::DraggingHandle {
                pointer_id,
                handle,
                last,
            } if pointer_id == id => {
                let view = ctx.viewport.pointer_delta_to_view(position - last);
                let delta = view / ctx.camera.scale();
                self.state = GestureState::DraggingHandle {
                    pointer_id,
                    handle,
                    last: position,
                };
                vec![GestureEvent::Drag { handle, delta }]
            }
            GestureState::PanningSingle {
                pointer_id,
                start,
                start_origin,
            } if pointer_id == id => vec![GestureEvent::Pan {
                origin: pan_origin(start_origin, position - start, ctx),
            }],
            GestureState::TwoFingerPending(pinch) if pinch.pair.contains(&id) => {
                self.resolve_pending(pinch, ctx)
            }
            GestureState::TwoFingerZoom(pinch) if pinch.pair.contains(&id) => {
                self.zoom_event(&pinch).into_iter().collect()
            }
            GestureState::TwoFingerPan(pinch) if pinch.pair.contains(&id) => {
                self.pinch_pan_event(&pinch, ctx).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn resolve_pending(&mut self, pinch: Pinch, ctx: &ViewContext) -> Vec<GestureEvent> {
        let Some((a, b)) = self.pair_positions(&pinch) else {
            return Vec::new();
        };
        let zoom_excess = (a.distance(b) - pinch.distance).abs() - self.threshold;
        let pan_excess = a.midpoint(b).distance(pinch.midpoint) - self.threshold;

        if zoom_excess > 0.0 && zoom_excess >= pan_excess {
            self.transition(GestureState::TwoFingerZoom(pinch));
            self.zoom_event(&pinch).into_iter().collect()
        } else if pan_excess > 0.0 {
            self.transition(GestureState::TwoFingerPan(pinch));
            self.pinch_pan_event(&pinch, ctx).into_iter().collect()
        } else {
            Vec::new()
        }
    }

    fn zoom_event(&self, pinch: &Pinch) -> Option<GestureEvent> {
        let (a, b) = self.pair_positions(pinch)?;
        let distance = a.distance(b);
        if distance <= f64::EPSILON || pinch.distance <= f64::EPSILON {
            return None;
        }
        let z = (pinch.zoom * pinch.distance / distance).clamp(self.min_zoom, self.max_zoom);
        Some(GestureEvent::Zoom {
            z,
            pivot: pinch.pivot,
        })
    }

    fn pinch_pan_event(&self, pinch: &Pinch, ctx: &ViewContext) -> Option<GestureEvent> {
        let (a, b) = self.pair_positions(pinch)?;
        Some(GestureEvent::Pan {
            origin: pan_origin(pinch.origin, a.midpoint(b) - pinch.midpoint, ctx),
        })
    }

    // ─── Pointer up ──────────────────────────────────────────────────────

    fn pointer_up(&mut self, id: PointerId) -> Vec<GestureEvent> {
        let Some(at) = self.contacts.iter().position(|c| c.id == id) else {
            log::trace!("ignoring release of unknown pointer {id}");
            return Vec::new();
        };
        self.contacts.remove(at);

        let ends = match self.state {
            GestureState::DraggingHandle { pointer_id, .. }
            | GestureState::PanningSingle { pointer_id, .. } => pointer_id == id,
            GestureState::TwoFingerPending(pinch)
            | GestureState::TwoFingerZoom(pinch)
            | GestureState::TwoFingerPan(pinch) => pinch.pair.contains(&id),
            GestureState::Idle => false,
        };
        if !ends && !self.contacts.is_empty() {
            return Vec::new();
        }
        let end = self.end_event();
        self.transition(GestureState::Idle);
        end.into_iter().collect()
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    fn end_event(&self) -> Option<GestureEvent> {
        match self.state {
            GestureState::DraggingHandle { handle, .. } => Some(GestureEvent::DragEnd { handle }),
            GestureState::PanningSingle { .. } | GestureState::TwoFingerPan(_) => {
                Some(GestureEvent::PanEnd)
            }
            GestureState::TwoFingerZoom(_) => Some(GestureEvent::ZoomEnd),
            GestureState::Idle | GestureState::TwoFingerPending(_) => None,
        }
    }

    fn contact(&self, id: PointerId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    fn pair_positions(&self, pinch: &Pinch) -> Option<(Point, Point)> {
        let a = self.contact(pinch.pair[0])?;
        let b = self.contact(pinch.pair[1])?;
        Some((a.position, b.position))
    }

    fn transition(&mut self, next: GestureState) {
        if self.state.name() != next.name() {
            log::trace!("gesture: {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }
}

/// Events for a contact landing on `target`, whatever the current state.
fn press_events(target: Target) -> Vec<GestureEvent> {
    match target {
        Target::Canvas => Vec::new(),
        Target::Handle { handle, .. } => vec![
            GestureEvent::Select { id: handle.owner },
            GestureEvent::PointerDownOnHandle { handle },
        ],
        Target::Object { id, .. } => vec![
            GestureEvent::Select { id },
            GestureEvent::PointerDownOnObject { id },
        ],
    }
}

/// View-window origin after dragging by `pointer_delta` since the gesture
/// started at `start_origin`, clamped so the window stays on the canvas.
fn pan_origin(start_origin: Point, pointer_delta: Vec2, ctx: &ViewContext) -> Point {
    let reference = ctx.viewport.reference;
    let world = ctx.viewport.pointer_delta_to_view(pointer_delta) / ctx.camera.scale();
    let view = ctx.camera.view_size(reference);
    let max_x = (reference.width - view.width).max(0.0);
    let max_y = (reference.height - view.height).max(0.0);
    let origin = start_origin - world;
    Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vecta_core::camera::Camera;
    use vecta_render::handles::HandleKind;

    fn ctx_with(camera: &Camera) -> ViewContext {
        ViewContext {
            camera: camera.state(),
            viewport: Viewport::unscaled(EditorConfig::default().reference_size()),
        }
    }

    fn ctx() -> ViewContext {
        ctx_with(&Camera::default())
    }

    /// Camera at z = 100 (scale 2) with the view window at `origin`.
    fn zoomed_ctx(origin: Point) -> ViewContext {
        let mut camera = Camera::default();
        camera.set_zoom(100.0);
        camera.set_view_origin(origin);
        ctx_with(&camera)
    }

    fn controller() -> GestureController {
        GestureController::new(&EditorConfig::default())
    }

    fn anchor(index: usize, owner: &str) -> HandleRef {
        HandleRef {
            kind: HandleKind::Anchor,
            index,
            owner: NodeId::intern(owner),
        }
    }

    #[test]
    fn handle_drag_emits_world_deltas() {
        let mut gc = controller();
        let cx = zoomed_ctx(Point::ORIGIN);

        let tags = TargetTags::handle("anchor", 2, "arm");
        let events = gc.handle(&InputEvent::down(1, 10.0, 10.0, tags), &cx);
        assert_eq!(
            events,
            vec![
                GestureEvent::Select { id: NodeId::intern("arm") },
                GestureEvent::PointerDownOnHandle { handle: anchor(2, "arm") },
            ]
        );

        // scale 2: 20 px on screen is 10 world units
        let events = gc.handle(&InputEvent::moved(1, 30.0, 10.0), &cx);
        assert_eq!(
            events,
            vec![GestureEvent::Drag {
                handle: anchor(2, "arm"),
                delta: Vec2::new(10.0, 0.0)
            }]
        );
        // Deltas are incremental.
        let events = gc.handle(&InputEvent::moved(1, 30.0, 14.0), &cx);
        assert_eq!(
            events,
            vec![GestureEvent::Drag {
                handle: anchor(2, "arm"),
                delta: Vec2::new(0.0, 2.0)
            }]
        );

        let events = gc.handle(&InputEvent::up(1, 30.0, 14.0), &cx);
        assert_eq!(events, vec![GestureEvent::DragEnd { handle: anchor(2, "arm") }]);
        assert!(gc.is_idle());
    }

    #[test]
    fn object_body_drags_origin() {
        let mut gc = controller();
        let events = gc.handle(&InputEvent::down(1, 0.0, 0.0, TargetTags::node("torso")), &ctx());
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            GestureEvent::PointerDownOnObject { id: NodeId::intern("torso") }
        );
        let origin = HandleRef::origin(NodeId::intern("torso"));
        assert_eq!(
            *gc.state(),
            GestureState::DraggingHandle {
                pointer_id: 1,
                handle: origin,
                last: Point::ORIGIN
            }
        );
    }

    #[test]
    fn locked_object_selects_then_pans() {
        let mut gc = controller();
        let cx = zoomed_ctx(Point::new(100.0, 100.0));
        let tags = TargetTags::node("bg").locked();
        let events = gc.handle(&InputEvent::down(1, 50.0, 50.0, tags), &cx);
        assert_eq!(events[0], GestureEvent::Select { id: NodeId::intern("bg") });
        assert!(matches!(gc.state(), GestureState::PanningSingle { .. }));

        let events = gc.handle(&InputEvent::moved(1, 30.0, 60.0), &cx);
        assert_eq!(events, vec![GestureEvent::Pan { origin: Point::new(110.0, 95.0) }]);
        assert_eq!(gc.handle(&InputEvent::up(1, 30.0, 60.0), &cx), vec![GestureEvent::PanEnd]);
    }

    #[test]
    fn canvas_tap_at_full_view_stays_idle() {
        let mut gc = controller();
        assert!(gc.handle(&InputEvent::down(1, 5.0, 5.0, TargetTags::canvas()), &ctx()).is_empty());
        assert!(gc.is_idle());
        assert!(gc.handle(&InputEvent::moved(1, 50.0, 50.0), &ctx()).is_empty());
        assert!(gc.handle(&InputEvent::up(1, 50.0, 50.0), &ctx()).is_empty());
        assert_eq!(gc.contact_count(), 0);
    }

    #[test]
    fn pan_origin_is_clamped_to_canvas() {
        let mut gc = controller();
        // scale 2: view window 512 × 384, so origin ∈ [0, 512] × [0, 384]
        let cx = zoomed_ctx(Point::ORIGIN);
        gc.handle(&InputEvent::down(1, 500.0, 300.0, TargetTags::canvas()), &cx);

        let pan = |gc: &mut GestureController, x, y| gc.handle(&InputEvent::moved(1, x, y), &cx);
        assert_eq!(
            pan(&mut gc, 400.0, 300.0),
            vec![GestureEvent::Pan {
                origin: Point::new(50.0, 0.0)
            }]
        );
        assert_eq!(pan(&mut gc, 600.0, 400.0), vec![GestureEvent::Pan { origin: Point::ORIGIN }]);
        assert_eq!(
            pan(&mut gc, -5000.0, -5000.0),
            vec![GestureEvent::Pan { origin: Point::new(512.0, 384.0) }]
        );
    }

    #[test]
    fn pinch_spread_commits_to_zoom() {
        let mut gc = controller();
        let cx = ctx();
        gc.handle(&InputEvent::down(1, 100.0, 100.0, TargetTags::canvas()), &cx);
        gc.handle(&InputEvent::down(2, 200.0, 100.0, TargetTags::canvas()), &cx);
        assert!(matches!(gc.state(), GestureState::TwoFingerPending(_)));

        // distance 100 → 150 (excess 40) beats midpoint shift 25 (excess 15)
        let events = gc.handle(&InputEvent::moved(2, 250.0, 100.0), &cx);
        assert!(matches!(gc.state(), GestureState::TwoFingerZoom(_)));
        match events.as_slice() {
            [GestureEvent::Zoom { z, pivot }] => {
                assert!((z - 200.0 * 100.0 / 150.0).abs() < 1e-9);
                assert_eq!(*pivot, Point::new(150.0, 100.0));
            }
            other => panic!("expected zoom, got {other:?}"),
        }

        // Committed: a later midpoint slide still zooms.
        let events = gc.handle(&InputEvent::moved(1, 300.0, 400.0), &cx);
        assert!(matches!(events.as_slice(), [GestureEvent::Zoom { .. }]));

        assert_eq!(gc.handle(&InputEvent::up(1, 0.0, 0.0), &cx), vec![GestureEvent::ZoomEnd]);
        assert!(gc.is_idle());
        // No single-finger resume.
        assert!(gc.handle(&InputEvent::moved(2, 10.0, 10.0), &cx).is_empty());
        assert!(gc.handle(&InputEvent::up(2, 10.0, 10.0), &cx).is_empty());
    }

    #[test]
    fn pinch_zoom_is_clamped() {
        let mut gc = controller();
        let cx = ctx();
        gc.handle(&InputEvent::down(1, 100.0, 100.0, TargetTags::canvas()), &cx);
        gc.handle(&InputEvent::down(2, 110.0, 100.0, TargetTags::canvas()), &cx);
        let events = gc.handle(&InputEvent::moved(2, 1100.0, 100.0), &cx);
        assert!(matches!(events.as_slice(), [GestureEvent::Zoom { z, .. }] if *z == 10.0));
    }

    #[test]
    fn pinch_slide_commits_to_pan() {
        let mut gc = controller();
        let cx = zoomed_ctx(Point::new(100.0, 100.0));
        gc.handle(&InputEvent::down(1, 100.0, 100.0, TargetTags::canvas()), &cx);
        gc.handle(&InputEvent::down(2, 200.0, 100.0, TargetTags::canvas()), &cx);

        // Below threshold on both signals.
        assert!(gc.handle(&InputEvent::moved(1, 100.0, 115.0), &cx).is_empty());
        assert!(matches!(gc.state(), GestureState::TwoFingerPending(_)));

        // Midpoint now 15 px down, distance back to 100.
        let events = gc.handle(&InputEvent::moved(2, 200.0, 115.0), &cx);
        assert!(matches!(gc.state(), GestureState::TwoFingerPan(_)));
        assert_eq!(events, vec![GestureEvent::Pan { origin: Point::new(100.0, 92.5) }]);

        let cancel = InputEvent::PointerCancel { pointer_id: 2 };
        assert_eq!(gc.handle(&cancel, &cx), vec![GestureEvent::PanEnd]);
        assert!(gc.is_idle());
    }

    #[test]
    fn second_finger_ends_single_pan() {
        let mut gc = controller();
        let cx = zoomed_ctx(Point::ORIGIN);
        gc.handle(&InputEvent::down(1, 10.0, 10.0, TargetTags::canvas()), &cx);
        assert!(matches!(gc.state(), GestureState::PanningSingle { .. }));
        let events = gc.handle(&InputEvent::down(2, 60.0, 10.0, TargetTags::node("a")), &cx);
        let a = NodeId::intern("a");
        assert_eq!(
            events,
            vec![
                GestureEvent::PanEnd,
                GestureEvent::Select { id: a },
                GestureEvent::PointerDownOnObject { id: a },
            ]
        );
        assert!(matches!(gc.state(), GestureState::TwoFingerPending(_)));
    }

    #[test]
    fn second_finger_on_node_selects_it() {
        let mut gc = controller();
        let cx = ctx();
        gc.handle(&InputEvent::down(1, 10.0, 10.0, TargetTags::canvas()), &cx);
        let tags = TargetTags::handle("anchor", 0, "b");
        let events = gc.handle(&InputEvent::down(2, 60.0, 10.0, tags), &cx);
        assert_eq!(
            events,
            vec![
                GestureEvent::Select { id: NodeId::intern("b") },
                GestureEvent::PointerDownOnHandle { handle: anchor(0, "b") },
            ]
        );
        assert!(matches!(gc.state(), GestureState::TwoFingerPending(_)));
    }

    #[test]
    fn releasing_one_finger_while_pending_goes_idle_silently() {
        let mut gc = controller();
        let cx = ctx();
        gc.handle(&InputEvent::down(1, 100.0, 100.0, TargetTags::canvas()), &cx);
        gc.handle(&InputEvent::down(2, 200.0, 100.0, TargetTags::canvas()), &cx);
        assert!(matches!(gc.state(), GestureState::TwoFingerPending(_)));

        assert!(gc.handle(&InputEvent::up(2, 200.0, 100.0), &cx).is_empty());
        assert!(gc.is_idle());
        assert_eq!(gc.contact_count(), 1);
        // The remaining finger does not resume a single-finger gesture.
        assert!(gc.handle(&InputEvent::moved(1, 150.0, 150.0), &cx).is_empty());
        assert!(gc.is_idle());
    }

    #[test]
    fn second_finger_during_drag_is_tracked_only() {
        let mut gc = controller();
        let cx = ctx();
        gc.handle(&InputEvent::down(1, 0.0, 0.0, TargetTags::node("a")), &cx);
        assert!(gc.handle(&InputEvent::down(2, 50.0, 0.0, TargetTags::canvas()), &cx).is_empty());
        let events = gc.handle(&InputEvent::down(3, 90.0, 0.0, TargetTags::node("b")), &cx);
        assert_eq!(events[0], GestureEvent::Select { id: NodeId::intern("b") });
        assert!(gc.handle(&InputEvent::up(3, 90.0, 0.0), &cx).is_empty());
        assert!(gc.handle(&InputEvent::moved(2, 80.0, 0.0), &cx).is_empty());
        assert!(gc.handle(&InputEvent::up(2, 80.0, 0.0), &cx).is_empty());
        assert!(matches!(gc.state(), GestureState::DraggingHandle { .. }));
    }

    #[test]
    fn bad_input_is_ignored() {
        let mut gc = controller();
        let cx = ctx();
        let malformed = TargetTags::handle("corner", 0, "a");
        assert!(gc.handle(&InputEvent::down(1, 0.0, 0.0, malformed), &cx).is_empty());
        assert_eq!(gc.contact_count(), 0);

        let nan = InputEvent::down(1, f64::NAN, 0.0, TargetTags::node("a"));
        assert!(gc.handle(&nan, &cx).is_empty());
        assert!(gc.handle(&InputEvent::moved(9, 1.0, 1.0), &cx).is_empty());
        assert!(gc.handle(&InputEvent::up(9, 1.0, 1.0), &cx).is_empty());

        gc.handle(&InputEvent::down(1, 0.0, 0.0, TargetTags::node("a")), &cx);
        assert!(gc.handle(&InputEvent::moved(1, f64::INFINITY, 0.0), &cx).is_empty());
        // Duplicate down for a live pointer.
        assert!(gc.handle(&InputEvent::down(1, 5.0, 5.0, TargetTags::canvas()), &cx).is_empty());
        assert_eq!(gc.contact_count(), 1);
    }

    #[test]
    fn wheel_works_in_any_state() {
        let mut gc = controller();
        let cx = ctx();
        let wheel = InputEvent::Wheel {
            position: Point::new(5.0, 5.0),
            delta: 50.0,
        };
        assert_eq!(gc.handle(&wheel, &cx), vec![GestureEvent::WheelZoom { delta: 50.0 }]);
        gc.handle(&InputEvent::down(1, 0.0, 0.0, TargetTags::node("a")), &cx);
        assert_eq!(gc.handle(&wheel, &cx), vec![GestureEvent::WheelZoom { delta: 50.0 }]);
        assert!(matches!(gc.state(), GestureState::DraggingHandle { .. }));
        let bad = InputEvent::Wheel {
            position: Point::ORIGIN,
            delta: f64::NAN,
        };
        assert!(gc.handle(&bad, &cx).is_empty());
    }

    #[test]
    fn reset_ends_active_gesture() {
        let mut gc = controller();
        let cx = ctx();
        gc.handle(&InputEvent::down(1, 0.0, 0.0, TargetTags::node("a")), &cx);
        assert_eq!(
            gc.reset(),
            vec![GestureEvent::DragEnd { handle: HandleRef::origin(NodeId::intern("a")) }]
        );
        assert!(gc.is_idle());
        assert_eq!(gc.contact_count(), 0);
        assert!(gc.reset().is_empty());
    }
}
