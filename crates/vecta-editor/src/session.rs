//! Editor session: the reference coordinator.
//!
//! Owns the scene store, camera, gesture controller, viewport, and
//! selection. Input goes through the controller; its events are applied
//! here. Rendering is coalesced: any number of changes between two refresh
//! ticks produce one frame.

use crate::gesture::{GestureController, GestureEvent, ViewContext};
use crate::input::{InputEvent, TargetTags};
use crate::persist::{Clock, PersistError, Persistence};
use crate::store::SceneStore;
use kurbo::{Point, Rect, Vec2};
use vecta_core::camera::Camera;
use vecta_core::config::EditorConfig;
use vecta_core::id::NodeId;
use vecta_core::model::Node;
use vecta_core::space::Viewport;
use vecta_render::frame::{Renderer, build_frame};
use vecta_render::handles::{HandleKind, HandleRef};
use vecta_render::hit::hit_test;

pub struct EditorSession<P: Persistence> {
    config: EditorConfig,
    store: SceneStore<P>,
    camera: Camera,
    gestures: GestureController,
    viewport: Viewport,
    selection: Option<NodeId>,
    needs_render: bool,
}

impl<P: Persistence> EditorSession<P> {
    pub fn new(config: EditorConfig, persistence: P, clock: impl Clock + 'static) -> Self {
        Self {
            store: SceneStore::new(persistence, clock, &config),
            camera: Camera::new(&config),
            gestures: GestureController::new(&config),
            viewport: Viewport::unscaled(config.reference_size()),
            selection: None,
            needs_render: true,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneStore<P> {
        &self.store
    }

    /// Direct access for programmatic edits; schedules a redraw.
    pub fn scene_mut(&mut self) -> &mut SceneStore<P> {
        self.needs_render = true;
        &mut self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        self.needs_render = true;
        &mut self.camera
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        if self.selection != id {
            self.selection = id;
            self.needs_render = true;
        }
    }

    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            camera: self.camera.state(),
            viewport: self.viewport,
        }
    }

    /// The host surface changed size. Pointer mapping and handle sizing
    /// follow the content rect and reference size the renderer reports
    /// afterwards.
    pub fn resize(&mut self, renderer: &mut dyn Renderer, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::warn!("ignoring resize to {width}×{height}");
            return;
        }
        renderer.resize(width, height);

        let reference = renderer.reference_size();
        let usable = reference.is_finite() && reference.width > 0.0 && reference.height > 0.0;
        self.viewport.reference = if usable {
            reference
        } else {
            log::warn!("renderer reported reference size {reference:?}, keeping config");
            self.config.reference_size()
        };
        let content = renderer.content_rect();
        self.viewport.container = if content.is_finite() && content.area() > 0.0 {
            content
        } else {
            log::debug!("renderer reported no content rect, fitting into the surface");
            Rect::new(0.0, 0.0, width, height)
        };
        self.needs_render = true;
    }

    /// Tags for whatever lies under `pointer`, for hosts that do not tag
    /// their own elements.
    pub fn target_at(&self, pointer: Point) -> TargetTags {
        let view = self.viewport.pointer_to_view(pointer);
        hit_test(
            self.store.graph(),
            &self.camera.state(),
            &self.viewport,
            self.selection,
            view,
            &self.config,
        )
        .into()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event and apply what it meant. Returns the applied
    /// gesture events.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<GestureEvent> {
        let ctx = self.view_context();
        let events = self.gestures.handle(event, &ctx);
        for event in &events {
            self.apply(*event);
        }
        events
    }

    fn apply(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Select { id } => self.select(Some(id)),
            GestureEvent::PointerDownOnHandle { handle } => {
                let kind = handle.kind.as_str();
                log::trace!("pressed {kind} handle {} of {}", handle.index, handle.owner);
            }
            GestureEvent::PointerDownOnObject { id } => log::trace!("pressed {id}"),
            GestureEvent::Drag { handle, delta } => {
                if self.store.edit(handle.owner, |node| drag_handle(node, handle, delta)) {
                    self.needs_render = true;
                }
            }
            GestureEvent::Pan { origin } => {
                self.camera.set_view_origin(origin);
                self.needs_render = true;
            }
            GestureEvent::Zoom { z, pivot } => {
                self.camera.zoom_about(z, pivot);
                self.needs_render = true;
            }
            GestureEvent::WheelZoom { delta } => {
                self.camera.wheel_zoom(delta);
                self.needs_render = true;
            }
            GestureEvent::DragEnd { .. } | GestureEvent::PanEnd | GestureEvent::ZoomEnd => {}
        }
    }

    // ─── Refresh ─────────────────────────────────────────────────────────

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Consume the redraw flag.
    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    /// Drive the debounced save. Returns whether a write happened.
    pub fn tick(&mut self) -> bool {
        self.store.tick()
    }

    /// Draw one frame if anything changed since the last one.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> bool {
        if !self.take_needs_render() {
            return false;
        }
        let frame = build_frame(
            self.store.graph(),
            &self.camera.state(),
            &self.viewport,
            self.selection,
            &self.config,
        );
        log::trace!("drawing {} items, {} handles", frame.items.len(), frame.handles.len());
        renderer.draw(&frame);
        true
    }

    pub fn force_save(&mut self) -> bool {
        self.store.force_save()
    }

    /// Replace the scene from storage, ending any active gesture.
    ///
    /// # Errors
    /// Storage or decode failures; the current scene is kept.
    pub fn load(&mut self) -> Result<usize, PersistError> {
        let count = self.store.load()?;
        self.gestures.reset();
        if let Some(id) = self.selection
            && !self.store.graph().contains(id.as_str())
        {
            self.selection = None;
        }
        self.needs_render = true;
        Ok(count)
    }
}

/// Move one handle of `node` by `delta` world units.
fn drag_handle(node: &mut Node, handle: HandleRef, delta: Vec2) -> bool {
    if node.locked || !(delta.x.is_finite() && delta.y.is_finite()) {
        return false;
    }
    if handle.kind == HandleKind::Origin {
        node.offset.x += delta.x;
        node.offset.y += delta.y;
        return true;
    }
    let id = node.id;
    let Some(point) = node.geometry.get_mut(handle.index) else {
        log::debug!("no point {} on {id}", handle.index);
        return false;
    };
    let control = match handle.kind {
        HandleKind::Anchor => {
            point.x += delta.x;
            point.y += delta.y;
            return true;
        }
        HandleKind::Start => &mut point.start,
        HandleKind::End => &mut point.end,
        HandleKind::Origin => return false,
    };
    match control {
        Some(offset) => {
            *offset += delta;
            true
        }
        None => false,
    }
}
