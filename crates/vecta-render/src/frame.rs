//! Renderer-facing frame contract.
//!
//! The core never draws. Once per refresh it resolves every object's world
//! transform and hands the backend a `Frame`: local paths plus the transform
//! to place them, pass-through styles, and the selection handles.

use crate::handles::{PlacedHandle, handle_radius, place_handles};
use crate::path::{local_bounds, to_bez_path};
use kurbo::{BezPath, Point, Rect, Size};
use vecta_core::camera::CameraState;
use vecta_core::config::EditorConfig;
use vecta_core::id::NodeId;
use vecta_core::model::{NodeKind, SceneGraph, Style};
use vecta_core::space::Viewport;
use vecta_core::transform::{WorldTransform, resolve_all, transform_of};

/// A drawing backend.
pub trait Renderer {
    /// The host surface changed size (pointer-space pixels).
    fn resize(&mut self, width: f64, height: f64);

    /// On-screen rect the reference canvas occupies.
    fn content_rect(&self) -> Rect;

    /// Logical view-space canvas size.
    fn reference_size(&self) -> Size;

    fn draw(&mut self, frame: &Frame);
}

/// One drawable object.
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub id: NodeId,
    pub transform: WorldTransform,
    /// Geometry in node-local space; apply `transform` to place it.
    pub path: BezPath,
    /// View-space bounds after the transform.
    pub view_bounds: Rect,
    pub style: Style,
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Visible objects, back to front.
    pub items: Vec<RenderItem>,
    /// Handles of the selected node, back to front.
    pub handles: Vec<PlacedHandle>,
}

/// View-space bounds of a local rect under `transform`.
pub fn view_bounds(transform: &WorldTransform, local: Rect) -> Rect {
    Rect::from_points(
        transform.to_view(Point::new(local.x0, local.y0)),
        transform.to_view(Point::new(local.x1, local.y1)),
    )
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Assemble the frame for the current scene and camera.
pub fn build_frame(
    graph: &SceneGraph,
    camera: &CameraState,
    viewport: &Viewport,
    selection: Option<NodeId>,
    config: &EditorConfig,
) -> Frame {
    let canvas = viewport.reference.to_rect();
    let mut frame = Frame::default();

    for (idx, transform) in resolve_all(graph, camera) {
        let node = graph.node(idx);
        if node.kind != NodeKind::Object {
            continue;
        }
        let Some(local) = local_bounds(&node.geometry) else {
            continue;
        };
        let bounds = view_bounds(&transform, local);
        if !overlaps(bounds, canvas) {
            log::trace!("cull @{} at {bounds:?}", node.id);
            continue;
        }
        frame.items.push(RenderItem {
            id: node.id,
            transform,
            path: to_bez_path(&node.geometry),
            view_bounds: bounds,
            style: node.style.clone(),
        });
    }

    if let Some(selected) = selection
        && let Some(idx) = graph.index_of(selected)
    {
        let transform = transform_of(graph, camera, idx);
        let radius = handle_radius(viewport, config.handle_size);
        frame.handles = place_handles(graph, selected, &transform, radius);
    }

    frame
}
