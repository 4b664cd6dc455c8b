//! Hit testing: view-space point → handle or object.
//!
//! Selection handles win over shapes. Shapes are tested front-to-back
//! (reverse document order) against their local bounding box, so the
//! last-painted object under the point is the one reported.

use crate::handles::{HandleRef, handle_radius, place_handles};
use crate::path::local_bounds;
use kurbo::{Point, Rect};
use vecta_core::camera::CameraState;
use vecta_core::config::EditorConfig;
use vecta_core::id::NodeId;
use vecta_core::model::{NodeKind, SceneGraph};
use vecta_core::space::Viewport;
use vecta_core::transform::{resolve_all, transform_of};

/// What lies under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle { handle: HandleRef, locked: bool },
    Object { id: NodeId, locked: bool },
    Canvas,
}

/// Find the topmost handle or object at `view` (view space).
pub fn hit_test(
    graph: &SceneGraph,
    camera: &CameraState,
    viewport: &Viewport,
    selection: Option<NodeId>,
    view: Point,
    config: &EditorConfig,
) -> Hit {
    if let Some(selected) = selection
        && let Some(idx) = graph.index_of(selected)
    {
        let transform = transform_of(graph, camera, idx);
        let radius = handle_radius(viewport, config.handle_size);
        let handles = place_handles(graph, selected, &transform, radius);
        // Later handles are drawn on top.
        if let Some(placed) = handles.iter().rev().find(|h| h.contains(view)) {
            return Hit::Handle {
                handle: placed.handle,
                locked: graph.node(idx).locked,
            };
        }
    }

    for (idx, transform) in resolve_all(graph, camera).into_iter().rev() {
        let node = graph.node(idx);
        if node.kind != NodeKind::Object {
            continue;
        }
        let Some(bounds) = local_bounds(&node.geometry) else {
            continue;
        };
        if contains_closed(bounds, transform.to_local(view)) {
            return Hit::Object {
                id: node.id,
                locked: node.locked,
            };
        }
    }

    Hit::Canvas
}

/// Edge-inclusive containment, so flat and single-point shapes stay hittable.
fn contains_closed(rect: Rect, p: Point) -> bool {
    (rect.x0..=rect.x1).contains(&p.x) && (rect.y0..=rect.y1).contains(&p.y)
}
