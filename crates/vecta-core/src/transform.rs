//! Accumulated node placement.
//!
//! A node's world transform is the sum of its own `offset` and every
//! ancestor group's `offset`, shifted by the camera position and scaled by
//! the camera scale. Group rotation never reaches children. This is the one
//! placement used both for drawing and for mapping drag deltas back.

use crate::camera::CameraState;
use crate::id::NodeId;
use crate::model::{SceneGraph, Vec3};
use kurbo::{Point, Vec2};
use petgraph::graph::NodeIndex;

/// Resolved placement of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    /// Accumulated x offset plus camera x.
    pub x: f64,
    /// Accumulated y offset plus camera y.
    pub y: f64,
    /// Accumulated depth offset (no camera contribution).
    pub z: f64,
    /// Camera content scale, `200 / camera.z`.
    pub scale: f64,
}

impl WorldTransform {
    /// Node-local point → view space.
    pub fn to_view(&self, local: Point) -> Point {
        Point::new((local.x + self.x) * self.scale, (local.y + self.y) * self.scale)
    }

    /// View space → node-local point.
    pub fn to_local(&self, view: Point) -> Point {
        Point::new(view.x / self.scale - self.x, view.y / self.scale - self.y)
    }

    /// World-space delta → view-space delta.
    pub fn delta_to_view(&self, delta: Vec2) -> Vec2 {
        delta * self.scale
    }
}

fn compose(offset: Vec3, camera: &CameraState) -> WorldTransform {
    WorldTransform {
        x: offset.x + camera.position.x,
        y: offset.y + camera.position.y,
        z: offset.z,
        scale: camera.scale(),
    }
}

/// Resolve the placement of one node. `None` for unknown or malformed ids.
pub fn compute_world_transform(
    graph: &SceneGraph,
    camera: &CameraState,
    id: &str,
) -> Option<WorldTransform> {
    let idx = NodeId::lookup(id).and_then(|id| graph.index_of(id))?;
    Some(transform_of(graph, camera, idx))
}

pub fn transform_of(graph: &SceneGraph, camera: &CameraState, idx: NodeIndex) -> WorldTransform {
    let accumulated = graph
        .ancestors(idx)
        .into_iter()
        .map(|ancestor| graph.node(ancestor).offset)
        .fold(graph.node(idx).offset, |acc, offset| acc + offset);
    compose(accumulated, camera)
}

/// Every node's placement in document order, in one pass.
pub fn resolve_all(graph: &SceneGraph, camera: &CameraState) -> Vec<(NodeIndex, WorldTransform)> {
    let mut out = Vec::with_capacity(graph.len());
    let mut stack: Vec<(NodeIndex, Vec3)> = graph
        .children(graph.root)
        .into_iter()
        .rev()
        .map(|idx| (idx, Vec3::ZERO))
        .collect();
    while let Some((idx, inherited)) = stack.pop() {
        let accumulated = inherited + graph.node(idx).offset;
        out.push((idx, compose(accumulated, camera)));
        for child in graph.children(idx).into_iter().rev() {
            stack.push((child, accumulated));
        }
    }
    log::trace!("resolved {} transforms at scale {}", out.len(), camera.scale());
    out
}
