//! Selection handles.
//!
//! Handles sit at view-space positions derived from the node's world
//! transform, but their radius comes from the viewport's handle zoom scale
//! (reference size ÷ on-screen content size), never from the camera scale.
//! That keeps them the same size on screen at any content zoom.

use crate::path::control_points;
use kurbo::Point;
use vecta_core::id::NodeId;
use vecta_core::model::SceneGraph;
use vecta_core::space::Viewport;
use vecta_core::transform::WorldTransform;

/// What a handle controls on its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// The node's own offset.
    Origin,
    /// A path point's anchor.
    Anchor,
    /// A path point's incoming control offset.
    Start,
    /// A path point's outgoing control offset.
    End,
}

impl HandleKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "origin" => Some(Self::Origin),
            "anchor" => Some(Self::Anchor),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Anchor => "anchor",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Identifies one draggable handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleRef {
    pub kind: HandleKind,
    /// Path point index; always 0 for `Origin`.
    pub index: usize,
    pub owner: NodeId,
}

impl HandleRef {
    pub fn origin(owner: NodeId) -> Self {
        Self {
            kind: HandleKind::Origin,
            index: 0,
            owner,
        }
    }
}

/// A handle placed in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedHandle {
    pub handle: HandleRef,
    pub center: Point,
    /// Radius in view units.
    pub radius: f64,
}

impl PlacedHandle {
    pub fn contains(&self, view: Point) -> bool {
        self.center.distance(view) <= self.radius
    }
}

/// Handle radius in view units for a given screen-pixel size.
pub fn handle_radius(viewport: &Viewport, size_px: f64) -> f64 {
    size_px * viewport.handle_zoom_scale()
}

/// Lay out every handle of `owner`, drawn back to front.
///
/// Groups only get an origin handle; objects also get anchor and control
/// handles per path point. Returns an empty list for unknown ids.
pub fn place_handles(
    graph: &SceneGraph,
    owner: NodeId,
    transform: &WorldTransform,
    radius: f64,
) -> Vec<PlacedHandle> {
    let Some(node) = graph.find_in_groups(owner.as_str()) else {
        return Vec::new();
    };
    let place = |handle: HandleRef, local: Point| PlacedHandle {
        handle,
        center: transform.to_view(local),
        radius,
    };

    let mut out = vec![place(HandleRef::origin(owner), Point::ORIGIN)];
    if node.is_group() {
        return out;
    }
    for (index, point) in node.geometry.iter().enumerate() {
        let at = |kind| HandleRef { kind, index, owner };
        let (start, end) = control_points(point);
        if let Some(start) = start {
            out.push(place(at(HandleKind::Start), start));
        }
        if let Some(end) = end {
            out.push(place(at(HandleKind::End), end));
        }
        out.push(place(at(HandleKind::Anchor), point.anchor()));
    }
    out
}
