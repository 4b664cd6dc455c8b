//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and stylus events into a closed `InputEvent`
//! enum consumed by the gesture controller. What lies under the pointer
//! arrives as loosely-typed `TargetTags` (the host's element attributes or a
//! hit-test result) and is validated into a `Target` before use.

use kurbo::Point;
use vecta_core::id::NodeId;
use vecta_render::handles::{HandleKind, HandleRef};
use vecta_render::hit::Hit;

/// Identifies one contact (mouse, finger, pen) for its lifetime.
pub type PointerId = u32;

/// A normalized input event, positions in pointer space.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pencil contact).
    PointerDown {
        pointer_id: PointerId,
        position: Point,
        target: TargetTags,
    },

    /// Pointer moved.
    PointerMove { pointer_id: PointerId, position: Point },

    /// Pointer released.
    PointerUp { pointer_id: PointerId, position: Point },

    /// The host aborted the contact. Handled exactly like a release.
    PointerCancel { pointer_id: PointerId },

    /// Scroll wheel / trackpad scroll. Positive `delta` zooms out.
    Wheel { position: Point, delta: f64 },
}

impl InputEvent {
    pub fn down(pointer_id: PointerId, x: f64, y: f64, target: TargetTags) -> Self {
        Self::PointerDown {
            pointer_id,
            position: Point::new(x, y),
            target,
        }
    }

    pub fn moved(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerMove {
            pointer_id,
            position: Point::new(x, y),
        }
    }

    pub fn up(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerUp {
            pointer_id,
            position: Point::new(x, y),
        }
    }

    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { position, .. }
            | Self::PointerMove { position, .. }
            | Self::PointerUp { position, .. }
            | Self::Wheel { position, .. } => Some(*position),
            Self::PointerCancel { .. } => None,
        }
    }
}

/// Raw tags attached to the element under a pointer-down.
///
/// Mirrors what a host can read off its surface: a node id, or a handle
/// kind + point index + owner id, plus whether the owner is locked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTags {
    pub node: Option<String>,
    pub handle: Option<String>,
    pub index: Option<String>,
    pub owner: Option<String>,
    pub locked: bool,
}

/// A validated pointer-down target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Canvas,
    Object { id: NodeId, locked: bool },
    Handle { handle: HandleRef, locked: bool },
}

impl TargetTags {
    pub fn canvas() -> Self {
        Self::default()
    }

    pub fn node(id: &str) -> Self {
        Self {
            node: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn handle(kind: &str, index: usize, owner: &str) -> Self {
        Self {
            handle: Some(kind.to_string()),
            index: Some(index.to_string()),
            owner: Some(owner.to_string()),
            ..Self::default()
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Validate the tags. `None` means they are malformed and the event
    /// should be dropped.
    pub fn resolve(&self) -> Option<Target> {
        if let Some(kind) = &self.handle {
            let kind = HandleKind::parse(kind)?;
            let index = match (&self.index, kind) {
                (Some(raw), _) => raw.parse().ok()?,
                (None, HandleKind::Origin) => 0,
                (None, _) => return None,
            };
            let owner = self.owner.as_deref().or(self.node.as_deref())?;
            let owner = NodeId::parse(owner)?;
            return Some(Target::Handle {
                handle: HandleRef { kind, index, owner },
                locked: self.locked,
            });
        }
        match &self.node {
            Some(id) => Some(Target::Object {
                id: NodeId::parse(id)?,
                locked: self.locked,
            }),
            None => Some(Target::Canvas),
        }
    }
}

impl From<Hit> for TargetTags {
    fn from(hit: Hit) -> Self {
        match hit {
            Hit::Canvas => Self::canvas(),
            Hit::Object { id, locked } => Self {
                locked,
                ..Self::node(id.as_str())
            },
            Hit::Handle { handle, locked } => Self {
                locked,
                ..Self::handle(handle.kind.as_str(), handle.index, handle.owner.as_str())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_node_and_canvas() {
        assert_eq!(TargetTags::canvas().resolve(), Some(Target::Canvas));
        assert_eq!(
            TargetTags::node("torso").locked().resolve(),
            Some(Target::Object {
                id: NodeId::intern("torso"),
                locked: true
            })
        );
    }

    #[test]
    fn resolves_handles() {
        let target = TargetTags::handle("start", 3, "arm").resolve();
        assert_eq!(
            target,
            Some(Target::Handle {
                handle: HandleRef {
                    kind: HandleKind::Start,
                    index: 3,
                    owner: NodeId::intern("arm"),
                },
                locked: false,
            })
        );

        // Origin needs no index and may name its owner via `node`.
        let origin = TargetTags {
            handle: Some("origin".into()),
            node: Some("arm".into()),
            ..TargetTags::default()
        };
        assert_eq!(
            origin.resolve(),
            Some(Target::Handle {
                handle: HandleRef::origin(NodeId::intern("arm")),
                locked: false,
            })
        );
    }

    #[test]
    fn malformed_tags_resolve_to_none() {
        let missing_index = TargetTags {
            handle: Some("anchor".into()),
            owner: Some("arm".into()),
            ..TargetTags::default()
        };
        assert_eq!(missing_index.resolve(), None);
        assert_eq!(TargetTags::handle("corner", 0, "arm").resolve(), None);
        assert_eq!(TargetTags::handle("end", 0, "bad id").resolve(), None);
        assert_eq!(TargetTags::node("").resolve(), None);
        let bad_index = TargetTags {
            index: Some("-1".into()),
            ..TargetTags::handle("end", 0, "arm")
        };
        assert_eq!(bad_index.resolve(), None);
        let no_owner = TargetTags {
            owner: None,
            ..TargetTags::handle("end", 0, "arm")
        };
        assert_eq!(no_owner.resolve(), None);
    }

    #[test]
    fn hit_results_round_trip_through_tags() {
        let handle = HandleRef {
            kind: HandleKind::End,
            index: 2,
            owner: NodeId::intern("leg"),
        };
        let tags = TargetTags::from(Hit::Handle { handle, locked: true });
        assert_eq!(tags.resolve(), Some(Target::Handle { handle, locked: true }));
        assert_eq!(TargetTags::from(Hit::Canvas).resolve(), Some(Target::Canvas));
    }

    #[test]
    fn cancel_has_no_position() {
        assert_eq!(InputEvent::PointerCancel { pointer_id: 1 }.position(), None);
        assert_eq!(
            InputEvent::moved(1, 2.0, 3.0).position(),
            Some(Point::new(2.0, 3.0))
        );
    }
}
