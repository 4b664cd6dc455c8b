pub mod camera;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod record;
pub mod space;
pub mod transform;

pub use camera::{Camera, CameraState, REFERENCE_ZOOM};
pub use config::EditorConfig;
pub use error::SceneError;
pub use id::NodeId;
pub use model::*;
pub use record::{NodeRecord, RecordKind};
pub use space::Viewport;
pub use transform::{WorldTransform, compute_world_transform, resolve_all};

// Re-export petgraph/kurbo types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size, Vec2};
pub use petgraph::graph::NodeIndex;
