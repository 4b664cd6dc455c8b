//! Renderer-facing side of the editor core: frames for a drawing backend,
//! constant-size selection handles, and hit testing.

pub mod frame;
pub mod handles;
pub mod hit;
pub mod path;

pub use frame::{Frame, RenderItem, Renderer, build_frame};
pub use handles::{HandleKind, HandleRef, PlacedHandle};
pub use hit::{Hit, hit_test};
