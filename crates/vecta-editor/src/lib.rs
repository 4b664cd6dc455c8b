//! Interactive side of the editor core: input normalization, gesture
//! recognition, the observable scene store, and the session that ties them
//! to the camera and a renderer.

pub mod gesture;
pub mod input;
pub mod persist;
pub mod session;
pub mod store;

pub use gesture::{GestureController, GestureEvent, GestureState, ViewContext};
pub use input::{InputEvent, PointerId, Target, TargetTags};
pub use persist::{Clock, ManualClock, MemoryStore, PersistError, Persistence, SystemClock};
pub use session::EditorSession;
pub use store::{SceneChange, SceneStore, SubscriptionId};
