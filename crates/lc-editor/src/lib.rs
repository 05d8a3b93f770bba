//! Layer Canvas editor: the scene contract, its event subscriptions, and the
//! sync engine that keeps the layer panel and selection in step with it.

pub mod events;
pub mod props;
pub mod scene;
pub mod shapes;
pub mod sync;

pub use events::{EventBus, EventKind, Handler, SceneEvent, SubscriptionId};
pub use props::{CanvasSize, ObjectProps};
pub use scene::{MemoryScene, RenderedFrame, Scene};
pub use sync::SyncEngine;
