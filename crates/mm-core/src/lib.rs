pub mod clock;
pub mod id;
pub mod layout;
pub mod model;
pub mod validate;
pub mod viewport;

pub use clock::{Clock, SystemClock, Timestamp};
pub use id::{AnonymousIds, IdSource, NodeId, SequentialIds};
pub use layout::{LayoutConfig, compute_layout};
pub use model::*;
pub use viewport::{Bounds, Point, Viewport, compute_fit_offset, ensure_visible};
