//! roimark core library
//!
//! Platform-agnostic interaction core for annotating elliptical regions of
//! interest over a displayed image. The host owns rendering, the editor
//! panel widgets, image loading, and timers; this crate owns the shape
//! records, the pointer state machine, and the JSON persistence contract.

pub mod annotator;
pub mod event;
pub mod gesture;
pub mod persist;
pub mod selection;
pub mod shape;
pub mod store;
pub mod surface;

pub use annotator::Annotator;
pub use event::Effect;
pub use gesture::{
    GestureEngine, HitTarget, LONG_PRESS_MS, LongPressToken, MIN_COMMIT_RADIUS, MOVE_THRESHOLD,
    PointerId, PointerInput, PointerKind,
};
pub use persist::ImportError;
pub use selection::SelectionBinder;
pub use shape::{Ellipse, EllipseGeometry, ShapeId, ShapeKind};
pub use store::ShapeStore;
pub use surface::SurfaceBounds;
