//! Shapeboard Core Library
//!
//! Platform-agnostic shape model, selection and transform logic for the
//! Shapeboard editor.

pub mod catalog;
pub mod collection;
pub mod editor;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod stage;
pub mod transform;
pub mod viewport;

pub use catalog::{Catalog, CatalogError, ShapeTemplate};
pub use collection::ShapeCollection;
pub use editor::Editor;
pub use input::{InputState, Modifiers};
pub use selection::{Selection, SelectionRect, SelectionState, rubber_band_hit, shapes_in_rect};
pub use shapes::{
    SerializableColor, ShapeGeometry, ShapeId, ShapeInstance, ShapeKind, ShapePatch, ShapeStyle,
};
pub use stage::{Handle, HandleKind, HitTarget, NodeHandle, Stage, StageEvent};
pub use transform::{BoundBox, MIN_BOX_SIZE, NodeTransform, bound_box_guard};
pub use viewport::{SubscriptionId, Viewport, ViewportConfig};
