//! Ordered collection of placed shapes.

use crate::shapes::{ShapeId, ShapeInstance, ShapeKind, ShapePatch};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// All shapes on the canvas, in insertion (and paint) order.
///
/// Shapes are never removed, so the shape with id `n` always lives at
/// index `n - 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeCollection {
    shapes: Vec<ShapeInstance>,
}

impl ShapeCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next added shape will receive.
    pub fn next_id(&self) -> ShapeId {
        ShapeId(self.shapes.len() as u32 + 1)
    }

    /// Add a shape of `kind` centered on `center` and return it.
    pub fn add_shape(&mut self, kind: ShapeKind, center: Point) -> &ShapeInstance {
        let id = self.next_id();
        log::debug!("Adding {:?} shape {} at ({:.1}, {:.1})", kind, id, center.x, center.y);
        let index = self.shapes.len();
        self.shapes.push(ShapeInstance::new(id, kind, center));
        &self.shapes[index]
    }

    /// Apply a patch to the shape with `id`.
    /// Returns false if no such shape exists or nothing changed.
    pub fn update_shape(&mut self, id: ShapeId, patch: ShapePatch) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                let changed = shape.apply(patch);
                if changed {
                    log::debug!("Updated shape {}", id);
                }
                changed
            }
            None => {
                log::warn!("Update for unknown shape {}", id);
                false
            }
        }
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeInstance> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.shapes.get(index).filter(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut ShapeInstance> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.shapes.get_mut(index).filter(|s| s.id == id)
    }

    /// Shapes in paint order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ShapeInstance> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Topmost shape under a point.
    pub fn shape_at_point(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(|s| s.id)
    }
}
