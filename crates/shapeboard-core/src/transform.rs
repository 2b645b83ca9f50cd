//! Node transforms and drag/transform commit logic.

use crate::collection::ShapeCollection;
use crate::shapes::{ShapeId, ShapePatch};
use kurbo::{Affine, Point, Vec2};

/// Smallest width or height a transform may produce.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// Position, rotation and scale of a displayed node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Point,
    /// Degrees, clockwise on screen.
    pub rotation: f64,
    pub scale: Vec2,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl NodeTransform {
    /// Local to canvas transform: scale, then rotate, then translate.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    pub fn is_unit_scale(&self) -> bool {
        (self.scale.x - 1.0).abs() < f64::EPSILON && (self.scale.y - 1.0).abs() < f64::EPSILON
    }

    pub fn reset_scale(&mut self) {
        self.scale = Vec2::new(1.0, 1.0);
    }
}

/// Oriented bounding box proposed during a transform gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees.
    pub rotation: f64,
}

/// Reject boxes narrower or shorter than [`MIN_BOX_SIZE`], keeping `old`.
pub fn bound_box_guard(old: BoundBox, new: BoundBox) -> BoundBox {
    if new.width.abs() < MIN_BOX_SIZE || new.height.abs() < MIN_BOX_SIZE {
        log::debug!(
            "Rejected {:.1}x{:.1} box below minimum size",
            new.width,
            new.height
        );
        old
    } else {
        new
    }
}

/// Commit the end of a drag: store the node's new position.
pub fn commit_drag(shapes: &mut ShapeCollection, id: ShapeId, position: Point) -> bool {
    shapes.update_shape(id, ShapePatch::new().position(position))
}

/// Commit the end of a transform.
///
/// Bakes the node's scale into the shape geometry, stores position and
/// rotation, records a unit scale, then resets the node's scale to (1,1).
pub fn commit_transform(shapes: &mut ShapeCollection, id: ShapeId, node: &mut NodeTransform) -> bool {
    let Some(shape) = shapes.get(id) else {
        log::warn!("Transform end for unknown shape {}", id);
        return false;
    };
    let geometry = shape.geometry.scaled(node.scale);
    let patch = ShapePatch::new()
        .position(node.position)
        .rotation(node.rotation)
        .scale(Vec2::new(1.0, 1.0))
        .geometry(geometry);
    node.reset_scale();
    shapes.update_shape(id, patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ShapeGeometry, ShapeKind};

    fn bbox(width: f64, height: f64) -> BoundBox {
        BoundBox {
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_identity_affine() {
        let node = NodeTransform::default();
        assert_eq!(node.affine(), Affine::IDENTITY);
        assert!(node.is_unit_scale());
    }

    #[test]
    fn test_affine_order() {
        let node = NodeTransform {
            position: Point::new(10.0, 0.0),
            rotation: 90.0,
            scale: Vec2::new(2.0, 1.0),
        };
        let p = node.affine() * Point::new(1.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_guard_rejects_small_boxes() {
        let old = bbox(50.0, 50.0);
        assert_eq!(bound_box_guard(old, bbox(4.0, 50.0)), old);
        assert_eq!(bound_box_guard(old, bbox(50.0, 4.9)), old);
        assert_eq!(bound_box_guard(old, bbox(5.0, 5.0)), bbox(5.0, 5.0));
    }

    #[test]
    fn test_commit_drag() {
        let mut shapes = ShapeCollection::new();
        let id = shapes.add_shape(ShapeKind::Rect, Point::ZERO).id;
        assert!(commit_drag(&mut shapes, id, Point::new(30.0, 40.0)));
        let shape = shapes.get(id).unwrap();
        assert_eq!(shape.position, Point::new(30.0, 40.0));
        assert!(shape.scale.is_none());
    }

    #[test]
    fn test_commit_transform_bakes_scale() {
        let mut shapes = ShapeCollection::new();
        let id = shapes.add_shape(ShapeKind::Rect, Point::new(100.0, 100.0)).id;
        let mut node = NodeTransform {
            position: Point::new(90.0, 95.0),
            rotation: 30.0,
            scale: Vec2::new(2.0, 1.5),
        };

        assert!(commit_transform(&mut shapes, id, &mut node));
        assert!(node.is_unit_scale());

        let shape = shapes.get(id).unwrap();
        assert_eq!(shape.position, Point::new(90.0, 95.0));
        assert!((shape.rotation - 30.0).abs() < f64::EPSILON);
        assert_eq!(shape.scale, Some(Vec2::new(1.0, 1.0)));
        assert_eq!(
            shape.geometry,
            ShapeGeometry::Rect {
                width: 200.0,
                height: 120.0
            }
        );
    }

    #[test]
    fn test_unit_transform_is_noop() {
        let mut shapes = ShapeCollection::new();
        let id = shapes.add_shape(ShapeKind::Ellipse, Point::new(100.0, 100.0)).id;
        let mut node = NodeTransform {
            position: Point::new(100.0, 100.0),
            rotation: 0.0,
            scale: Vec2::new(2.0, 1.5),
        };
        commit_transform(&mut shapes, id, &mut node);
        let before = shapes.get(id).cloned();

        assert!(!commit_transform(&mut shapes, id, &mut node));
        assert_eq!(shapes.get(id).cloned(), before);
    }

    #[test]
    fn test_commit_transform_unknown_shape() {
        let mut shapes = ShapeCollection::new();
        let mut node = NodeTransform {
            scale: Vec2::new(2.0, 2.0),
            ..Default::default()
        };
        assert!(!commit_transform(&mut shapes, ShapeId(7), &mut node));
        assert!(!node.is_unit_scale());
    }
}
