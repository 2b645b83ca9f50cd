//! Shape definitions for the editor.

mod geometry;
mod style;

pub use geometry::{
    ShapeGeometry, point_to_polyline_dist, point_to_segment_dist, regular_polygon_points,
    star_points,
};
pub use style::{SerializableColor, ShapeStyle};

use crate::transform::NodeTransform;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six shape kinds the editor can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    RegularPolygon,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Rect,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Line,
        ShapeKind::RegularPolygon,
        ShapeKind::Star,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rect => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Line => "Line",
            ShapeKind::RegularPolygon => "Regular Polygon",
            ShapeKind::Star => "Star",
        }
    }
}

/// Identifier of a placed shape. Sequential, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shape placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeInstance {
    pub id: ShapeId,
    pub geometry: ShapeGeometry,
    /// Anchor position in canvas coordinates.
    pub position: Point,
    /// Rotation about the anchor, in degrees.
    pub rotation: f64,
    /// Last committed scale. `None` until the first transform.
    pub scale: Option<Vec2>,
    pub style: ShapeStyle,
}

impl ShapeInstance {
    /// Create a shape of `kind` with its preset geometry and style.
    pub fn new(id: ShapeId, kind: ShapeKind, position: Point) -> Self {
        Self {
            id,
            geometry: ShapeGeometry::preset(kind),
            position,
            rotation: 0.0,
            scale: None,
            style: ShapeStyle::preset(kind),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Transform of the node that displays this shape.
    pub fn node_transform(&self) -> NodeTransform {
        NodeTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale.unwrap_or(Vec2::new(1.0, 1.0)),
        }
    }

    /// Local to canvas transform.
    pub fn affine(&self) -> Affine {
        self.node_transform().affine()
    }

    /// Check if a canvas point hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.affine().inverse() * point;
        self.geometry
            .hit_test_local(local, tolerance, self.style.stroke_width)
    }

    /// Apply a partial update. Returns true if anything changed.
    pub fn apply(&mut self, patch: ShapePatch) -> bool {
        let before = self.clone();
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = Some(scale);
        }
        if let Some(geometry) = patch.geometry {
            if geometry.kind() == self.kind() {
                self.geometry = geometry;
            } else {
                log::warn!(
                    "Ignoring {:?} geometry for shape {} of kind {:?}",
                    geometry.kind(),
                    self.id,
                    self.kind()
                );
            }
        }
        *self != before
    }
}

/// Partial update to a shape's transform or geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub position: Option<Point>,
    pub rotation: Option<f64>,
    pub scale: Option<Vec2>,
    pub geometry: Option<ShapeGeometry>,
}

impl ShapePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn scale(mut self, scale: Vec2) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn geometry(mut self, geometry: ShapeGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.geometry.is_none()
    }
}
