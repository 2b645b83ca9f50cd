//! Per-kind shape geometry in local coordinates.
//!
//! Local coordinates put the shape's anchor at the origin. `Rect` grows
//! right and down from its anchor (top-left corner); every other kind is
//! centered on it.

use super::ShapeKind;
use kurbo::{BezPath, Circle, Ellipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Flattening tolerance for curve paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Geometry payload for each shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeGeometry {
    Rect {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Ellipse {
        radius_x: f64,
        radius_y: f64,
    },
    /// Open polyline through `points`, relative to the anchor.
    Line {
        points: Vec<Point>,
    },
    RegularPolygon {
        sides: u32,
        radius: f64,
    },
    Star {
        num_points: u32,
        inner_radius: f64,
        outer_radius: f64,
    },
}

impl ShapeGeometry {
    /// Default geometry for a newly created shape of the given kind.
    pub fn preset(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rect => ShapeGeometry::Rect {
                width: 100.0,
                height: 80.0,
            },
            ShapeKind::Circle => ShapeGeometry::Circle { radius: 30.0 },
            ShapeKind::Ellipse => ShapeGeometry::Ellipse {
                radius_x: 70.0,
                radius_y: 40.0,
            },
            ShapeKind::Line => ShapeGeometry::Line {
                points: vec![
                    Point::new(-50.0, 0.0),
                    Point::new(0.0, 50.0),
                    Point::new(50.0, 0.0),
                ],
            },
            ShapeKind::RegularPolygon => ShapeGeometry::RegularPolygon {
                sides: 5,
                radius: 40.0,
            },
            ShapeKind::Star => ShapeGeometry::Star {
                num_points: 5,
                inner_radius: 20.0,
                outer_radius: 40.0,
            },
        }
    }

    /// The kind tag this geometry belongs to.
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Rect { .. } => ShapeKind::Rect,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
            ShapeGeometry::Ellipse { .. } => ShapeKind::Ellipse,
            ShapeGeometry::Line { .. } => ShapeKind::Line,
            ShapeGeometry::RegularPolygon { .. } => ShapeKind::RegularPolygon,
            ShapeGeometry::Star { .. } => ShapeKind::Star,
        }
    }

    /// Whether the interior is part of the shape (everything except lines).
    pub fn is_closed(&self) -> bool {
        !matches!(self, ShapeGeometry::Line { .. })
    }

    /// Radially symmetric kinds resize uniformly.
    pub fn keeps_aspect_ratio(&self) -> bool {
        matches!(
            self,
            ShapeGeometry::Circle { .. }
                | ShapeGeometry::RegularPolygon { .. }
                | ShapeGeometry::Star { .. }
        )
    }

    /// Outline path in local coordinates.
    pub fn to_path(&self) -> BezPath {
        match self {
            ShapeGeometry::Rect { width, height } => {
                Rect::new(0.0, 0.0, *width, *height).to_path(PATH_TOLERANCE)
            }
            ShapeGeometry::Circle { radius } => {
                Circle::new(Point::ZERO, *radius).to_path(PATH_TOLERANCE)
            }
            ShapeGeometry::Ellipse { radius_x, radius_y } => {
                Ellipse::new(Point::ZERO, (*radius_x, *radius_y), 0.0).to_path(PATH_TOLERANCE)
            }
            ShapeGeometry::Line { points } => polyline(points, false),
            ShapeGeometry::RegularPolygon { sides, radius } => {
                polyline(&regular_polygon_points(*sides, *radius), true)
            }
            ShapeGeometry::Star {
                num_points,
                inner_radius,
                outer_radius,
            } => polyline(
                &star_points(*num_points, *inner_radius, *outer_radius),
                true,
            ),
        }
    }

    /// Bounding box in local coordinates.
    pub fn local_bounds(&self) -> Rect {
        match self {
            ShapeGeometry::Rect { width, height } => Rect::new(0.0, 0.0, *width, *height),
            ShapeGeometry::Circle { radius } => {
                Rect::new(-radius, -radius, *radius, *radius)
            }
            ShapeGeometry::Ellipse { radius_x, radius_y } => {
                Rect::new(-radius_x, -radius_y, *radius_x, *radius_y)
            }
            ShapeGeometry::Line { points } => points_bounds(points),
            ShapeGeometry::RegularPolygon { sides, radius } => {
                points_bounds(&regular_polygon_points(*sides, *radius))
            }
            ShapeGeometry::Star {
                num_points,
                inner_radius,
                outer_radius,
            } => points_bounds(&star_points(*num_points, *inner_radius, *outer_radius)),
        }
    }

    /// Check if a local point hits this geometry.
    ///
    /// Closed shapes hit on their interior; lines hit within `tolerance`
    /// plus half the stroke width of the polyline.
    pub fn hit_test_local(&self, point: Point, tolerance: f64, stroke_width: f64) -> bool {
        match self {
            ShapeGeometry::Line { points } => {
                point_to_polyline_dist(point, points) <= tolerance + stroke_width / 2.0
            }
            _ => self.to_path().contains(point),
        }
    }

    /// Bake a scale factor into the geometry's size.
    ///
    /// Axis-aligned kinds scale per axis. Radially symmetric kinds (circle,
    /// regular polygon, star) scale by the mean of both factors; the
    /// transformer keeps those factors equal.
    pub fn scaled(&self, scale: Vec2) -> Self {
        let sx = scale.x.abs();
        let sy = scale.y.abs();
        let mean = (sx + sy) / 2.0;
        match self {
            ShapeGeometry::Rect { width, height } => ShapeGeometry::Rect {
                width: width * sx,
                height: height * sy,
            },
            ShapeGeometry::Circle { radius } => ShapeGeometry::Circle {
                radius: radius * mean,
            },
            ShapeGeometry::Ellipse { radius_x, radius_y } => ShapeGeometry::Ellipse {
                radius_x: radius_x * sx,
                radius_y: radius_y * sy,
            },
            ShapeGeometry::Line { points } => ShapeGeometry::Line {
                points: points
                    .iter()
                    .map(|p| Point::new(p.x * sx, p.y * sy))
                    .collect(),
            },
            ShapeGeometry::RegularPolygon { sides, radius } => ShapeGeometry::RegularPolygon {
                sides: *sides,
                radius: radius * mean,
            },
            ShapeGeometry::Star {
                num_points,
                inner_radius,
                outer_radius,
            } => ShapeGeometry::Star {
                num_points: *num_points,
                inner_radius: inner_radius * mean,
                outer_radius: outer_radius * mean,
            },
        }
    }
}

/// Vertices of a regular polygon, first vertex straight up.
pub fn regular_polygon_points(sides: u32, radius: f64) -> Vec<Point> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| polar(radius, TAU * f64::from(i) / f64::from(sides)))
        .collect()
}

/// Vertices of a star alternating outer and inner radius, first tip straight up.
pub fn star_points(num_points: u32, inner_radius: f64, outer_radius: f64) -> Vec<Point> {
    let num_points = num_points.max(2);
    (0..num_points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            polar(radius, PI * f64::from(i) / f64::from(num_points))
        })
        .collect()
}

/// Point at `radius` from the origin, `angle` radians clockwise from up.
fn polar(radius: f64, angle: f64) -> Point {
    Point::new(radius * angle.sin(), -radius * angle.cos())
}

fn polyline(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |acc, p| {
        acc.union_pt(*p)
    })
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
