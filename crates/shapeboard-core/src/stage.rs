//! Render-surface model: per-frame nodes, transformer handles and gestures.
//!
//! The stage mirrors the shape collection as a table of nodes rebuilt on
//! every [`Stage::sync`]. While a drag or transform gesture is active only
//! the node moves; the collection is touched when the gesture ends and the
//! editor commits the resulting [`StageEvent`].

use crate::collection::ShapeCollection;
use crate::selection::Selection;
use crate::shapes::{ShapeId, ShapeInstance};
use crate::transform::{BoundBox, NodeTransform, bound_box_guard};
use kurbo::{Affine, Point, Rect, Vec2};
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

/// Handle size in canvas units.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit radius in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Distance from the top edge to the rotation handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;
/// Pointer travel below which a press-release is a click.
pub const CLICK_DISTANCE: f64 = 3.0;
/// Extra hit slop around stroked shapes.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of transformer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Corner handle, resizes both axes.
    Corner(Corner),
    /// Edge midpoint handle, resizes one axis.
    Edge(Edge),
    /// Rotation handle above the top edge.
    Rotate,
}

impl HandleKind {
    pub const ALL: [HandleKind; 9] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Edge(Edge::Top),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Edge(Edge::Right),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Edge(Edge::Left),
        HandleKind::Rotate,
    ];

    /// Offset from the box center in half-extents, before rotation.
    fn unit_offset(self) -> (f64, f64) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (-1.0, -1.0),
            HandleKind::Corner(Corner::TopRight) => (1.0, -1.0),
            HandleKind::Corner(Corner::BottomLeft) => (-1.0, 1.0),
            HandleKind::Corner(Corner::BottomRight) => (1.0, 1.0),
            HandleKind::Edge(Edge::Top) => (0.0, -1.0),
            HandleKind::Edge(Edge::Right) => (1.0, 0.0),
            HandleKind::Edge(Edge::Bottom) => (0.0, 1.0),
            HandleKind::Edge(Edge::Left) => (-1.0, 0.0),
            HandleKind::Rotate => (0.0, -1.0),
        }
    }

    /// Which axes (x, y) this handle resizes.
    fn resize_axes(self) -> (bool, bool) {
        match self {
            HandleKind::Corner(_) => (true, true),
            HandleKind::Edge(Edge::Left | Edge::Right) => (true, false),
            HandleKind::Edge(Edge::Top | Edge::Bottom) => (false, true),
            HandleKind::Rotate => (false, false),
        }
    }
}

/// A transformer handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Per-frame display node for one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeHandle {
    pub shape_id: ShapeId,
    pub transform: NodeTransform,
    /// Unscaled geometry bounds in local coordinates.
    pub local_bounds: Rect,
    /// Resize both axes by the same factor.
    pub keep_ratio: bool,
}

impl NodeHandle {
    pub fn from_shape(shape: &ShapeInstance) -> Self {
        Self {
            shape_id: shape.id,
            transform: shape.node_transform(),
            local_bounds: shape.geometry.local_bounds(),
            keep_ratio: shape.geometry.keeps_aspect_ratio(),
        }
    }

    pub fn affine(&self) -> Affine {
        self.transform.affine()
    }

    /// Center of the node's box in canvas coordinates.
    pub fn box_center(&self) -> Point {
        self.affine() * self.local_bounds.center()
    }

    /// The node's oriented bounding box.
    pub fn bound_box(&self) -> BoundBox {
        let center = self.box_center();
        let width = self.local_bounds.width() * self.transform.scale.x.abs();
        let height = self.local_bounds.height() * self.transform.scale.y.abs();
        BoundBox {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
            rotation: self.transform.rotation,
        }
    }

    /// Transformer handles around this node, in canvas coordinates.
    pub fn handles(&self) -> Vec<Handle> {
        let center = self.box_center();
        let bbox = self.bound_box();
        let half_w = bbox.width / 2.0;
        let half_h = bbox.height / 2.0;
        let rotation = Affine::rotate(self.transform.rotation.to_radians());

        HandleKind::ALL
            .iter()
            .map(|&kind| {
                let (ux, uy) = kind.unit_offset();
                let mut offset = Vec2::new(ux * half_w, uy * half_h);
                if kind == HandleKind::Rotate {
                    offset.y -= ROTATE_HANDLE_OFFSET;
                }
                Handle::new(center + rotate_vec(rotation, offset), kind)
            })
            .collect()
    }

    /// Move the node so its box center lands on `center`.
    fn recenter(&mut self, center: Point) {
        let current = self.box_center();
        self.transform.position += center - current;
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty canvas.
    Stage,
    Shape(ShapeId),
    Handle(ShapeId, HandleKind),
}

/// Emitted when a gesture ends with real movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageEvent {
    DragEnd { id: ShapeId, position: Point },
    TransformEnd { id: ShapeId },
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    id: ShapeId,
    /// `None` for a body drag.
    handle: Option<HandleKind>,
    start: Point,
    origin: NodeTransform,
    moved: bool,
}

/// Node table, transformer attachment and active gesture.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    nodes: HashMap<ShapeId, NodeHandle>,
    transformer: Option<ShapeId>,
    gesture: Option<Gesture>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the node table from `shapes` and attach the transformer to
    /// the selected shape. A node under an active gesture keeps its live
    /// transform.
    pub fn sync(&mut self, shapes: &ShapeCollection, selection: &Selection) {
        let live = self
            .gesture
            .and_then(|g| self.nodes.get(&g.id).copied());

        self.nodes = shapes
            .iter()
            .map(|shape| (shape.id, NodeHandle::from_shape(shape)))
            .collect();

        if let Some(node) = live {
            self.nodes.insert(node.shape_id, node);
        }

        self.transformer = selection
            .selected()
            .filter(|id| self.nodes.contains_key(id));
    }

    pub fn node(&self, id: ShapeId) -> Option<&NodeHandle> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: ShapeId) -> Option<&mut NodeHandle> {
        self.nodes.get_mut(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Shape the transformer is attached to.
    pub fn transformer(&self) -> Option<ShapeId> {
        self.transformer
    }

    /// Handles of the transformer, empty when detached.
    pub fn transformer_handles(&self) -> Vec<Handle> {
        self.transformer
            .and_then(|id| self.nodes.get(&id))
            .map(NodeHandle::handles)
            .unwrap_or_default()
    }

    pub fn is_gesturing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Resolve a canvas point to a handle, a shape, or empty stage.
    pub fn hit(&self, point: Point, shapes: &ShapeCollection) -> HitTarget {
        if let Some(id) = self.transformer {
            if let Some(handle) = self
                .transformer_handles()
                .into_iter()
                .find(|h| h.hit_test(point, HANDLE_HIT_TOLERANCE))
            {
                return HitTarget::Handle(id, handle.kind);
            }
        }

        shapes
            .shape_at_point(point, HIT_TOLERANCE)
            .map_or(HitTarget::Stage, HitTarget::Shape)
    }

    /// Start dragging the body of a shape.
    pub fn begin_drag(&mut self, id: ShapeId, point: Point) -> bool {
        self.begin(id, None, point)
    }

    /// Start a transform gesture on a transformer handle.
    pub fn begin_transform(&mut self, id: ShapeId, handle: HandleKind, point: Point) -> bool {
        self.begin(id, Some(handle), point)
    }

    fn begin(&mut self, id: ShapeId, handle: Option<HandleKind>, point: Point) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        self.gesture = Some(Gesture {
            id,
            handle,
            start: point,
            origin: node.transform,
            moved: false,
        });
        true
    }

    /// Move the active gesture to `point`, updating its node.
    pub fn update_gesture(&mut self, point: Point) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if !gesture.moved && (point - gesture.start).hypot() < CLICK_DISTANCE {
            return;
        }
        gesture.moved = true;
        let gesture = *gesture;

        let Some(node) = self.nodes.get_mut(&gesture.id) else {
            return;
        };
        match gesture.handle {
            None => {
                node.transform.position = gesture.origin.position + (point - gesture.start);
            }
            Some(HandleKind::Rotate) => rotate_node(node, gesture.origin, point),
            Some(kind) => resize_node(node, gesture.origin, kind, point),
        }
    }

    /// Finish the active gesture.
    ///
    /// Returns `None` when there was no gesture or the pointer never left the
    /// click threshold; the node is then restored.
    pub fn end_gesture(&mut self) -> Option<StageEvent> {
        let gesture = self.gesture.take()?;
        let node = self.nodes.get_mut(&gesture.id)?;
        if !gesture.moved {
            node.transform = gesture.origin;
            return None;
        }
        Some(match gesture.handle {
            None => StageEvent::DragEnd {
                id: gesture.id,
                position: node.transform.position,
            },
            Some(_) => StageEvent::TransformEnd { id: gesture.id },
        })
    }

    /// Abort the active gesture and restore its node.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            if let Some(node) = self.nodes.get_mut(&gesture.id) {
                node.transform = gesture.origin;
            }
        }
    }
}

fn rotate_vec(rotation: Affine, v: Vec2) -> Vec2 {
    (rotation * v.to_point()).to_vec2()
}

/// Point the node's top at `point`, keeping its box center fixed.
fn rotate_node(node: &mut NodeHandle, origin: NodeTransform, point: Point) {
    let mut start = *node;
    start.transform = origin;
    let center = start.box_center();

    let d = point - center;
    let angle = d.y.atan2(d.x) + FRAC_PI_2;

    node.transform = NodeTransform {
        rotation: angle.to_degrees(),
        ..origin
    };
    node.recenter(center);
}

/// Centered resize: the dragged handle follows the pointer and the box
/// center stays put.
fn resize_node(node: &mut NodeHandle, origin: NodeTransform, kind: HandleKind, point: Point) {
    let mut start = *node;
    start.transform = origin;
    let center = start.box_center();
    let start_box = start.bound_box();

    let unrotate = Affine::rotate(-origin.rotation.to_radians());
    let d = rotate_vec(unrotate, point - center);
    let (resize_x, resize_y) = kind.resize_axes();

    let mut proposed = BoundBox {
        width: if resize_x { 2.0 * d.x.abs() } else { start_box.width },
        height: if resize_y { 2.0 * d.y.abs() } else { start_box.height },
        ..start_box
    };
    if node.keep_ratio && start_box.width > f64::EPSILON && start_box.height > f64::EPSILON {
        // The larger of the dragged axes drives both
        let fx = proposed.width / start_box.width;
        let fy = proposed.height / start_box.height;
        let factor = match (resize_x, resize_y) {
            (true, false) => fx,
            (false, true) => fy,
            _ => fx.max(fy),
        };
        proposed.width = start_box.width * factor;
        proposed.height = start_box.height * factor;
    }
    let proposed = BoundBox {
        x: center.x - proposed.width / 2.0,
        y: center.y - proposed.height / 2.0,
        ..proposed
    };

    let current = node.bound_box();
    let accepted = bound_box_guard(current, proposed);
    if accepted == current {
        return;
    }

    let local = node.local_bounds;
    let scale_x = if local.width() > f64::EPSILON {
        accepted.width / local.width()
    } else {
        origin.scale.x
    };
    let scale_y = if local.height() > f64::EPSILON {
        accepted.height / local.height()
    } else {
        origin.scale.y
    };

    node.transform = NodeTransform {
        scale: Vec2::new(scale_x, scale_y),
        ..origin
    };
    node.recenter(center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn setup(kind: ShapeKind, at: Point) -> (ShapeCollection, Selection, Stage) {
        let mut shapes = ShapeCollection::new();
        let id = shapes.add_shape(kind, at).id;
        let mut selection = Selection::new();
        selection.click(Some(id));
        let mut stage = Stage::new();
        stage.sync(&shapes, &selection);
        (shapes, selection, stage)
    }

    fn handle_pos(stage: &Stage, kind: HandleKind) -> Point {
        stage
            .transformer_handles()
            .into_iter()
            .find(|h| h.kind == kind)
            .map(|h| h.position)
            .unwrap()
    }

    #[test]
    fn test_sync_builds_nodes_and_transformer() {
        let (shapes, _, stage) = setup(ShapeKind::Circle, Point::new(100.0, 100.0));
        assert_eq!(stage.node_count(), shapes.len());
        assert_eq!(stage.transformer(), Some(ShapeId(1)));
        assert_eq!(stage.transformer_handles().len(), 9);
    }

    #[test]
    fn test_sync_without_selection_detaches() {
        let (shapes, _, mut stage) = setup(ShapeKind::Circle, Point::ZERO);
        stage.sync(&shapes, &Selection::new());
        assert!(stage.transformer().is_none());
        assert!(stage.transformer_handles().is_empty());
    }

    #[test]
    fn test_handle_positions() {
        let (_, _, stage) = setup(ShapeKind::Rect, Point::new(100.0, 100.0));
        let br = handle_pos(&stage, HandleKind::Corner(Corner::BottomRight));
        assert!((br.x - 200.0).abs() < 1e-9);
        assert!((br.y - 180.0).abs() < 1e-9);
        let rotate = handle_pos(&stage, HandleKind::Rotate);
        assert!((rotate.x - 150.0).abs() < 1e-9);
        assert!((rotate.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_priorities() {
        let (shapes, _, stage) = setup(ShapeKind::Rect, Point::new(100.0, 100.0));
        assert_eq!(
            stage.hit(Point::new(200.0, 180.0), &shapes),
            HitTarget::Handle(ShapeId(1), HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            stage.hit(Point::new(150.0, 140.0), &shapes),
            HitTarget::Shape(ShapeId(1))
        );
        assert_eq!(stage.hit(Point::new(400.0, 400.0), &shapes), HitTarget::Stage);
    }

    #[test]
    fn test_drag_gesture() {
        let (_, _, mut stage) = setup(ShapeKind::Circle, Point::new(100.0, 100.0));
        assert!(stage.begin_drag(ShapeId(1), Point::new(100.0, 100.0)));
        stage.update_gesture(Point::new(130.0, 110.0));
        assert_eq!(
            stage.end_gesture(),
            Some(StageEvent::DragEnd {
                id: ShapeId(1),
                position: Point::new(130.0, 110.0)
            })
        );
        assert!(!stage.is_gesturing());
    }

    #[test]
    fn test_small_movement_is_click() {
        let (_, _, mut stage) = setup(ShapeKind::Circle, Point::new(100.0, 100.0));
        stage.begin_drag(ShapeId(1), Point::new(100.0, 100.0));
        stage.update_gesture(Point::new(101.0, 101.0));
        assert_eq!(stage.end_gesture(), None);
        let node = stage.node(ShapeId(1)).unwrap();
        assert_eq!(node.transform.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_sync_keeps_live_node() {
        let (shapes, selection, mut stage) = setup(ShapeKind::Circle, Point::new(100.0, 100.0));
        stage.begin_drag(ShapeId(1), Point::new(100.0, 100.0));
        stage.update_gesture(Point::new(150.0, 100.0));
        stage.sync(&shapes, &selection);
        let node = stage.node(ShapeId(1)).unwrap();
        assert_eq!(node.transform.position, Point::new(150.0, 100.0));
    }

    #[test]
    fn test_centered_corner_resize() {
        let (_, _, mut stage) = setup(ShapeKind::Circle, Point::new(100.0, 100.0));
        let handle = HandleKind::Corner(Corner::BottomRight);
        let start = handle_pos(&stage, handle);
        stage.begin_transform(ShapeId(1), handle, start);
        stage.update_gesture(Point::new(160.0, 130.0));

        // Circles stay round: the wider axis wins
        let node = *stage.node(ShapeId(1)).unwrap();
        assert!((node.transform.scale.x - 2.0).abs() < 1e-9);
        assert!((node.transform.scale.y - 2.0).abs() < 1e-9);
        assert!((node.box_center().x - 100.0).abs() < 1e-9);
        assert!((node.box_center().y - 100.0).abs() < 1e-9);
        assert_eq!(stage.end_gesture(), Some(StageEvent::TransformEnd { id: ShapeId(1) }));
    }

    #[test]
    fn test_rect_resize_keeps_center() {
        let (_, _, mut stage) = setup(ShapeKind::Rect, Point::new(100.0, 100.0));
        let handle = HandleKind::Edge(Edge::Right);
        let start = handle_pos(&stage, handle);
        stage.begin_transform(ShapeId(1), handle, start);
        stage.update_gesture(Point::new(250.0, 140.0));

        let node = *stage.node(ShapeId(1)).unwrap();
        assert!((node.transform.scale.x - 2.0).abs() < 1e-9);
        assert!((node.transform.scale.y - 1.0).abs() < 1e-9);
        assert!((node.box_center().x - 150.0).abs() < 1e-9);
        assert!((node.transform.position.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_below_minimum_keeps_previous_box() {
        // 100x80 rect centered on (150, 140)
        let (_, _, mut stage) = setup(ShapeKind::Rect, Point::new(100.0, 100.0));
        let handle = HandleKind::Corner(Corner::BottomRight);
        let start = handle_pos(&stage, handle);
        stage.begin_transform(ShapeId(1), handle, start);
        stage.update_gesture(Point::new(190.0, 170.0));
        let before = *stage.node(ShapeId(1)).unwrap();
        assert!((before.bound_box().width - 80.0).abs() < 1e-9);

        stage.update_gesture(Point::new(152.0, 170.0));
        assert_eq!(*stage.node(ShapeId(1)).unwrap(), before);
    }

    #[test]
    fn test_radial_edge_resize_is_uniform() {
        for kind in [ShapeKind::Circle, ShapeKind::RegularPolygon, ShapeKind::Star] {
            let (_, _, mut stage) = setup(kind, Point::new(100.0, 100.0));
            let start_box = stage.node(ShapeId(1)).unwrap().bound_box();
            let handle = HandleKind::Edge(Edge::Bottom);
            let start = handle_pos(&stage, handle);
            stage.begin_transform(ShapeId(1), handle, start);
            stage.update_gesture(start + Vec2::new(0.0, 20.0));

            let node = *stage.node(ShapeId(1)).unwrap();
            assert!((node.transform.scale.x - node.transform.scale.y).abs() < 1e-9);
            assert!(node.transform.scale.y > 1.0);
            let live = node.bound_box();
            let ratio = start_box.width / start_box.height;
            assert!((live.width / live.height - ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotate_gesture() {
        let (_, _, mut stage) = setup(ShapeKind::Circle, Point::new(100.0, 100.0));
        let start = handle_pos(&stage, HandleKind::Rotate);
        stage.begin_transform(ShapeId(1), HandleKind::Rotate, start);
        stage.update_gesture(Point::new(200.0, 100.0));

        let node = *stage.node(ShapeId(1)).unwrap();
        assert!((node.transform.rotation - 90.0).abs() < 1e-9);
        assert!((node.box_center().x - 100.0).abs() < 1e-9);
        assert!((node.box_center().y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_gesture_restores() {
        let (_, _, mut stage) = setup(ShapeKind::Star, Point::new(100.0, 100.0));
        stage.begin_drag(ShapeId(1), Point::new(100.0, 100.0));
        stage.update_gesture(Point::new(300.0, 300.0));
        stage.cancel_gesture();
        assert_eq!(
            stage.node(ShapeId(1)).unwrap().transform.position,
            Point::new(100.0, 100.0)
        );
        assert_eq!(stage.end_gesture(), None);
    }

    #[test]
    fn test_begin_on_missing_node() {
        let mut stage = Stage::new();
        assert!(!stage.begin_drag(ShapeId(1), Point::ZERO));
    }
}
