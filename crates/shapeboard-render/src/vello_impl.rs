//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Rect, Shape as KurboShape, Stroke};
use peniko::{Color, Fill};
use shapeboard_core::selection::SelectionRect;
use shapeboard_core::shapes::{ShapeGeometry, ShapeInstance};
use shapeboard_core::stage::{Corner, HANDLE_SIZE, Handle, HandleKind, NodeHandle};
use vello::Scene;

/// Rubber-band fill: rgba(0, 0, 255, 0.3).
const RUBBER_BAND_FILL: Color = Color::from_rgba8(0, 0, 255, 77);

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Transformer and rubber-band color.
    selection_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(0, 0, 255, 255),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Draw one shape with its preset fill and stroke.
    fn render_shape(&mut self, shape: &ShapeInstance, transform: Affine) {
        let style = shape.style;
        let path = shape.geometry.to_path();

        if shape.geometry.is_closed() {
            if let Some(fill) = style.fill_color() {
                self.scene.fill(Fill::NonZero, transform, fill, None, &path);
            }
        }
        if let Some(color) = style.stroke_color() {
            let stroke = match shape.geometry {
                ShapeGeometry::Line { .. } => Stroke::new(style.stroke_width)
                    .with_join(Join::Round)
                    .with_caps(Cap::Round),
                _ => Stroke::new(style.stroke_width),
            };
            self.scene.stroke(&stroke, transform, color, None, &path);
        }
    }

    /// Thin outline around a shape a pending rubber band would capture.
    fn render_candidate(&mut self, node: &NodeHandle, transform: Affine) {
        let outline = node.affine().transform_rect_bbox(node.local_bounds);
        let stroke = Stroke::new(1.0);
        let color = self.selection_color.with_alpha(0.5);
        self.scene
            .stroke(&stroke, transform, color, None, &outline.to_path(0.1));
    }

    /// Dashed box, square resize handles and a round rotate handle.
    fn render_transformer(&mut self, handles: &[Handle], transform: Affine) {
        let stroke_width = 1.0;
        let dash_len = 4.0;

        let corner = |c: Corner| {
            handles
                .iter()
                .find(|h| h.kind == HandleKind::Corner(c))
                .map(|h| h.position)
        };
        if let (Some(tl), Some(tr), Some(br), Some(bl)) = (
            corner(Corner::TopLeft),
            corner(Corner::TopRight),
            corner(Corner::BottomRight),
            corner(Corner::BottomLeft),
        ) {
            let mut path = BezPath::new();
            path.move_to(tl);
            path.line_to(tr);
            path.line_to(br);
            path.line_to(bl);
            path.close_path();
            let stroke = Stroke::new(stroke_width).with_dashes(0.0, [dash_len, dash_len]);
            self.scene
                .stroke(&stroke, transform, self.selection_color, None, &path);

            // Stem from the top edge to the rotate handle
            if let Some(rotate) = handles.iter().find(|h| h.kind == HandleKind::Rotate) {
                let top_mid = tl.midpoint(tr);
                let mut stem = BezPath::new();
                stem.move_to(top_mid);
                stem.line_to(rotate.position);
                self.scene.stroke(
                    &Stroke::new(stroke_width),
                    transform,
                    self.selection_color,
                    None,
                    &stem,
                );
            }
        }

        for handle in handles {
            self.render_handle(handle, transform, HANDLE_SIZE);
        }
    }

    /// Render a single handle.
    fn render_handle(&mut self, handle: &Handle, transform: Affine, size: f64) {
        let pos = handle.position;
        let stroke_width = 1.5;
        let path = match handle.kind {
            HandleKind::Rotate => Circle::new(pos, size / 2.0).to_path(0.1),
            HandleKind::Corner(_) | HandleKind::Edge(_) => {
                let half = size / 2.0;
                Rect::new(pos.x - half, pos.y - half, pos.x + half, pos.y + half).to_path(0.1)
            }
        };

        // White fill
        self.scene
            .fill(Fill::NonZero, transform, Color::WHITE, None, &path);

        // Blue border
        self.scene.stroke(
            &Stroke::new(stroke_width),
            transform,
            self.selection_color,
            None,
            &path,
        );
    }

    fn render_rubber_band(&mut self, rect: &SelectionRect, transform: Affine) {
        let path = rect.normalized().to_path(0.1);
        self.scene
            .fill(Fill::NonZero, transform, RUBBER_BAND_FILL, None, &path);
        self.scene.stroke(
            &Stroke::new(1.0),
            transform,
            self.selection_color,
            None,
            &path,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();
        self.selection_color = ctx.selection_color;

        let editor = ctx.editor;
        let stage = editor.stage();
        let canvas_transform = ctx.canvas_transform();
        let candidates = editor.rubber_band_candidates();

        // Shapes in creation order, each at its node's live transform
        for shape in editor.shapes().iter() {
            let affine = stage
                .node(shape.id)
                .map(NodeHandle::affine)
                .unwrap_or_else(|| shape.affine());
            self.render_shape(shape, canvas_transform * affine);
        }

        for id in candidates {
            if let Some(node) = stage.node(id) {
                self.render_candidate(node, canvas_transform);
            }
        }

        let handles = stage.transformer_handles();
        if !handles.is_empty() {
            self.render_transformer(&handles, canvas_transform);
        }

        if let Some(rect) = editor.selection().rubber_band() {
            self.render_rubber_band(&rect, canvas_transform);
        }
    }
}
