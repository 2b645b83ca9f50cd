//! Editor facade: owns the shapes and selection and routes pointer input.

use crate::catalog::Catalog;
use crate::collection::ShapeCollection;
use crate::input::{InputState, Modifiers};
use crate::selection::{Selection, SelectionState, shapes_in_rect};
use crate::shapes::{ShapeId, ShapeKind, ShapePatch};
use crate::stage::{HitTarget, Stage, StageEvent};
use crate::transform::{commit_drag, commit_transform};
use crate::viewport::{Viewport, ViewportConfig};
use kurbo::{Point, Size};

/// What the current left press is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    RubberBand,
    /// Drag or transform on a shape; a release without movement is a click.
    Gesture { target: ShapeId, double: bool },
    /// Press on empty canvas without modifiers.
    Canvas { double: bool },
}

/// Shape editor state.
#[derive(Debug)]
pub struct Editor {
    catalog: Catalog,
    shapes: ShapeCollection,
    selection: Selection,
    stage: Stage,
    viewport: Viewport,
    input: InputState,
    press: Option<Press>,
}

impl Editor {
    pub fn new(catalog: Catalog, config: ViewportConfig) -> Self {
        Self {
            catalog,
            shapes: ShapeCollection::new(),
            selection: Selection::new(),
            stage: Stage::new(),
            viewport: Viewport::new(config),
            input: InputState::new(),
            press: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shapes(&self) -> &ShapeCollection {
        &self.shapes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport access, e.g. to manage resize subscriptions.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selection.selected()
    }

    /// Shapes a pending rubber band would capture.
    pub fn rubber_band_candidates(&self) -> Vec<ShapeId> {
        self.selection
            .rubber_band()
            .map(|rect| shapes_in_rect(&self.shapes, &rect))
            .unwrap_or_default()
    }

    /// Add a shape of `kind` at the current canvas center.
    pub fn add_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let center = self.viewport.canvas_center();
        let id = self.shapes.add_shape(kind, center).id;
        log::info!("Added {} {}", kind.name(), id);
        self.refresh();
        id
    }

    /// Add a shape from a catalog template. `None` for an unknown template id.
    pub fn add_from_template(&mut self, template_id: u32) -> Option<ShapeId> {
        let kind = self.catalog.get(template_id)?.kind;
        Some(self.add_shape(kind))
    }

    pub fn update_shape(&mut self, id: ShapeId, patch: ShapePatch) -> bool {
        let changed = self.shapes.update_shape(id, patch);
        if changed {
            self.refresh();
        }
        changed
    }

    /// Window resized.
    pub fn resize(&mut self, window_size: Size) {
        self.viewport.resize(window_size);
    }

    /// Left button pressed at a canvas point.
    pub fn pointer_down(&mut self, point: Point, modifiers: Modifiers) {
        let double = self.input.press(point);

        self.press = match self.stage.hit(point, &self.shapes) {
            HitTarget::Stage if modifiers.starts_rubber_band() => {
                self.selection.begin_rubber_band(point);
                self.refresh();
                Some(Press::RubberBand)
            }
            HitTarget::Stage => Some(Press::Canvas { double }),
            HitTarget::Handle(id, handle) => self
                .stage
                .begin_transform(id, handle, point)
                .then_some(Press::Gesture { target: id, double }),
            HitTarget::Shape(id) => self
                .stage
                .begin_drag(id, point)
                .then_some(Press::Gesture { target: id, double }),
        };
    }

    /// Pointer moved to a canvas point. Returns true if anything changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match self.press {
            Some(Press::RubberBand) => {
                self.selection.update_rubber_band(point);
                true
            }
            Some(Press::Gesture { .. }) => {
                self.stage.update_gesture(point);
                true
            }
            _ => false,
        }
    }

    /// Left button released at a canvas point.
    pub fn pointer_up(&mut self, point: Point) {
        match self.press.take() {
            Some(Press::RubberBand) => {
                self.selection.update_rubber_band(point);
                self.selection.finish_rubber_band(&self.shapes);
            }
            Some(Press::Gesture { target, double }) => match self.stage.end_gesture() {
                Some(StageEvent::DragEnd { id, position }) => {
                    commit_drag(&mut self.shapes, id, position);
                }
                Some(StageEvent::TransformEnd { id }) => {
                    if let Some(node) = self.stage.node_mut(id) {
                        commit_transform(&mut self.shapes, id, &mut node.transform);
                    }
                }
                None => self.dispatch_click(Some(target), double),
            },
            Some(Press::Canvas { double }) => self.dispatch_click(None, double),
            None => {}
        }
        self.refresh();
    }

    /// Abort the current press: cancels a rubber band or gesture.
    pub fn cancel(&mut self) {
        match self.press.take() {
            Some(Press::RubberBand) => self.selection.cancel_rubber_band(),
            Some(Press::Gesture { .. }) => self.stage.cancel_gesture(),
            _ => {}
        }
        self.refresh();
    }

    /// Click on a shape or on empty canvas (`None`).
    pub fn click(&mut self, target: Option<ShapeId>) {
        self.selection.click(target);
        self.refresh();
    }

    pub fn double_click(&mut self, target: Option<ShapeId>) {
        self.selection.double_click(target);
        self.refresh();
    }

    fn dispatch_click(&mut self, target: Option<ShapeId>, double: bool) {
        if double {
            self.selection.double_click(target);
        } else {
            self.selection.click(target);
        }
    }

    /// Whether a rubber band or gesture is in progress.
    pub fn is_interacting(&self) -> bool {
        self.press.is_some()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    fn refresh(&mut self) {
        self.stage.sync(&self.shapes, &self.selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeGeometry;
    use crate::stage::{Corner, Edge, HandleKind};
    use kurbo::Vec2;

    fn editor() -> Editor {
        Editor::new(Catalog::bundled().unwrap(), ViewportConfig::default())
    }

    fn shift() -> Modifiers {
        Modifiers {
            shift: true,
            ..Default::default()
        }
    }

    fn tap(editor: &mut Editor, x: f64, y: f64) {
        editor.pointer_down(Point::new(x, y), Modifiers::default());
        editor.pointer_up(Point::new(x, y));
    }

    #[test]
    fn test_add_shape_at_canvas_center() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Rect);
        assert_eq!(id, ShapeId(1));
        assert_eq!(editor.shapes().len(), 1);
        assert_eq!(editor.shapes().get(id).unwrap().position, Point::new(540.0, 400.0));
        assert_eq!(editor.stage().node_count(), 1);
    }

    #[test]
    fn test_add_uses_center_at_time_of_addition() {
        let mut editor = editor();
        editor.add_shape(ShapeKind::Circle);
        editor.resize(Size::new(600.0, 400.0));
        let id = editor.add_shape(ShapeKind::Circle);
        assert_eq!(editor.shapes().get(id).unwrap().position, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_add_from_template() {
        let mut editor = editor();
        let id = editor.add_from_template(6).unwrap();
        assert_eq!(editor.shapes().get(id).unwrap().kind(), ShapeKind::Star);
        assert!(editor.add_from_template(99).is_none());
        assert_eq!(editor.shapes().len(), 1);
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        tap(&mut editor, 540.0, 400.0);
        assert_eq!(editor.selected(), Some(id));
        assert_eq!(editor.stage().transformer(), Some(id));

        tap(&mut editor, 10.0, 10.0);
        assert_eq!(editor.selection_state(), SelectionState::Idle);
        assert!(editor.stage().transformer().is_none());
    }

    #[test]
    fn test_modifier_click_on_shape_selects_it() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Circle);
        let b = editor.add_shape(ShapeKind::Circle);
        editor.update_shape(a, ShapePatch::new().position(Point::new(100.0, 100.0)));
        tap(&mut editor, 540.0, 400.0);
        assert_eq!(editor.selected(), Some(b));

        editor.pointer_down(Point::new(100.0, 100.0), shift());
        editor.pointer_up(Point::new(100.0, 100.0));
        assert_eq!(editor.selected(), Some(a));
        assert!(editor.selection().rubber_band().is_none());
    }

    #[test]
    fn test_rubber_band_selects_last_contained() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Circle);
        let b = editor.add_shape(ShapeKind::Circle);
        editor.update_shape(a, ShapePatch::new().position(Point::new(100.0, 100.0)));
        editor.update_shape(b, ShapePatch::new().position(Point::new(180.0, 180.0)));

        editor.pointer_down(Point::new(300.0, 300.0), shift());
        assert!(editor.pointer_move(Point::new(150.0, 150.0)));
        assert_eq!(editor.rubber_band_candidates(), vec![b]);
        editor.pointer_move(Point::new(20.0, 20.0));
        assert_eq!(editor.rubber_band_candidates(), vec![a, b]);
        editor.pointer_up(Point::new(20.0, 20.0));

        assert_eq!(editor.selected(), Some(b));
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_empty_click_after_rubber_band_goes_idle() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        editor.pointer_down(Point::new(400.0, 300.0), shift());
        editor.pointer_up(Point::new(700.0, 500.0));
        assert_eq!(editor.selected(), Some(id));

        editor.click(None);
        assert_eq!(editor.selection_state(), SelectionState::Idle);

        // Same through the pointer path
        editor.pointer_down(Point::new(400.0, 300.0), shift());
        editor.pointer_up(Point::new(700.0, 500.0));
        tap(&mut editor, 10.0, 10.0);
        assert_eq!(editor.selection_state(), SelectionState::Idle);
    }

    #[test]
    fn test_zero_area_rubber_band_keeps_selection() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        editor.click(Some(id));
        editor.pointer_down(Point::new(100.0, 100.0), shift());
        editor.pointer_up(Point::new(300.0, 100.0));
        assert_eq!(editor.selected(), Some(id));
    }

    #[test]
    fn test_drag_commits_position() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        editor.pointer_down(Point::new(540.0, 400.0), Modifiers::default());
        editor.pointer_move(Point::new(600.0, 450.0));
        // Collection untouched until release
        assert_eq!(editor.shapes().get(id).unwrap().position, Point::new(540.0, 400.0));
        editor.pointer_up(Point::new(600.0, 450.0));

        let shape = editor.shapes().get(id).unwrap();
        assert_eq!(shape.position, Point::new(600.0, 450.0));
        assert!(shape.scale.is_none());
        assert!(editor.selected().is_none());
    }

    #[test]
    fn test_transform_commits_baked_size() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        editor.click(Some(id));

        // Bottom-right handle of a radius-30 circle at (540, 400)
        let handle = editor
            .stage()
            .transformer_handles()
            .into_iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::BottomRight))
            .unwrap();
        assert_eq!(handle.position, Point::new(570.0, 430.0));

        editor.pointer_down(handle.position, Modifiers::default());
        editor.pointer_move(Point::new(600.0, 460.0));
        editor.pointer_up(Point::new(600.0, 460.0));

        let shape = editor.shapes().get(id).unwrap();
        assert_eq!(shape.geometry, ShapeGeometry::Circle { radius: 60.0 });
        assert_eq!(shape.scale, Some(Vec2::new(1.0, 1.0)));
        assert_eq!(shape.position, Point::new(540.0, 400.0));
        let node = editor.stage().node(id).unwrap();
        assert!(node.transform.is_unit_scale());
        assert_eq!(editor.selected(), Some(id));
    }

    #[test]
    fn test_radial_edge_resize_commits_live_box() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        editor.click(Some(id));

        let handle = editor
            .stage()
            .transformer_handles()
            .into_iter()
            .find(|h| h.kind == HandleKind::Edge(Edge::Right))
            .unwrap();
        assert_eq!(handle.position, Point::new(570.0, 400.0));

        editor.pointer_down(handle.position, Modifiers::default());
        editor.pointer_move(Point::new(630.0, 400.0));
        let live = editor.stage().node(id).unwrap().bound_box();
        assert_eq!((live.width, live.height), (180.0, 180.0));
        editor.pointer_up(Point::new(630.0, 400.0));

        let shape = editor.shapes().get(id).unwrap();
        assert_eq!(shape.geometry, ShapeGeometry::Circle { radius: 90.0 });
        let committed = editor.stage().node(id).unwrap().bound_box();
        assert_eq!(committed, live);
    }

    #[test]
    fn test_double_click_selects() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Rect);
        tap(&mut editor, 560.0, 420.0);
        tap(&mut editor, 560.0, 420.0);
        assert_eq!(editor.selected(), Some(id));
        editor.double_click(None);
        assert!(editor.selected().is_none());
    }

    #[test]
    fn test_cancel_rubber_band() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        editor.click(Some(id));
        editor.pointer_down(Point::new(10.0, 10.0), shift());
        editor.pointer_move(Point::new(900.0, 700.0));
        editor.cancel();
        assert_eq!(editor.selected(), Some(id));
        assert!(!editor.is_interacting());
    }
}
