//! Translates window input into editor operations.

use kurbo::Point;
use shapeboard_core::{Editor, Modifiers};
use winit::keyboard::ModifiersState;

/// Convert winit modifier state into editor modifiers.
pub fn to_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Tracks pointer and modifier state between window events.
///
/// All positions are logical window pixels; the sidebar occupies the left
/// edge of the window and the canvas the rest.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Last known pointer position.
    cursor: Point,
    modifiers: Modifiers,
    /// Whether the left button went down over the canvas.
    pressed: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Whether a press that started on the canvas is still held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Pointer moved. Returns true if the canvas needs a redraw.
    pub fn cursor_moved(&mut self, editor: &mut Editor, position: Point) -> bool {
        self.cursor = position;
        if !self.pressed {
            return false;
        }
        // Follow the pointer even if it wanders over the sidebar
        let point = editor.viewport().canvas_transform().inverse() * position;
        editor.pointer_move(point)
    }

    /// Left button pressed. Ignored over the sidebar.
    pub fn left_pressed(&mut self, editor: &mut Editor) -> bool {
        let Some(point) = editor.viewport().window_to_canvas(self.cursor) else {
            return false;
        };
        self.pressed = true;
        editor.pointer_down(point, self.modifiers);
        true
    }

    /// Left button released. Returns true if a press was in progress.
    pub fn left_released(&mut self, editor: &mut Editor) -> bool {
        if !std::mem::take(&mut self.pressed) {
            return false;
        }
        let point = editor.viewport().canvas_transform().inverse() * self.cursor;
        editor.pointer_up(point);
        true
    }

    /// Escape: abandon the current press.
    pub fn escape(&mut self, editor: &mut Editor) -> bool {
        if !std::mem::take(&mut self.pressed) {
            return false;
        }
        editor.cancel();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeboard_core::{Catalog, ShapeId, ShapeKind, ViewportConfig};

    fn editor() -> Editor {
        Editor::new(Catalog::bundled().unwrap(), ViewportConfig::default())
    }

    #[test]
    fn test_to_modifiers() {
        let mods = to_modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL);
        assert!(mods.shift);
        assert!(mods.ctrl);
        assert!(!mods.alt);
        assert!(!mods.meta);
    }

    #[test]
    fn test_press_over_sidebar_ignored() {
        let mut editor = editor();
        let mut handler = EventHandler::new();
        handler.cursor_moved(&mut editor, Point::new(50.0, 50.0));
        assert!(!handler.left_pressed(&mut editor));
        assert!(!handler.is_pressed());
        assert!(!handler.left_released(&mut editor));
    }

    #[test]
    fn test_click_selects_shape() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Circle);
        let mut handler = EventHandler::new();

        // Canvas center (540, 400) sits at window x = 740
        handler.cursor_moved(&mut editor, Point::new(740.0, 400.0));
        assert!(handler.left_pressed(&mut editor));
        assert!(handler.left_released(&mut editor));
        assert_eq!(editor.selected(), Some(id));
    }

    #[test]
    fn test_rubber_band_through_handler() {
        let mut editor = editor();
        editor.add_shape(ShapeKind::Circle);
        let mut handler = EventHandler::new();
        handler.set_modifiers(to_modifiers(ModifiersState::CONTROL));

        handler.cursor_moved(&mut editor, Point::new(600.0, 300.0));
        handler.left_pressed(&mut editor);
        assert!(handler.cursor_moved(&mut editor, Point::new(900.0, 500.0)));
        handler.left_released(&mut editor);
        assert_eq!(editor.selected(), Some(ShapeId(1)));
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut editor = editor();
        let id = editor.add_shape(ShapeKind::Rect);
        let mut handler = EventHandler::new();

        handler.cursor_moved(&mut editor, Point::new(760.0, 420.0));
        handler.left_pressed(&mut editor);
        handler.cursor_moved(&mut editor, Point::new(900.0, 500.0));
        assert!(handler.escape(&mut editor));
        assert!(!handler.left_released(&mut editor));
        assert_eq!(
            editor.shapes().get(id).unwrap().position,
            Point::new(540.0, 400.0)
        );
    }
}
