//! Selection state machine and rubber-band hit testing.

use crate::collection::ShapeCollection;
use crate::shapes::ShapeId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Rubber-band rectangle as dragged: origin plus signed extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub start_x: f64,
    pub start_y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// A zero-size rectangle at `origin`.
    pub fn new(origin: Point) -> Self {
        Self {
            start_x: origin.x,
            start_y: origin.y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the rectangle so its far corner sits at `current`.
    pub fn update(&mut self, current: Point) {
        self.width = current.x - self.start_x;
        self.height = current.y - self.start_y;
    }

    /// The rectangle with min/max corners sorted.
    pub fn normalized(&self) -> Rect {
        Rect::new(
            self.start_x,
            self.start_y,
            self.start_x + self.width,
            self.start_y + self.height,
        )
        .abs()
    }

    /// True when the rectangle has no area on at least one axis.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Strict containment: points on an edge are outside.
    pub fn contains_strict(&self, point: Point) -> bool {
        let r = self.normalized();
        point.x > r.x0 && point.x < r.x1 && point.y > r.y0 && point.y < r.y1
    }
}

/// Where the editor's selection currently is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A rubber band is being dragged. `previous` is restored if it ends with no area.
    RubberBanding {
        rect: SelectionRect,
        previous: Option<ShapeId>,
    },
    /// Exactly one shape selected.
    Selected(ShapeId),
}

/// Selection controller.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Currently selected shape, if any.
    pub fn selected(&self) -> Option<ShapeId> {
        match self.state {
            SelectionState::Selected(id) => Some(id),
            _ => None,
        }
    }

    /// The active rubber band, if any.
    pub fn rubber_band(&self) -> Option<SelectionRect> {
        match self.state {
            SelectionState::RubberBanding { rect, .. } => Some(rect),
            _ => None,
        }
    }

    /// Start a rubber band at `origin`, remembering the current selection.
    pub fn begin_rubber_band(&mut self, origin: Point) {
        let previous = self.selected();
        log::debug!("Rubber band started at ({:.1}, {:.1})", origin.x, origin.y);
        self.state = SelectionState::RubberBanding {
            rect: SelectionRect::new(origin),
            previous,
        };
    }

    /// Stretch the active rubber band. Ignored when not rubber-banding.
    pub fn update_rubber_band(&mut self, current: Point) {
        if let SelectionState::RubberBanding { rect, .. } = &mut self.state {
            rect.update(current);
        }
    }

    /// Finish the rubber band and resolve it against `shapes`.
    ///
    /// A band with no area restores the selection from before the gesture.
    /// Otherwise the last shape whose anchor lies strictly inside is
    /// selected, or nothing if none does.
    pub fn finish_rubber_band(&mut self, shapes: &ShapeCollection) -> Option<ShapeId> {
        let SelectionState::RubberBanding { rect, previous } = self.state else {
            return self.selected();
        };

        let selected = if rect.is_degenerate() {
            previous
        } else {
            rubber_band_hit(shapes, &rect)
        };
        self.set(selected);
        selected
    }

    /// Abandon the rubber band and restore the previous selection.
    pub fn cancel_rubber_band(&mut self) {
        if let SelectionState::RubberBanding { previous, .. } = self.state {
            self.set(previous);
        }
    }

    /// Handle a click on `target` (None = empty canvas).
    pub fn click(&mut self, target: Option<ShapeId>) {
        self.set(target);
    }

    /// Handle a double-click on `target`. Same outcome as a plain click.
    pub fn double_click(&mut self, target: Option<ShapeId>) {
        self.set(target);
    }

    fn set(&mut self, id: Option<ShapeId>) {
        let next = match id {
            Some(id) => SelectionState::Selected(id),
            None => SelectionState::Idle,
        };
        if next != self.state {
            log::debug!("Selection: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}

/// Every shape whose anchor lies strictly inside `rect`, in creation order.
pub fn shapes_in_rect(shapes: &ShapeCollection, rect: &SelectionRect) -> Vec<ShapeId> {
    shapes
        .iter()
        .filter(|s| rect.contains_strict(s.position))
        .map(|s| s.id)
        .collect()
}

/// The shape a rubber band selects: the last one in creation order whose
/// anchor lies strictly inside.
pub fn rubber_band_hit(shapes: &ShapeCollection, rect: &SelectionRect) -> Option<ShapeId> {
    shapes
        .iter()
        .rev()
        .find(|s| rect.contains_strict(s.position))
        .map(|s| s.id)
}
