//! Modifier keys and double-click detection.

use kurbo::Point;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Shift or Ctrl: a press on empty canvas starts a rubber band.
    pub fn starts_rubber_band(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double-clicks from successive left presses.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last press time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last press position for double-click detection.
    last_click_position: Option<Point>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a left press. Returns true if it completes a double-click.
    pub fn press(&mut self, position: Point) -> bool {
        let now = Instant::now();
        let double = match (self.last_click_time, self.last_click_position) {
            (Some(last_time), Some(last_pos)) => {
                let elapsed = now.duration_since(last_time).as_millis();
                elapsed < DOUBLE_CLICK_TIME_MS
                    && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE
            }
            _ => false,
        };

        if double {
            // Reset so a third press starts a new sequence
            self.last_click_time = None;
            self.last_click_position = None;
        } else {
            self.last_click_time = Some(now);
            self.last_click_position = Some(position);
        }
        double
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        assert!(!input.press(Point::new(100.0, 100.0)));
        assert!(input.press(Point::new(101.0, 100.0)));

        // Third press starts over
        assert!(!input.press(Point::new(101.0, 100.0)));
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        input.press(Point::new(100.0, 100.0));
        assert!(!input.press(Point::new(200.0, 200.0)));
    }

    #[test]
    fn test_rubber_band_modifiers() {
        assert!(!Modifiers::default().starts_rubber_band());
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        let alt = Modifiers {
            alt: true,
            ..Default::default()
        };
        assert!(shift.starts_rubber_band());
        assert!(ctrl.starts_rubber_band());
        assert!(!alt.starts_rubber_band());
    }
}
