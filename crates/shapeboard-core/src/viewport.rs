//! Window and canvas geometry, with resize notifications.

use kurbo::{Affine, Point, Size, Vec2};
use std::collections::BTreeMap;
use std::fmt;

/// Default sidebar width in logical pixels.
pub const DEFAULT_SIDEBAR_WIDTH: f64 = 200.0;

/// Layout inputs for the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub sidebar_width: f64,
    pub window_size: Size,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            window_size: Size::new(1280.0, 800.0),
        }
    }
}

/// Handle returned by [`Viewport::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type ResizeListener = Box<dyn FnMut(Size)>;

/// Window geometry. The canvas fills the window right of the sidebar.
pub struct Viewport {
    config: ViewportConfig,
    listeners: BTreeMap<SubscriptionId, ResizeListener>,
    next_subscription: u64,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            listeners: BTreeMap::new(),
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    pub fn window_size(&self) -> Size {
        self.config.window_size
    }

    pub fn sidebar_width(&self) -> f64 {
        self.config.sidebar_width
    }

    /// Canvas size: window width minus sidebar (never negative) by window height.
    pub fn canvas_size(&self) -> Size {
        Size::new(
            (self.config.window_size.width - self.config.sidebar_width).max(0.0),
            self.config.window_size.height.max(0.0),
        )
    }

    /// Center of the canvas in canvas coordinates.
    pub fn canvas_center(&self) -> Point {
        let size = self.canvas_size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    /// Canvas to window transform.
    pub fn canvas_transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.config.sidebar_width, 0.0))
    }

    /// Convert a window position to canvas coordinates.
    /// Returns `None` over the sidebar.
    pub fn window_to_canvas(&self, point: Point) -> Option<Point> {
        if point.x < self.config.sidebar_width {
            return None;
        }
        Some(Point::new(point.x - self.config.sidebar_width, point.y))
    }

    /// Apply a new window size and notify listeners with the new canvas size.
    pub fn resize(&mut self, window_size: Size) {
        if window_size == self.config.window_size {
            return;
        }
        self.config.window_size = window_size;
        let canvas = self.canvas_size();
        log::debug!("Canvas resized to {:.0}x{:.0}", canvas.width, canvas.height);
        for listener in self.listeners.values_mut() {
            listener(canvas);
        }
    }

    /// Register a listener for canvas size changes.
    pub fn subscribe(&mut self, listener: impl FnMut(Size) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_canvas_center() {
        let viewport = Viewport::default();
        assert_eq!(viewport.canvas_size(), Size::new(1080.0, 800.0));
        assert_eq!(viewport.canvas_center(), Point::new(540.0, 400.0));
    }

    #[test]
    fn test_canvas_clamped_when_narrow() {
        let viewport = Viewport::new(ViewportConfig {
            sidebar_width: 200.0,
            window_size: Size::new(150.0, 300.0),
        });
        assert!((viewport.canvas_size().width).abs() < f64::EPSILON);
        assert_eq!(viewport.canvas_center(), Point::new(0.0, 150.0));
    }

    #[test]
    fn test_window_to_canvas() {
        let viewport = Viewport::default();
        assert_eq!(viewport.window_to_canvas(Point::new(100.0, 50.0)), None);
        assert_eq!(
            viewport.window_to_canvas(Point::new(300.0, 50.0)),
            Some(Point::new(100.0, 50.0))
        );
        assert_eq!(
            viewport.canvas_transform() * Point::new(100.0, 50.0),
            Point::new(300.0, 50.0)
        );
    }

    #[test]
    fn test_resize_notifies_subscribers() {
        let mut viewport = Viewport::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = viewport.subscribe(move |size| sink.borrow_mut().push(size));

        viewport.resize(Size::new(1000.0, 600.0));
        viewport.resize(Size::new(1000.0, 600.0));
        assert_eq!(*seen.borrow(), vec![Size::new(800.0, 600.0)]);

        assert!(viewport.unsubscribe(id));
        assert!(!viewport.unsubscribe(id));
        viewport.resize(Size::new(900.0, 600.0));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(viewport.listener_count(), 0);
    }
}
