//! Sidebar widget components for the Shapeboard editor.
//!
//! - **Sidebar**: panel frame, clickable list rows, the shape list
//! - **Layout**: headings and separators

pub mod layout;
pub mod sidebar;

pub use layout::{heading, separator};
pub use sidebar::{list_item, shape_list, sidebar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Sidebar width in logical pixels
    pub const SIDEBAR_WIDTH: f32 = 200.0;
    /// Inner padding of the sidebar
    pub const SIDEBAR_PADDING: i8 = 10;
    /// Height of one list row
    pub const ROW_HEIGHT: f32 = 38.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Row divider
    pub const DIVIDER: Color32 = Color32::from_rgb(221, 221, 221);
    /// Sidebar right border
    pub const BORDER: Color32 = Color32::from_rgb(204, 204, 204);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(232, 232, 232);
    /// Sidebar background
    pub const PANEL_BG: Color32 = Color32::from_rgb(244, 244, 244);
}
