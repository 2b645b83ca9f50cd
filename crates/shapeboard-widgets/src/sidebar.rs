//! Sidebar components: panel frame, list rows and the shape list.

use egui::{Color32, CornerRadius, CursorIcon, Frame, Margin, Pos2, Sense, Stroke, Ui, vec2};

use crate::layout::{heading, separator};
use crate::{sizing, theme};

/// Frame for the sidebar panel: flat background with a right border.
pub fn sidebar_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(Margin::same(sizing::SIDEBAR_PADDING))
}

/// Show a clickable list row. Returns true when clicked.
pub fn list_item(ui: &mut Ui, label: &str) -> bool {
    let size = vec2(ui.available_width(), sizing::ROW_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            theme::HOVER_BG
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

        ui.painter().text(
            Pos2::new(rect.left() + 2.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(15.0),
            theme::TEXT,
        );
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    separator(ui);
    clicked
}

/// Show a titled list of items. Returns the clicked item, if any.
pub fn shape_list<'a, T>(
    ui: &mut Ui,
    title: &str,
    items: &'a [T],
    label: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    heading(ui, title);
    let mut clicked = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for item in items {
            if list_item(ui, label(item)) {
                clicked = Some(item);
            }
        }
    });
    clicked
}
