//! Layout helpers: headings and separators.

use egui::{Pos2, Stroke, Ui};

use crate::theme;

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 0.5;
    ui.painter().line_segment(
        [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
        Stroke::new(1.0, theme::DIVIDER),
    );
    ui.add_space(1.0);
}

/// Draw a panel heading.
pub fn heading(ui: &mut Ui, text: &str) {
    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(text)
            .size(20.0)
            .strong()
            .color(theme::TEXT),
    );
    ui.add_space(8.0);
}
