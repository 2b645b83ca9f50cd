//! UI components using egui.

use egui::{Context, Pos2};
use shapeboard_core::Catalog;
use shapeboard_widgets::{shape_list, sidebar_frame, sizing};

/// Actions that can be triggered from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Add a shape from the catalog template with this id at the canvas center.
    AddShape(u32),
}

/// Render the sidebar and return any triggered action.
pub fn render_ui(ctx: &Context, catalog: &Catalog, sidebar_width: f32) -> Option<UiAction> {
    let mut action = None;

    #[allow(deprecated)]
    let screen_rect = ctx.input(|i| i.content_rect());
    let padding = f32::from(sizing::SIDEBAR_PADDING) * 2.0;

    egui::Area::new(egui::Id::new("sidebar"))
        .fixed_pos(Pos2::ZERO)
        .show(ctx, |ui| {
            sidebar_frame().show(ui, |ui| {
                ui.set_width((sidebar_width - padding).max(0.0));
                ui.set_height((screen_rect.height() - padding).max(0.0));

                let templates = catalog.templates();
                if let Some(template) = shape_list(ui, "Shapes List", templates, |t| t.name.as_str()) {
                    log::debug!("Sidebar: add {}", template.name);
                    action = Some(UiAction::AddShape(template.id));
                }
            });
        });

    action
}
